use crate::infra::{load_offer_catalog, sample_offer_catalog};
use clap::Args;
use stage_placement::error::AppError;
use stage_placement::workflows::internship::{
    Actor, CvId, EvaluationKind, GestionnaireId, InternshipPlacement, OfferCatalog, OfferId,
    PlacementError, ProfesseurId, Signatory, SignaturePolicy, StudentId,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Offer catalog CSV to use instead of the built-in sample offers
    #[arg(long)]
    pub(crate) offers: Option<PathBuf>,
    /// Offer the demo student applies to
    #[arg(long, default_value_t = 1)]
    pub(crate) offer_id: u64,
    /// Required signatories, comma separated (e.g. "etudiant,employeur")
    #[arg(long, value_parser = parse_policy)]
    pub(crate) signatures: Option<SignaturePolicy>,
}

fn parse_policy(raw: &str) -> Result<SignaturePolicy, String> {
    SignaturePolicy::parse(raw).map_err(|err| err.to_string())
}

fn report<T>(step: &str, result: Result<T, PlacementError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            println!("  {step} refused [{}]: {}", err.kind(), err);
            None
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        offers,
        offer_id,
        signatures,
    } = args;

    let catalog = match offers {
        Some(path) => load_offer_catalog(Some(path.as_path()))?,
        None => sample_offer_catalog()?,
    };
    let offer = match catalog.fetch(OfferId(offer_id)) {
        Ok(Some(offer)) => offer,
        Ok(None) => {
            println!("Offer {offer_id} is not in the catalog");
            return Ok(());
        }
        Err(err) => {
            println!("Offer catalog unavailable: {err}");
            return Ok(());
        }
    };

    let policy = signatures.unwrap_or_default();
    let required: Vec<&str> = policy.required().map(Signatory::label).collect();
    let placement = InternshipPlacement::in_memory(catalog, policy);

    let student = StudentId(1);
    let employeur = offer.employeur_id;
    let professeur = ProfesseurId(1);
    let gestionnaire = GestionnaireId(1);

    println!("Internship placement demo");
    println!(
        "- Offer {} \"{}\" by employer {} ({} weeks from {})",
        offer.id, offer.title, employeur, offer.duration_weeks, offer.start_date
    );
    println!("- Required signatures: {}", required.join(", "));

    println!("\nCandidature");
    let Some(candidature) = report(
        "Application",
        placement.candidatures.apply(student, offer.id, CvId(1)),
    ) else {
        return Ok(());
    };
    println!("- Student {} applied -> {}", student, candidature.status);

    report(
        "Student acceptance before the employer",
        placement.candidatures.accept_by_student(candidature.id, student),
    );

    let Some(candidature) = report(
        "Employer acceptance",
        placement
            .candidatures
            .accept_by_employeur(candidature.id, employeur),
    ) else {
        return Ok(());
    };
    println!("- Employer {} accepted -> {}", employeur, candidature.status);

    let Some(candidature) = report(
        "Student acceptance",
        placement.candidatures.accept_by_student(candidature.id, student),
    ) else {
        return Ok(());
    };
    println!("- Student {} accepted -> {}", student, candidature.status);

    println!("\nEntente");
    let Some(entente) = report(
        "Draft",
        placement.ententes.create_draft(
            candidature.id,
            "Participer à la conception du service de facturation et rédiger les tests.",
        ),
    ) else {
        return Ok(());
    };
    println!("- Draft {} created -> {}", entente.id, entente.statut);

    if report(
        "Professor assignment",
        placement.ententes.assign_professeur(entente.id, professeur),
    )
    .is_some()
    {
        println!("- Professor {} assigned", professeur);
    }

    let Some(entente) = report(
        "Signature request",
        placement.ententes.request_signatures(entente.id, gestionnaire),
    ) else {
        return Ok(());
    };
    println!("- Manager {} requested signatures -> {}", gestionnaire, entente.statut);

    let signers = [
        (Signatory::Etudiant, placement.ententes.signer_par_etudiant(entente.id, student)),
        (Signatory::Employeur, placement.ententes.signer_par_employeur(entente.id, employeur)),
        (
            Signatory::Gestionnaire,
            placement.ententes.signer_par_gestionnaire(entente.id, gestionnaire),
        ),
    ];
    for (signatory, result) in signers {
        if let Some(signed) = report("Signature", result) {
            let missing: Vec<&str> = placement
                .ententes
                .policy()
                .missing(&signed)
                .into_iter()
                .map(Signatory::label)
                .collect();
            println!(
                "- {} signed -> {} (missing: {})",
                signatory,
                signed.statut,
                if missing.is_empty() {
                    "none".to_string()
                } else {
                    missing.join(", ")
                }
            );
        }
    }

    if report(
        "Intern evaluation",
        placement.evaluations.submit(
            entente.id,
            &Actor::employeur(employeur.0),
            EvaluationKind::Stagiaire,
            5,
            "Autonome et rigoureux",
        ),
    )
    .is_some()
    {
        println!("- Employer evaluated the intern");
    }

    let Some(view) = report(
        "Entente view",
        placement
            .directory
            .entente_view(entente.id, &Actor::gestionnaire(gestionnaire.0)),
    ) else {
        return Ok(());
    };
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("\nEntente payload:\n{}", json),
        Err(err) => println!("\nEntente payload unavailable: {}", err),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_with_sample_catalog() {
        run_demo(DemoArgs {
            offer_id: 1,
            ..DemoArgs::default()
        })
        .expect("demo completes");
    }

    #[test]
    fn policy_argument_rejects_missing_student() {
        assert!(parse_policy("employeur,gestionnaire").is_err());
        assert!(parse_policy("etudiant,employeur").is_ok());
    }
}
