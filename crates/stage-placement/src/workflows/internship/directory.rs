use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::candidatures::{load_candidature, load_offer};
use super::domain::{
    Candidature, CandidatureId, CandidatureStatus, Convocation, EmployeurId, EntenteId,
    EntenteStage, EntenteStatut, Evaluation, GestionnaireId, InternshipOffer, OfferId,
    ProfesseurId, StudentId,
};
use super::ententes::load_entente;
use super::error::PlacementError;
use super::identity::{Actor, Role};
use super::messages::*;
use super::stores::PlacementStores;

/// Read side over candidatures and ententes, scoped to the caller's identity.
///
/// Listings are sorted most recent first. Ties keep the store's order.
pub struct PlacementDirectory {
    stores: PlacementStores,
}

impl PlacementDirectory {
    pub fn new(stores: PlacementStores) -> Self {
        Self { stores }
    }

    pub fn candidatures_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Candidature>, PlacementError> {
        let records = self.stores.candidatures.by_student(student_id)?;
        Ok(newest_applications_first(records))
    }

    pub fn candidatures_by_employeur(
        &self,
        employeur_id: EmployeurId,
    ) -> Result<Vec<Candidature>, PlacementError> {
        let offer_ids = self.owned_offer_ids(employeur_id)?;
        if offer_ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.stores.candidatures.by_offers(&offer_ids)?;
        Ok(newest_applications_first(records))
    }

    /// Candidatures for one offer; the employer must own it.
    pub fn candidatures_by_offer(
        &self,
        offer_id: OfferId,
        employeur_id: EmployeurId,
    ) -> Result<Vec<Candidature>, PlacementError> {
        let offer = load_offer(&self.stores, offer_id)?;
        if offer.employeur_id != employeur_id {
            return Err(PlacementError::ownership(NOT_YOUR_OFFER));
        }
        let records = self.stores.candidatures.by_offers(&[offer_id])?;
        Ok(newest_applications_first(records))
    }

    pub fn candidatures_for(&self, actor: &Actor) -> Result<Vec<Candidature>, PlacementError> {
        match actor.role {
            Role::Etudiant => self.candidatures_by_student(StudentId(actor.id)),
            Role::Employeur => self.candidatures_by_employeur(EmployeurId(actor.id)),
            Role::Professeur => {
                let ententes = self
                    .stores
                    .ententes
                    .by_professeur(ProfesseurId(actor.id))?;
                let mut records = Vec::with_capacity(ententes.len());
                for entente in ententes {
                    if let Some(candidature) =
                        self.stores.candidatures.fetch(entente.candidature_id)?
                    {
                        records.push(candidature);
                    }
                }
                Ok(newest_applications_first(records))
            }
            Role::Gestionnaire => Ok(newest_applications_first(self.stores.candidatures.all()?)),
        }
    }

    pub fn ententes_for(&self, actor: &Actor) -> Result<Vec<EntenteStage>, PlacementError> {
        let records = match actor.role {
            Role::Etudiant | Role::Employeur => {
                let candidature_ids = candidature_ids(&self.candidatures_for(actor)?);
                if candidature_ids.is_empty() {
                    Vec::new()
                } else {
                    self.stores.ententes.by_candidatures(&candidature_ids)?
                }
            }
            Role::Professeur => self
                .stores
                .ententes
                .by_professeur(ProfesseurId(actor.id))?,
            Role::Gestionnaire => self.stores.ententes.all()?,
        };
        Ok(newest_ententes_first(records))
    }

    pub fn candidatures_by_status(
        &self,
        status: CandidatureStatus,
        actor: &Actor,
    ) -> Result<Vec<Candidature>, PlacementError> {
        if actor.role != Role::Gestionnaire {
            return Err(PlacementError::ownership(MANAGERS_ONLY));
        }
        Ok(newest_applications_first(
            self.stores.candidatures.by_status(status)?,
        ))
    }

    /// Manager-only listing, e.g. every `VALIDEE` entente awaiting document generation.
    pub fn ententes_by_status(
        &self,
        statut: EntenteStatut,
        actor: &Actor,
    ) -> Result<Vec<EntenteStage>, PlacementError> {
        if actor.role != Role::Gestionnaire {
            return Err(PlacementError::ownership(MANAGERS_ONLY));
        }
        Ok(newest_ententes_first(
            self.stores.ententes.by_status(statut)?,
        ))
    }

    pub fn entente_view(
        &self,
        entente_id: EntenteId,
        actor: &Actor,
    ) -> Result<EntenteView, PlacementError> {
        let entente = load_entente(&self.stores, entente_id)?;
        let candidature = load_candidature(&self.stores, entente.candidature_id)?;
        let offer = load_offer(&self.stores, candidature.offer_id)?;
        ensure_participant(actor, &entente, &candidature, &offer)?;
        Ok(EntenteView::resolve(&entente, &candidature, &offer))
    }

    pub fn convocations_for(&self, actor: &Actor) -> Result<Vec<Convocation>, PlacementError> {
        let mut records = match actor.role {
            Role::Gestionnaire => self.stores.convocations.all()?,
            _ => {
                let candidature_ids = candidature_ids(&self.candidatures_for(actor)?);
                if candidature_ids.is_empty() {
                    Vec::new()
                } else {
                    self.stores.convocations.by_candidatures(&candidature_ids)?
                }
            }
        };
        records.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        Ok(records)
    }

    pub fn evaluations_for_entente(
        &self,
        entente_id: EntenteId,
        actor: &Actor,
    ) -> Result<Vec<Evaluation>, PlacementError> {
        let entente = load_entente(&self.stores, entente_id)?;
        let candidature = load_candidature(&self.stores, entente.candidature_id)?;
        let offer = load_offer(&self.stores, candidature.offer_id)?;
        ensure_participant(actor, &entente, &candidature, &offer)?;
        let mut records = self.stores.evaluations.by_entente(entente_id)?;
        records.sort_by_key(|record| record.kind);
        Ok(records)
    }

    fn owned_offer_ids(&self, employeur_id: EmployeurId) -> Result<Vec<OfferId>, PlacementError> {
        Ok(self
            .stores
            .offers
            .by_employeur(employeur_id)?
            .into_iter()
            .map(|offer| offer.id)
            .collect())
    }
}

fn ensure_participant(
    actor: &Actor,
    entente: &EntenteStage,
    candidature: &Candidature,
    offer: &InternshipOffer,
) -> Result<(), PlacementError> {
    let participates = match actor.role {
        Role::Etudiant => candidature.student_id == StudentId(actor.id),
        Role::Employeur => offer.employeur_id == EmployeurId(actor.id),
        Role::Professeur => entente.professeur_id == Some(ProfesseurId(actor.id)),
        Role::Gestionnaire => true,
    };
    if participates {
        Ok(())
    } else {
        Err(PlacementError::ownership(NOT_A_PARTICIPANT))
    }
}

fn candidature_ids(records: &[Candidature]) -> Vec<CandidatureId> {
    records.iter().map(|record| record.id).collect()
}

fn newest_applications_first(mut records: Vec<Candidature>) -> Vec<Candidature> {
    records.sort_by(|a, b| b.application_date.cmp(&a.application_date));
    records
}

fn newest_ententes_first(mut records: Vec<EntenteStage>) -> Vec<EntenteStage> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

/// Entente joined with its candidature and offer. Offer details are resolved here on
/// every read and never stored on the entente.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntenteView {
    pub id: EntenteId,
    pub candidature_id: CandidatureId,
    pub student_id: StudentId,
    pub employeur_id: EmployeurId,
    pub offer_id: OfferId,
    pub offer_title: String,
    pub statut: EntenteStatut,
    pub missions_objectifs: String,
    pub remuneration_cents: u32,
    pub address: String,
    pub duration_weeks: u16,
    pub start_date: NaiveDate,
    pub professeur_id: Option<ProfesseurId>,
    pub gestionnaire_id: Option<GestionnaireId>,
    pub date_signature_etudiant: Option<DateTime<Utc>>,
    pub date_signature_employeur: Option<DateTime<Utc>>,
    pub date_signature_gestionnaire: Option<DateTime<Utc>>,
    pub date_validation: Option<DateTime<Utc>>,
}

impl EntenteView {
    pub fn resolve(
        entente: &EntenteStage,
        candidature: &Candidature,
        offer: &InternshipOffer,
    ) -> Self {
        Self {
            id: entente.id,
            candidature_id: candidature.id,
            student_id: candidature.student_id,
            employeur_id: offer.employeur_id,
            offer_id: offer.id,
            offer_title: offer.title.clone(),
            statut: entente.statut,
            missions_objectifs: entente.missions_objectifs.clone(),
            remuneration_cents: offer.remuneration_cents,
            address: offer.address.clone(),
            duration_weeks: offer.duration_weeks,
            start_date: offer.start_date,
            professeur_id: entente.professeur_id,
            gestionnaire_id: entente.gestionnaire_id,
            date_signature_etudiant: entente.date_signature_etudiant,
            date_signature_employeur: entente.date_signature_employeur,
            date_signature_gestionnaire: entente.date_signature_gestionnaire,
            date_validation: entente.date_validation,
        }
    }
}
