use chrono::Utc;
use tracing::{info, warn};

use super::candidatures::{load_candidature, load_offer};
use super::domain::{
    CandidatureId, CandidatureStatus, EmployeurId, EntenteId, EntenteStage, EntenteStatut,
    GestionnaireId, ProfesseurId, StudentId,
};
use super::error::PlacementError;
use super::messages::*;
use super::signature::{Signatory, SignaturePolicy};
use super::stores::PlacementStores;

/// Entente signature workflow: `BROUILLON → EN_ATTENTE_SIGNATURE → VALIDEE`.
///
/// The flip to `VALIDEE` happens inside whichever signature completes the set required by
/// the configured [`SignaturePolicy`].
pub struct EntenteService {
    stores: PlacementStores,
    policy: SignaturePolicy,
}

impl EntenteService {
    pub fn new(stores: PlacementStores, policy: SignaturePolicy) -> Self {
        Self { stores, policy }
    }

    pub fn policy(&self) -> &SignaturePolicy {
        &self.policy
    }

    pub fn create_draft(
        &self,
        candidature_id: CandidatureId,
        missions_objectifs: &str,
    ) -> Result<EntenteStage, PlacementError> {
        let missions = missions_objectifs.trim();
        if missions.is_empty() {
            return Err(PlacementError::validation(MISSIONS_REQUIRED));
        }

        let candidature = load_candidature(&self.stores, candidature_id)?;
        if candidature.status != CandidatureStatus::Accepted {
            warn!(%candidature_id, status = %candidature.status, "entente refused for unaccepted candidature");
            return Err(PlacementError::invalid_state(CANDIDATURE_NOT_ACCEPTED));
        }
        if self.stores.ententes.exists_for_candidature(candidature_id)? {
            return Err(PlacementError::Conflict(ENTENTE_EXISTS.to_string()));
        }

        let record = EntenteStage {
            id: self.stores.ententes.next_id()?,
            candidature_id,
            professeur_id: None,
            gestionnaire_id: None,
            statut: EntenteStatut::Brouillon,
            missions_objectifs: missions.to_string(),
            date_signature_etudiant: None,
            date_signature_employeur: None,
            date_signature_gestionnaire: None,
            date_validation: None,
            created_at: Utc::now(),
            version: 0,
        };

        let stored = self
            .stores
            .ententes
            .insert(record)
            .map_err(|err| PlacementError::on_insert(err, ENTENTE_EXISTS))?;
        info!(entente_id = %stored.id, %candidature_id, "entente drafted");
        Ok(stored)
    }

    pub fn update_missions(
        &self,
        entente_id: EntenteId,
        missions_objectifs: &str,
    ) -> Result<EntenteStage, PlacementError> {
        let missions = missions_objectifs.trim();
        if missions.is_empty() {
            return Err(PlacementError::validation(MISSIONS_REQUIRED));
        }

        let mut entente = self.load(entente_id)?;
        if entente.statut != EntenteStatut::Brouillon {
            return Err(PlacementError::invalid_state(ENTENTE_NOT_DRAFT));
        }
        entente.missions_objectifs = missions.to_string();
        self.save(entente)
    }

    pub fn assign_professeur(
        &self,
        entente_id: EntenteId,
        professeur_id: ProfesseurId,
    ) -> Result<EntenteStage, PlacementError> {
        let mut entente = self.load(entente_id)?;
        entente.professeur_id = Some(professeur_id);
        let stored = self.save(entente)?;
        info!(%entente_id, %professeur_id, "professeur assigned to entente");
        Ok(stored)
    }

    /// Hands the draft over for signature; the requesting manager becomes its countersigner.
    pub fn request_signatures(
        &self,
        entente_id: EntenteId,
        gestionnaire_id: GestionnaireId,
    ) -> Result<EntenteStage, PlacementError> {
        let mut entente = self.load(entente_id)?;
        if !entente
            .statut
            .can_transition_to(EntenteStatut::EnAttenteSignature)
        {
            return Err(PlacementError::invalid_state(ENTENTE_NOT_DRAFT));
        }
        entente.statut = EntenteStatut::EnAttenteSignature;
        entente.gestionnaire_id = Some(gestionnaire_id);
        let stored = self.save(entente)?;
        info!(
            %entente_id,
            %gestionnaire_id,
            from = %EntenteStatut::Brouillon,
            to = %stored.statut,
            "entente awaiting signatures"
        );
        Ok(stored)
    }

    pub fn signer_par_etudiant(
        &self,
        entente_id: EntenteId,
        student_id: StudentId,
    ) -> Result<EntenteStage, PlacementError> {
        let result = self.load(entente_id).and_then(|entente| {
            let candidature = load_candidature(&self.stores, entente.candidature_id)?;
            if candidature.student_id != student_id {
                return Err(PlacementError::ownership(STUDENT_CANNOT_SIGN));
            }
            self.sign(entente, Signatory::Etudiant)
        });
        log_refusal(entente_id, Signatory::Etudiant, &result);
        result
    }

    pub fn signer_par_employeur(
        &self,
        entente_id: EntenteId,
        employeur_id: EmployeurId,
    ) -> Result<EntenteStage, PlacementError> {
        let result = self.load(entente_id).and_then(|entente| {
            let candidature = load_candidature(&self.stores, entente.candidature_id)?;
            let offer = load_offer(&self.stores, candidature.offer_id)?;
            if offer.employeur_id != employeur_id {
                return Err(PlacementError::ownership(EMPLOYER_CANNOT_SIGN));
            }
            self.sign(entente, Signatory::Employeur)
        });
        log_refusal(entente_id, Signatory::Employeur, &result);
        result
    }

    pub fn signer_par_gestionnaire(
        &self,
        entente_id: EntenteId,
        gestionnaire_id: GestionnaireId,
    ) -> Result<EntenteStage, PlacementError> {
        let result = self.load(entente_id).and_then(|entente| {
            if entente.gestionnaire_id != Some(gestionnaire_id) {
                return Err(PlacementError::ownership(MANAGER_CANNOT_SIGN));
            }
            self.sign(entente, Signatory::Gestionnaire)
        });
        log_refusal(entente_id, Signatory::Gestionnaire, &result);
        result
    }

    pub fn get(&self, entente_id: EntenteId) -> Result<EntenteStage, PlacementError> {
        self.load(entente_id)
    }

    fn sign(
        &self,
        mut entente: EntenteStage,
        signatory: Signatory,
    ) -> Result<EntenteStage, PlacementError> {
        // Signatures are collected only while the entente can still become VALIDEE.
        if !entente.statut.can_transition_to(EntenteStatut::Validee) {
            return Err(PlacementError::invalid_state(ENTENTE_NOT_AWAITING_SIGNATURE));
        }
        if entente.signature(signatory).is_some() {
            return Err(PlacementError::invalid_state(ALREADY_SIGNED));
        }

        let now = Utc::now();
        entente.record_signature(signatory, now);
        if self.policy.is_satisfied(&entente) {
            entente.statut = EntenteStatut::Validee;
            entente.date_validation = Some(now);
        }

        let stored = self.save(entente)?;
        info!(
            entente_id = %stored.id,
            %signatory,
            statut = %stored.statut,
            missing = ?self.policy.missing(&stored),
            "entente signed"
        );
        Ok(stored)
    }

    fn load(&self, entente_id: EntenteId) -> Result<EntenteStage, PlacementError> {
        load_entente(&self.stores, entente_id)
    }

    fn save(&self, entente: EntenteStage) -> Result<EntenteStage, PlacementError> {
        self.stores
            .ententes
            .update(entente)
            .map_err(|err| PlacementError::on_update(err, ENTENTE_STALE))
    }
}

fn log_refusal(
    entente_id: EntenteId,
    signatory: Signatory,
    result: &Result<EntenteStage, PlacementError>,
) {
    if let Err(err) = result {
        warn!(%entente_id, %signatory, kind = err.kind(), reason = %err, "signature refused");
    }
}

pub(crate) fn load_entente(
    stores: &PlacementStores,
    entente_id: EntenteId,
) -> Result<EntenteStage, PlacementError> {
    stores
        .ententes
        .fetch(entente_id)?
        .ok_or_else(|| PlacementError::not_found(ENTENTE_NOT_FOUND))
}
