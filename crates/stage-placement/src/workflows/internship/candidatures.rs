use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Candidature, CandidatureId, CandidatureStatus, CvId, EmployeurId, InternshipOffer, OfferId,
    StudentId,
};
use super::error::PlacementError;
use super::messages::*;
use super::stores::PlacementStores;

/// Candidature state machine: submission, then employer and student decisions.
///
/// ```text
/// PENDING ──accept(employeur)──▶ ACCEPTEDBYEMPLOYEUR ──accept(étudiant)──▶ ACCEPTED
///    │                                   │
///    └──reject(employeur)──▶ REJECTED ◀──┴──reject(employeur | étudiant)
/// ```
pub struct CandidatureService {
    stores: PlacementStores,
}

impl CandidatureService {
    pub fn new(stores: PlacementStores) -> Self {
        Self { stores }
    }

    /// Submit an application. A student may apply only once to a given offer.
    pub fn apply(
        &self,
        student_id: StudentId,
        offer_id: OfferId,
        cv_id: CvId,
    ) -> Result<Candidature, PlacementError> {
        load_offer(&self.stores, offer_id)?;

        let record = Candidature {
            id: self.stores.candidatures.next_id()?,
            student_id,
            offer_id,
            cv_id,
            status: CandidatureStatus::Pending,
            application_date: Utc::now(),
            version: 0,
        };

        let stored = self
            .stores
            .candidatures
            .insert(record)
            .map_err(|err| PlacementError::on_insert(err, ALREADY_APPLIED))
            .inspect_err(|err| {
                warn!(%student_id, %offer_id, kind = err.kind(), "application refused")
            })?;

        info!(candidature_id = %stored.id, %student_id, %offer_id, "candidature submitted");
        Ok(stored)
    }

    pub fn accept_by_employeur(
        &self,
        candidature_id: CandidatureId,
        employeur_id: EmployeurId,
    ) -> Result<Candidature, PlacementError> {
        let result = self
            .load_for_employeur(candidature_id, employeur_id)
            .and_then(|candidature| {
                match candidature.status {
                    CandidatureStatus::Pending => {}
                    CandidatureStatus::Rejected => {
                        return Err(PlacementError::invalid_state(ALREADY_REJECTED))
                    }
                    CandidatureStatus::Accepted => {
                        return Err(PlacementError::invalid_state(ALREADY_FULLY_ACCEPTED))
                    }
                    CandidatureStatus::AcceptedByEmployeur => {
                        return Err(PlacementError::invalid_state(AWAITING_STUDENT))
                    }
                    CandidatureStatus::Convened => {
                        return Err(PlacementError::invalid_state(CONVENED_IS_FROZEN))
                    }
                }
                self.transition(candidature, CandidatureStatus::AcceptedByEmployeur)
            });
        log_refusal("accept_by_employeur", candidature_id, &result);
        result
    }

    pub fn accept_by_student(
        &self,
        candidature_id: CandidatureId,
        student_id: StudentId,
    ) -> Result<Candidature, PlacementError> {
        let result = self
            .load_for_student(candidature_id, student_id)
            .and_then(|candidature| {
                match candidature.status {
                    CandidatureStatus::AcceptedByEmployeur => {}
                    CandidatureStatus::Pending => {
                        return Err(PlacementError::invalid_state(EMPLOYER_MUST_ACCEPT_FIRST))
                    }
                    CandidatureStatus::Rejected => {
                        return Err(PlacementError::invalid_state(ALREADY_REJECTED))
                    }
                    CandidatureStatus::Accepted => {
                        return Err(PlacementError::invalid_state(STUDENT_ALREADY_ACCEPTED))
                    }
                    CandidatureStatus::Convened => {
                        return Err(PlacementError::invalid_state(CONVENED_IS_FROZEN))
                    }
                }
                self.transition(candidature, CandidatureStatus::Accepted)
            });
        log_refusal("accept_by_student", candidature_id, &result);
        result
    }

    pub fn reject_by_employeur(
        &self,
        candidature_id: CandidatureId,
        employeur_id: EmployeurId,
    ) -> Result<Candidature, PlacementError> {
        let result = self
            .load_for_employeur(candidature_id, employeur_id)
            .and_then(|candidature| {
                match candidature.status {
                    CandidatureStatus::Pending | CandidatureStatus::AcceptedByEmployeur => {}
                    CandidatureStatus::Rejected => {
                        return Err(PlacementError::invalid_state(ALREADY_REJECTED))
                    }
                    CandidatureStatus::Accepted => {
                        return Err(PlacementError::invalid_state(CANNOT_REJECT_ACCEPTED))
                    }
                    CandidatureStatus::Convened => {
                        return Err(PlacementError::invalid_state(CONVENED_IS_FROZEN))
                    }
                }
                self.transition(candidature, CandidatureStatus::Rejected)
            });
        log_refusal("reject_by_employeur", candidature_id, &result);
        result
    }

    /// A student may only decline an offer the employer already extended.
    pub fn reject_by_student(
        &self,
        candidature_id: CandidatureId,
        student_id: StudentId,
    ) -> Result<Candidature, PlacementError> {
        let result = self
            .load_for_student(candidature_id, student_id)
            .and_then(|candidature| {
                match candidature.status {
                    CandidatureStatus::AcceptedByEmployeur => {}
                    CandidatureStatus::Pending => {
                        return Err(PlacementError::invalid_state(ONLY_REFUSE_EMPLOYER_ACCEPTED))
                    }
                    CandidatureStatus::Rejected => {
                        return Err(PlacementError::invalid_state(ALREADY_REJECTED))
                    }
                    CandidatureStatus::Accepted => {
                        return Err(PlacementError::invalid_state(STUDENT_ALREADY_ACCEPTED))
                    }
                    CandidatureStatus::Convened => {
                        return Err(PlacementError::invalid_state(CONVENED_IS_FROZEN))
                    }
                }
                self.transition(candidature, CandidatureStatus::Rejected)
            });
        log_refusal("reject_by_student", candidature_id, &result);
        result
    }

    pub fn get(&self, candidature_id: CandidatureId) -> Result<Candidature, PlacementError> {
        load_candidature(&self.stores, candidature_id)
    }

    fn load_for_student(
        &self,
        candidature_id: CandidatureId,
        student_id: StudentId,
    ) -> Result<Candidature, PlacementError> {
        let candidature = load_candidature(&self.stores, candidature_id)?;
        if candidature.student_id != student_id {
            return Err(PlacementError::ownership(NOT_YOUR_CANDIDATURE));
        }
        Ok(candidature)
    }

    fn load_for_employeur(
        &self,
        candidature_id: CandidatureId,
        employeur_id: EmployeurId,
    ) -> Result<Candidature, PlacementError> {
        let candidature = load_candidature(&self.stores, candidature_id)?;
        let offer = load_offer(&self.stores, candidature.offer_id)?;
        if offer.employeur_id != employeur_id {
            return Err(PlacementError::ownership(NOT_YOUR_OFFER));
        }
        Ok(candidature)
    }

    fn transition(
        &self,
        mut candidature: Candidature,
        next: CandidatureStatus,
    ) -> Result<Candidature, PlacementError> {
        let previous = candidature.status;
        debug_assert!(previous.can_transition_to(next));
        candidature.status = next;

        let stored = self
            .stores
            .candidatures
            .update(candidature)
            .map_err(|err| PlacementError::on_update(err, CANDIDATURE_STALE))?;

        info!(
            candidature_id = %stored.id,
            from = %previous,
            to = %next,
            version = stored.version,
            "candidature transitioned"
        );
        Ok(stored)
    }
}

fn log_refusal(
    operation: &'static str,
    candidature_id: CandidatureId,
    result: &Result<Candidature, PlacementError>,
) {
    if let Err(err) = result {
        warn!(%candidature_id, operation, kind = err.kind(), reason = %err, "candidature transition refused");
    }
}

pub(crate) fn load_candidature(
    stores: &PlacementStores,
    candidature_id: CandidatureId,
) -> Result<Candidature, PlacementError> {
    stores
        .candidatures
        .fetch(candidature_id)?
        .ok_or_else(|| PlacementError::not_found(CANDIDATURE_NOT_FOUND))
}

pub(crate) fn load_offer(
    stores: &PlacementStores,
    offer_id: OfferId,
) -> Result<InternshipOffer, PlacementError> {
    stores
        .offers
        .fetch(offer_id)?
        .ok_or_else(|| PlacementError::not_found(OFFER_NOT_FOUND))
}
