use chrono::{DateTime, Utc};
use tracing::info;

use super::candidatures::{load_candidature, load_offer};
use super::domain::{
    CandidatureId, CandidatureStatus, Convocation, ConvocationId, ConvocationStatut, EmployeurId,
    StudentId,
};
use super::error::PlacementError;
use super::messages::*;
use super::stores::PlacementStores;

/// Interview invitations. Peripheral to the candidature machine: convoking a student
/// never changes the candidature status.
pub struct ConvocationService {
    stores: PlacementStores,
}

impl ConvocationService {
    pub fn new(stores: PlacementStores) -> Self {
        Self { stores }
    }

    pub fn convoke(
        &self,
        candidature_id: CandidatureId,
        employeur_id: EmployeurId,
        scheduled_at: DateTime<Utc>,
        location: &str,
        message: &str,
    ) -> Result<Convocation, PlacementError> {
        if location.trim().is_empty() {
            return Err(PlacementError::validation(CONVOCATION_LOCATION_REQUIRED));
        }

        let candidature = load_candidature(&self.stores, candidature_id)?;
        let offer = load_offer(&self.stores, candidature.offer_id)?;
        if offer.employeur_id != employeur_id {
            return Err(PlacementError::ownership(NOT_YOUR_OFFER));
        }
        if candidature.status != CandidatureStatus::Pending {
            return Err(PlacementError::invalid_state(CONVOCATION_REQUIRES_PENDING));
        }

        let record = Convocation {
            id: self.stores.convocations.next_id()?,
            candidature_id,
            scheduled_at,
            location: location.trim().to_string(),
            message: message.trim().to_string(),
            statut: ConvocationStatut::EnAttente,
            created_at: Utc::now(),
            version: 0,
        };

        let stored = self
            .stores
            .convocations
            .insert(record)
            .map_err(|err| PlacementError::on_insert(err, CONVOCATION_EXISTS))?;
        info!(convocation_id = %stored.id, %candidature_id, %scheduled_at, "student convoked");
        Ok(stored)
    }

    pub fn respond(
        &self,
        convocation_id: ConvocationId,
        student_id: StudentId,
        accept: bool,
    ) -> Result<Convocation, PlacementError> {
        let mut convocation = self
            .stores
            .convocations
            .fetch(convocation_id)?
            .ok_or_else(|| PlacementError::not_found(CONVOCATION_NOT_FOUND))?;
        let candidature = load_candidature(&self.stores, convocation.candidature_id)?;
        if candidature.student_id != student_id {
            return Err(PlacementError::ownership(NOT_YOUR_CANDIDATURE));
        }
        if convocation.statut != ConvocationStatut::EnAttente {
            return Err(PlacementError::invalid_state(CONVOCATION_ALREADY_ANSWERED));
        }

        convocation.statut = if accept {
            ConvocationStatut::Acceptee
        } else {
            ConvocationStatut::Refusee
        };
        let stored = self
            .stores
            .convocations
            .update(convocation)
            .map_err(|err| PlacementError::on_update(err, CONVOCATION_STALE))?;
        info!(%convocation_id, statut = stored.statut.label(), "convocation answered");
        Ok(stored)
    }
}
