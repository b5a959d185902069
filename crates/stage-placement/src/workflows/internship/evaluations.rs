use chrono::Utc;
use tracing::info;

use super::candidatures::{load_candidature, load_offer};
use super::domain::{EntenteId, EntenteStatut, Evaluation, EvaluationKind};
use super::ententes::load_entente;
use super::error::PlacementError;
use super::identity::Actor;
use super::messages::*;
use super::stores::PlacementStores;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// End-of-internship evaluations, filed once the entente is validated.
pub struct EvaluationService {
    stores: PlacementStores,
}

impl EvaluationService {
    pub fn new(stores: PlacementStores) -> Self {
        Self { stores }
    }

    /// The employer rates the intern; the assigned professor rates the workplace.
    pub fn submit(
        &self,
        entente_id: EntenteId,
        actor: &Actor,
        kind: EvaluationKind,
        score: u8,
        comments: &str,
    ) -> Result<Evaluation, PlacementError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(PlacementError::validation(SCORE_OUT_OF_RANGE));
        }

        let entente = load_entente(&self.stores, entente_id)?;
        match kind {
            EvaluationKind::Stagiaire => {
                let employeur_id = actor.as_employeur()?;
                let candidature = load_candidature(&self.stores, entente.candidature_id)?;
                let offer = load_offer(&self.stores, candidature.offer_id)?;
                if offer.employeur_id != employeur_id {
                    return Err(PlacementError::ownership(NOT_YOUR_OFFER));
                }
            }
            EvaluationKind::MilieuStage => {
                let professeur_id = actor.as_professeur()?;
                if entente.professeur_id != Some(professeur_id) {
                    return Err(PlacementError::ownership(NOT_ASSIGNED_PROFESSOR));
                }
            }
        }
        if entente.statut != EntenteStatut::Validee {
            return Err(PlacementError::invalid_state(ENTENTE_NOT_VALIDATED));
        }

        let record = Evaluation {
            id: self.stores.evaluations.next_id()?,
            entente_id,
            kind,
            author_id: actor.id,
            score,
            comments: comments.trim().to_string(),
            submitted_at: Utc::now(),
        };
        let stored = self
            .stores
            .evaluations
            .insert(record)
            .map_err(|err| PlacementError::on_insert(err, EVALUATION_EXISTS))?;
        info!(evaluation_id = %stored.id, %entente_id, kind = kind.label(), score, "evaluation submitted");
        Ok(stored)
    }
}
