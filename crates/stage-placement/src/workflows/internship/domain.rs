use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::signature::Signatory;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifier wrapper for a student's application.
    CandidatureId
);
identifier!(
    /// Identifier wrapper for an internship agreement.
    EntenteId
);
identifier!(OfferId);
identifier!(CvId);
identifier!(StudentId);
identifier!(EmployeurId);
identifier!(ProfesseurId);
identifier!(GestionnaireId);
identifier!(ConvocationId);
identifier!(EvaluationId);

/// Employer-posted internship offer. Owned by the offer catalog; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipOffer {
    pub id: OfferId,
    pub employeur_id: EmployeurId,
    pub title: String,
    /// Hourly remuneration in cents.
    pub remuneration_cents: u32,
    pub address: String,
    pub duration_weeks: u16,
    pub start_date: NaiveDate,
}

/// Lifecycle of a candidature. Moves forward only, see [`CandidatureStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidatureStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ACCEPTEDBYEMPLOYEUR")]
    AcceptedByEmployeur,
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "CONVENED")]
    Convened,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl CandidatureStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::AcceptedByEmployeur => "ACCEPTEDBYEMPLOYEUR",
            Self::Accepted => "ACCEPTED",
            Self::Convened => "CONVENED",
            Self::Rejected => "REJECTED",
        }
    }

    /// The only edges the candidature machine may take.
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::AcceptedByEmployeur)
                | (Self::Pending, Self::Rejected)
                | (Self::AcceptedByEmployeur, Self::Accepted)
                | (Self::AcceptedByEmployeur, Self::Rejected)
        )
    }
}

impl fmt::Display for CandidatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A student's application to an internship offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidature {
    pub id: CandidatureId,
    pub student_id: StudentId,
    pub offer_id: OfferId,
    pub cv_id: CvId,
    pub status: CandidatureStatus,
    pub application_date: DateTime<Utc>,
    /// Optimistic concurrency token, bumped by the store on every write.
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntenteStatut {
    #[serde(rename = "BROUILLON")]
    Brouillon,
    #[serde(rename = "EN_ATTENTE_SIGNATURE")]
    EnAttenteSignature,
    #[serde(rename = "VALIDEE")]
    Validee,
}

impl EntenteStatut {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Brouillon => "BROUILLON",
            Self::EnAttenteSignature => "EN_ATTENTE_SIGNATURE",
            Self::Validee => "VALIDEE",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Brouillon, Self::EnAttenteSignature) | (Self::EnAttenteSignature, Self::Validee)
        )
    }
}

impl fmt::Display for EntenteStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Formal internship agreement attached to exactly one accepted candidature.
///
/// Offer details (remuneration, address, duration, start date) are never copied here;
/// they are resolved through the candidature when a view is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntenteStage {
    pub id: EntenteId,
    pub candidature_id: CandidatureId,
    pub professeur_id: Option<ProfesseurId>,
    pub gestionnaire_id: Option<GestionnaireId>,
    pub statut: EntenteStatut,
    pub missions_objectifs: String,
    pub date_signature_etudiant: Option<DateTime<Utc>>,
    pub date_signature_employeur: Option<DateTime<Utc>>,
    pub date_signature_gestionnaire: Option<DateTime<Utc>>,
    pub date_validation: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub version: u64,
}

impl EntenteStage {
    pub fn signature(&self, signatory: Signatory) -> Option<DateTime<Utc>> {
        match signatory {
            Signatory::Etudiant => self.date_signature_etudiant,
            Signatory::Employeur => self.date_signature_employeur,
            Signatory::Gestionnaire => self.date_signature_gestionnaire,
        }
    }

    pub(crate) fn record_signature(&mut self, signatory: Signatory, at: DateTime<Utc>) {
        let slot = match signatory {
            Signatory::Etudiant => &mut self.date_signature_etudiant,
            Signatory::Employeur => &mut self.date_signature_employeur,
            Signatory::Gestionnaire => &mut self.date_signature_gestionnaire,
        };
        *slot = Some(at);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvocationStatut {
    #[serde(rename = "EN_ATTENTE")]
    EnAttente,
    #[serde(rename = "ACCEPTEE")]
    Acceptee,
    #[serde(rename = "REFUSEE")]
    Refusee,
}

impl ConvocationStatut {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EnAttente => "EN_ATTENTE",
            Self::Acceptee => "ACCEPTEE",
            Self::Refusee => "REFUSEE",
        }
    }
}

/// Interview invitation sent by an employer for a pending candidature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Convocation {
    pub id: ConvocationId,
    pub candidature_id: CandidatureId,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub message: String,
    pub statut: ConvocationStatut,
    pub created_at: DateTime<Utc>,
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationKind {
    /// The employer evaluates the intern.
    Stagiaire,
    /// The supervising professor evaluates the workplace.
    MilieuStage,
}

impl EvaluationKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stagiaire => "stagiaire",
            Self::MilieuStage => "milieu_stage",
        }
    }
}

/// End-of-internship evaluation filed against a validated entente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub entente_id: EntenteId,
    pub kind: EvaluationKind,
    pub author_id: u64,
    pub score: u8,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}
