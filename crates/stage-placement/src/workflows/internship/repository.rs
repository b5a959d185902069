use super::domain::{
    Candidature, CandidatureId, CandidatureStatus, Convocation, ConvocationId, EmployeurId,
    EntenteId, EntenteStage, EntenteStatut, Evaluation, EvaluationId, InternshipOffer, OfferId, ProfesseurId,
    StudentId,
};

/// Storage for candidatures.
///
/// `next_id` hands out identifiers from a sequence owned by the store, so every service
/// sharing the store draws from it. `insert` must reject a second record for the same
/// (student, offer) pair with [`RepositoryError::Conflict`] and a reused identifier with
/// [`RepositoryError::DuplicateId`]. `update` is a compare-and-swap on `version`: the stored
/// version must equal the one carried by the record, otherwise
/// [`RepositoryError::StaleVersion`] is returned and nothing is written.
pub trait CandidatureRepository: Send + Sync {
    fn next_id(&self) -> Result<CandidatureId, RepositoryError>;
    fn insert(&self, record: Candidature) -> Result<Candidature, RepositoryError>;
    fn update(&self, record: Candidature) -> Result<Candidature, RepositoryError>;
    fn fetch(&self, id: CandidatureId) -> Result<Option<Candidature>, RepositoryError>;
    fn by_student(&self, student_id: StudentId) -> Result<Vec<Candidature>, RepositoryError>;
    fn by_offers(&self, offer_ids: &[OfferId]) -> Result<Vec<Candidature>, RepositoryError>;
    fn by_status(&self, status: CandidatureStatus) -> Result<Vec<Candidature>, RepositoryError>;
    fn all(&self) -> Result<Vec<Candidature>, RepositoryError>;
}

/// Storage for ententes. At most one record may reference a given candidature.
pub trait EntenteRepository: Send + Sync {
    fn next_id(&self) -> Result<EntenteId, RepositoryError>;
    fn insert(&self, record: EntenteStage) -> Result<EntenteStage, RepositoryError>;
    fn update(&self, record: EntenteStage) -> Result<EntenteStage, RepositoryError>;
    fn fetch(&self, id: EntenteId) -> Result<Option<EntenteStage>, RepositoryError>;
    fn exists_for_candidature(&self, candidature_id: CandidatureId)
        -> Result<bool, RepositoryError>;
    fn by_candidatures(
        &self,
        candidature_ids: &[CandidatureId],
    ) -> Result<Vec<EntenteStage>, RepositoryError>;
    fn by_professeur(
        &self,
        professeur_id: ProfesseurId,
    ) -> Result<Vec<EntenteStage>, RepositoryError>;
    fn by_status(&self, statut: EntenteStatut) -> Result<Vec<EntenteStage>, RepositoryError>;
    fn all(&self) -> Result<Vec<EntenteStage>, RepositoryError>;
}

/// Storage for interview invitations. One convocation per candidature.
pub trait ConvocationRepository: Send + Sync {
    fn next_id(&self) -> Result<ConvocationId, RepositoryError>;
    fn insert(&self, record: Convocation) -> Result<Convocation, RepositoryError>;
    fn update(&self, record: Convocation) -> Result<Convocation, RepositoryError>;
    fn fetch(&self, id: ConvocationId) -> Result<Option<Convocation>, RepositoryError>;
    fn by_candidatures(
        &self,
        candidature_ids: &[CandidatureId],
    ) -> Result<Vec<Convocation>, RepositoryError>;
    fn all(&self) -> Result<Vec<Convocation>, RepositoryError>;
}

/// Storage for evaluations. One evaluation per (entente, kind).
pub trait EvaluationRepository: Send + Sync {
    fn next_id(&self) -> Result<EvaluationId, RepositoryError>;
    fn insert(&self, record: Evaluation) -> Result<Evaluation, RepositoryError>;
    fn by_entente(&self, entente_id: EntenteId) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Read-only view over the employer-owned offer catalog.
pub trait OfferCatalog: Send + Sync {
    fn fetch(&self, id: OfferId) -> Result<Option<InternshipOffer>, RepositoryError>;
    fn by_employeur(
        &self,
        employeur_id: EmployeurId,
    ) -> Result<Vec<InternshipOffer>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("identifier {0} is already in use")]
    DuplicateId(u64),
    #[error("record not found")]
    NotFound,
    #[error("record was modified concurrently")]
    StaleVersion,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
