//! Internship placement: candidature acceptance, entente signature, and the
//! role-scoped directory over both.

pub mod candidatures;
pub mod convocations;
pub mod directory;
pub mod domain;
pub mod ententes;
pub mod error;
pub mod evaluations;
pub mod identity;
pub mod memory;
mod messages;
pub mod offers;
pub mod repository;
pub mod router;
pub mod service;
pub mod signature;
pub mod stores;

#[cfg(test)]
mod tests;

pub use candidatures::CandidatureService;
pub use convocations::ConvocationService;
pub use directory::{EntenteView, PlacementDirectory};
pub use domain::{
    Candidature, CandidatureId, CandidatureStatus, Convocation, ConvocationId, ConvocationStatut,
    CvId, EmployeurId, EntenteId, EntenteStage, EntenteStatut, Evaluation, EvaluationId,
    EvaluationKind, GestionnaireId, InternshipOffer, OfferId, ProfesseurId, StudentId,
};
pub use ententes::EntenteService;
pub use error::PlacementError;
pub use evaluations::EvaluationService;
pub use identity::{Actor, Role};
pub use memory::{
    InMemoryCandidatureRepository, InMemoryConvocationRepository, InMemoryEntenteRepository,
    InMemoryEvaluationRepository, InMemoryOfferCatalog,
};
pub use offers::{OfferImportError, OfferImporter};
pub use repository::{
    CandidatureRepository, ConvocationRepository, EntenteRepository, EvaluationRepository,
    OfferCatalog, RepositoryError,
};
pub use router::placement_router;
pub use service::InternshipPlacement;
pub use signature::{Signatory, SignaturePolicy, SignaturePolicyError};
pub use stores::PlacementStores;
