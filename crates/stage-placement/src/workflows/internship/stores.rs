use std::sync::Arc;

use super::memory::{
    InMemoryCandidatureRepository, InMemoryConvocationRepository, InMemoryEntenteRepository,
    InMemoryEvaluationRepository, InMemoryOfferCatalog,
};
use super::repository::{
    CandidatureRepository, ConvocationRepository, EntenteRepository, EvaluationRepository,
    OfferCatalog,
};

/// Handles to every store the placement services read from or write to.
#[derive(Clone)]
pub struct PlacementStores {
    pub candidatures: Arc<dyn CandidatureRepository>,
    pub ententes: Arc<dyn EntenteRepository>,
    pub convocations: Arc<dyn ConvocationRepository>,
    pub evaluations: Arc<dyn EvaluationRepository>,
    pub offers: Arc<dyn OfferCatalog>,
}

impl PlacementStores {
    pub fn in_memory(offers: InMemoryOfferCatalog) -> Self {
        Self {
            candidatures: Arc::new(InMemoryCandidatureRepository::default()),
            ententes: Arc::new(InMemoryEntenteRepository::default()),
            convocations: Arc::new(InMemoryConvocationRepository::default()),
            evaluations: Arc::new(InMemoryEvaluationRepository::default()),
            offers: Arc::new(offers),
        }
    }
}
