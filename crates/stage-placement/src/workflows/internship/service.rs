use super::candidatures::CandidatureService;
use super::convocations::ConvocationService;
use super::directory::PlacementDirectory;
use super::ententes::EntenteService;
use super::evaluations::EvaluationService;
use super::memory::InMemoryOfferCatalog;
use super::signature::SignaturePolicy;
use super::stores::PlacementStores;

/// Facade composing every placement service over one set of stores.
pub struct InternshipPlacement {
    pub candidatures: CandidatureService,
    pub ententes: EntenteService,
    pub convocations: ConvocationService,
    pub evaluations: EvaluationService,
    pub directory: PlacementDirectory,
}

impl InternshipPlacement {
    pub fn new(stores: PlacementStores, policy: SignaturePolicy) -> Self {
        Self {
            candidatures: CandidatureService::new(stores.clone()),
            ententes: EntenteService::new(stores.clone(), policy),
            convocations: ConvocationService::new(stores.clone()),
            evaluations: EvaluationService::new(stores.clone()),
            directory: PlacementDirectory::new(stores),
        }
    }

    pub fn in_memory(offers: InMemoryOfferCatalog, policy: SignaturePolicy) -> Self {
        Self::new(PlacementStores::in_memory(offers), policy)
    }
}
