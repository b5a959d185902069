use metrics_exporter_prometheus::PrometheusHandle;
use stage_placement::error::AppError;
use stage_placement::workflows::internship::{InMemoryOfferCatalog, OfferImporter};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the offer catalog from CSV, or starts with an empty catalog when no path is given.
pub(crate) fn load_offer_catalog(path: Option<&Path>) -> Result<InMemoryOfferCatalog, AppError> {
    match path {
        Some(path) => {
            let catalog = OfferImporter::from_path(path)?;
            info!(path = %path.display(), offers = catalog.len(), "offer catalog imported");
            Ok(catalog)
        }
        None => Ok(InMemoryOfferCatalog::default()),
    }
}

const SAMPLE_OFFERS: &str = "\
id,employeur_id,title,remuneration_cents,address,duration_weeks,start_date
1,100,Développeur backend Rust,2350,\"1111 rue Lapierre, Montréal\",15,2025-05-05
2,200,Analyste assurance qualité,2050,\"45 boulevard Décarie, Laval\",15,2025-05-12
";

/// Built-in catalog for the demo, parsed by the same importer as operator CSV files.
pub(crate) fn sample_offer_catalog() -> Result<InMemoryOfferCatalog, AppError> {
    Ok(OfferImporter::from_reader(SAMPLE_OFFERS.as_bytes())?)
}
