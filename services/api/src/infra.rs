use metrics_exporter_prometheus::PrometheusHandle;
use spread_advisor::catalog::CatalogHandle;
use spread_advisor::config::AppConfig;
use spread_advisor::error::AppError;
use spread_advisor::recommendation::RecommendationService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the configured catalog and wrap it in a recommendation service.
pub(crate) fn build_service(config: &AppConfig) -> Result<Arc<RecommendationService>, AppError> {
    let handle = CatalogHandle::load(config.catalog.source())?;
    let catalog = handle.current();
    info!(
        spreads = catalog.len(),
        rejected = catalog.rejected(),
        source = ?handle.source(),
        "spread catalog ready"
    );

    Ok(Arc::new(RecommendationService::new(
        Arc::new(handle),
        config.scoring.clone(),
    )))
}
