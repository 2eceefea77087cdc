use std::sync::Arc;

use pansearch_core::{
    Authenticator, CatalogStore, Config, DownloadRecorder, HelpDesk, SanitizedConfig,
    SearchService, SearchTelemetry,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    search: SearchService,
    downloads: DownloadRecorder,
    help_desk: HelpDesk,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        catalog: Arc<dyn CatalogStore>,
        telemetry: SearchTelemetry,
    ) -> Self {
        let search = SearchService::new(Arc::clone(&catalog), telemetry, config.search.clone());
        let downloads = DownloadRecorder::new(Arc::clone(&catalog));
        let help_desk = HelpDesk::new(catalog);

        Self {
            config,
            authenticator,
            search,
            downloads,
            help_desk,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn downloads(&self) -> &DownloadRecorder {
        &self.downloads
    }

    pub fn help_desk(&self) -> &HelpDesk {
        &self.help_desk
    }
}
