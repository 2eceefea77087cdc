pub mod auth;
pub mod catalog;
pub mod config;
pub mod download;
pub mod metrics;
pub mod requests;
pub mod search;
pub mod telemetry;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Identity, NoneAuthenticator,
};
pub use catalog::{
    CatalogError, CatalogStore, Category, DownloadRecord, HelpRequest, ListedResource,
    NewCategory, Resource, SearchRecord, SqliteCatalog,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use download::{DownloadError, DownloadReceipt, DownloadRecorder, DownloadRequest};
pub use requests::{HelpDesk, HelpRequestError, HelpRequestReceipt, NewHelpRequest};
pub use search::{
    CategorySummary, ClientInfo, HotResource, SearchPage, SearchRequest, SearchService, SortMode,
    SuggestionEngine,
};
pub use telemetry::{create_telemetry_system, SearchTelemetry, TelemetryWriter};
