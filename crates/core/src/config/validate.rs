use super::{types::Config, AuthMethod, ConfigError};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().unwrap_or("").is_empty()
    {
        return Err(ConfigError::ValidationError(
            "auth.api_key must be set when auth.method = \"api_key\"".to_string(),
        ));
    }
    if config.auth.method == AuthMethod::ApiKey && config.auth.api_key_user_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.api_key_user_id cannot be blank".to_string(),
        ));
    }

    let search = &config.search;
    if search.default_page_size == 0 || search.max_page_size == 0 {
        return Err(ConfigError::ValidationError(
            "search page sizes must be greater than 0".to_string(),
        ));
    }
    if search.default_page_size > search.max_page_size {
        return Err(ConfigError::ValidationError(format!(
            "search.default_page_size ({}) exceeds search.max_page_size ({})",
            search.default_page_size, search.max_page_size
        )));
    }
    if search.hot_default_limit == 0 || search.hot_default_limit > search.hot_max_limit {
        return Err(ConfigError::ValidationError(
            "search.hot_default_limit must be between 1 and search.hot_max_limit".to_string(),
        ));
    }
    if search.suggestion_suffixes.iter().all(|s| s.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "search.suggestion_suffixes must contain at least one non-blank suffix".to_string(),
        ));
    }

    if config.telemetry.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "telemetry.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}
