use super::{types::Config, ConfigError};

/// Largest page the upstream catalog API will return.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Longest search debounce accepted, in milliseconds.
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Session idle timeout is not 0
/// - Catalog page size is between 1 and 50
/// - Catalog market is a two-letter uppercase code
/// - Search debounce is at most five seconds
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.session_idle_secs == 0 {
        return Err(ConfigError::ValidationError(
            "server.session_idle_secs cannot be 0".to_string(),
        ));
    }

    // Catalog validation
    if config.catalog.page_size == 0 || config.catalog.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "catalog.page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let market = &config.catalog.market;
    if market.len() != 2 || !market.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::ValidationError(format!(
            "catalog.market must be a two-letter uppercase code, got '{}'",
            market
        )));
    }

    // View validation
    if config.view.search_debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
        return Err(ConfigError::ValidationError(format!(
            "view.search_debounce_ms cannot exceed {}",
            MAX_SEARCH_DEBOUNCE_MS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, ServerConfig, ViewConfig};
    use std::net::IpAddr;
    use tokio_test::assert_ok;

    #[test]
    fn test_validate_valid_config() {
        assert_ok!(validate_config(&Config::default()));
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_session_idle_fails() {
        let config = Config {
            server: ServerConfig {
                session_idle_secs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("session_idle_secs"));
    }

    #[test]
    fn test_validate_page_size_bounds() {
        for page_size in [0, 51] {
            let config = Config {
                catalog: CatalogConfig {
                    page_size,
                    ..Default::default()
                },
                ..Default::default()
            };
            assert!(matches!(
                validate_config(&config),
                Err(ConfigError::ValidationError(_))
            ));
        }

        let config = Config {
            catalog: CatalogConfig {
                page_size: 50,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_market_code() {
        for market in ["au", "AUS", "", "A1"] {
            let config = Config {
                catalog: CatalogConfig {
                    market: market.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            };
            assert!(validate_config(&config).is_err(), "market {:?}", market);
        }
    }

    #[test]
    fn test_validate_debounce_limit() {
        let config = Config {
            view: ViewConfig {
                search_debounce_ms: 10_000,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("search_debounce_ms"));
    }
}
