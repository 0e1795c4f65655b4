use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_pool_size: u32,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub openlibrary_base_url: String,
    pub openlibrary_timeout: Duration,
}

impl Config {
    /// Read configuration from the environment once at process start.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://library_catalog.db?mode=rwc".to_string()),
            database_pool_size: env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            openlibrary_base_url: env::var("OPENLIBRARY_BASE_URL")
                .unwrap_or_else(|_| "https://openlibrary.org".to_string()),
            openlibrary_timeout: Duration::from_secs(
                env::var("OPENLIBRARY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "DATABASE_URL",
            "DATABASE_POOL_SIZE",
            "PORT",
            "CORS_ALLOWED_ORIGINS",
            "OPENLIBRARY_BASE_URL",
            "OPENLIBRARY_TIMEOUT_SECS",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_env_is_empty() {
        clear_env();
        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://library_catalog.db?mode=rwc");
        assert_eq!(config.database_pool_size, 20);
        assert_eq!(config.port, 8000);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.openlibrary_base_url, "https://openlibrary.org");
        assert_eq!(config.openlibrary_timeout, Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn reads_overrides() {
        clear_env();
        unsafe {
            env::set_var("DATABASE_URL", "sqlite://test.db");
            env::set_var("DATABASE_POOL_SIZE", "5");
            env::set_var("PORT", "9100");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://a.example, http://b.example");
            env::set_var("OPENLIBRARY_TIMEOUT_SECS", "3");
        }
        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://test.db");
        assert_eq!(config.database_pool_size, 5);
        assert_eq!(config.port, 9100);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://a.example", "http://b.example"]
        );
        assert_eq!(config.openlibrary_timeout, Duration::from_secs(3));
        clear_env();
    }
}
