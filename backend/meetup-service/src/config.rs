/// Configuration management for Meetup Service
///
/// Everything is read from environment variables; `main` loads a `.env` file
/// first when one exists.
use crate::services::DEFAULT_MAX_PAGE_SIZE;
use db_pool::env_utils::{parse_env_strict, parse_env_with_default};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token validation settings
    pub auth: AuthConfig,
    /// Meetup listing settings
    pub meetups: MeetupsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Actix worker threads
    pub workers: usize,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Refuse to start without a JWT public key
    pub require_public_key: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetupsConfig {
    /// Upper bound applied to `limit` on the index route
    pub max_page_size: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let max_page_size: i64 = parse_env_strict("MEETUP_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?;
        if max_page_size < 1 {
            return Err(format!(
                "MEETUP_MAX_PAGE_SIZE must be at least 1, got {max_page_size}"
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("MEETUP_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_strict("MEETUP_SERVICE_PORT", 8085)?,
                workers: parse_env_with_default::<usize>("MEETUP_SERVICE_WORKERS", 4).max(1),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/meetapp".to_string()),
                run_migrations: parse_env_with_default("RUN_MIGRATIONS", true),
            },
            auth: AuthConfig {
                require_public_key: production,
            },
            meetups: MeetupsConfig { max_page_size },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "MEETUP_SERVICE_HOST",
        "MEETUP_SERVICE_PORT",
        "MEETUP_SERVICE_WORKERS",
        "CORS_ALLOWED_ORIGINS",
        "DATABASE_URL",
        "RUN_MIGRATIONS",
        "MEETUP_MAX_PAGE_SIZE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.bind_address(), "0.0.0.0:8085");
        assert_eq!(config.app.workers, 4);
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.database.url, "postgresql://localhost/meetapp");
        assert!(config.database.run_migrations);
        assert!(!config.auth.require_public_key);
        assert_eq!(config.meetups.max_page_size, DEFAULT_MAX_PAGE_SIZE);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("MEETUP_SERVICE_PORT", "9000");
        std::env::set_var("MEETUP_MAX_PAGE_SIZE", "25");
        std::env::set_var("RUN_MIGRATIONS", "false");

        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9000);
        assert_eq!(config.meetups.max_page_size, 25);
        assert!(!config.database.run_migrations);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_page_size_is_rejected() {
        clear_env();

        std::env::set_var("MEETUP_MAX_PAGE_SIZE", "lots");
        assert!(Config::from_env().is_err());

        std::env::set_var("MEETUP_MAX_PAGE_SIZE", "0");
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_requires_explicit_cors() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().is_err());

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://meetapp.dev");
        let config = Config::from_env().unwrap();
        assert!(config.is_production());
        assert!(config.auth.require_public_key);

        clear_env();
    }

    #[test]
    fn test_database_url_is_redacted() {
        let db = DatabaseConfig {
            url: "postgresql://user:hunter2@db/meetapp".to_string(),
            run_migrations: true,
        };
        assert!(!format!("{db:?}").contains("hunter2"));
    }
}
