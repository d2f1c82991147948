use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub seating: SeatingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    pub token: Option<String>,
}

/// Authoring bounds shared by every seat block session.
#[derive(Debug, Deserialize, Clone)]
pub struct SeatingConfig {
    #[serde(default = "default_seat_ceiling")]
    pub seat_ceiling: u32,
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
    #[serde(default = "default_max_cols")]
    pub default_max_cols: u32,
    #[serde(default = "default_rows")]
    pub default_rows: u32,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            seat_ceiling: default_seat_ceiling(),
            max_rows: default_max_rows(),
            default_max_cols: default_max_cols(),
            default_rows: default_rows(),
        }
    }
}

fn default_timeout() -> u64 { 30 }
fn default_seat_ceiling() -> u32 { 180 }
fn default_max_rows() -> u32 { 50 }
fn default_max_cols() -> u32 { 20 }
fn default_rows() -> u32 { 10 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SKYBOOK__BACKEND__BASE_URL=http://backend:8080`
            .add_source(config::Environment::with_prefix("SKYBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_seating_defaults() {
        let config = parse(
            r#"
            [server]
            port = 3000

            [backend]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.timeout_seconds, 30);
        assert!(config.backend.token.is_none());
        assert_eq!(config.seating.seat_ceiling, 180);
        assert_eq!(config.seating.max_rows, 50);
        assert_eq!(config.seating.default_max_cols, 20);
        assert_eq!(config.seating.default_rows, 10);
    }

    #[test]
    fn test_overrides() {
        let config = parse(
            r#"
            [server]
            port = 9000

            [backend]
            base_url = "https://api.example.com"
            token = "secret"

            [seating]
            seat_ceiling = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.backend.token.as_deref(), Some("secret"));
        assert_eq!(config.seating.seat_ceiling, 90);
        assert_eq!(config.seating.max_rows, 50);
    }

    #[test]
    fn test_backend_is_required() {
        assert!(parse("[server]\nport = 3000\n").is_err());
    }
}
