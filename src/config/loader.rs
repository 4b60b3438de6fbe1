//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::PortalConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: TOML file if given, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<PortalConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => PortalConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the `DB_*` variables onto the database section.
pub fn apply_env_overrides<F>(config: &mut PortalConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let db = &mut config.database;
    if let Some(host) = lookup("DB_HOST") {
        db.host = host;
    }
    if let Some(port) = lookup("DB_PORT") {
        db.port = port.parse().map_err(|_| ConfigError::Env {
            var: "DB_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(user) = lookup("DB_USER") {
        db.user = user;
    }
    if let Some(password) = lookup("DB_PASSWORD") {
        db.password = password;
    }
    if let Some(name) = lookup("DB_NAME") {
        db.name = name;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_database_section() {
        let mut config = PortalConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "3307"),
                ("DB_USER", "portal"),
                ("DB_PASSWORD", "s3cret"),
                ("DB_NAME", "faculty"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "portal");
        assert_eq!(config.database.password, "s3cret");
        assert_eq!(config.database.name, "faculty");
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut config = PortalConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("DB_PORT", "mysql")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "DB_PORT", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("report_portal_loader_test.toml");
        fs::write(&path, "[listener]\nbind_address = \"127.0.0.1:4000\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let path = std::env::temp_dir().join("report_portal_loader_invalid.toml");
        fs::write(&path, "[http]\nmax_body_size = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("http.max_body_size"));

        fs::remove_file(&path).unwrap_or_default();
    }
}
