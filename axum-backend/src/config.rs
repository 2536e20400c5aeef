use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:8080,http://127.0.0.1:8080,http://localhost:8081,http://127.0.0.1:8081";

/// Server settings, read once from the environment at start-up
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    /// JSON file with the buildings to serve; the bundled sample is used when unset
    pub floorplan_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            floorplan_path: None,
        }
    }
}

impl ServerConfig {
    /// `BIND_ADDR`, `ALLOWED_ORIGINS` and `FLOORPLAN_PATH`, each optional
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|value| split_origins(&value))
                .unwrap_or(defaults.allowed_origins),
            floorplan_path: std::env::var("FLOORPLAN_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_skips_blanks() {
        let origins = split_origins(" http://a:1, ,http://b:2,");
        assert_eq!(origins, vec!["http://a:1".to_string(), "http://b:2".to_string()]);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.allowed_origins.len(), 4);
        assert!(config.floorplan_path.is_none());
    }
}
