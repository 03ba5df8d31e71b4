use std::env;
use std::path::PathBuf;

/// Configuração do servidor lida de variáveis de ambiente.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Endereço de escuta (`TAGGER_BIND`)
    pub bind: String,
    /// Arquivo JSON com a configuração do etiquetador (`TAGGER_CONFIG`)
    pub tagger_config: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            tagger_config: None,
        }
    }
}

impl ServerConfig {
    /// Carrega o `.env` (se existir) e lê as variáveis do processo.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            bind: non_empty("TAGGER_BIND").unwrap_or(defaults.bind),
            tagger_config: non_empty("TAGGER_CONFIG").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_reads_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TAGGER_BIND", "127.0.0.1:8080"),
            ("TAGGER_CONFIG", "tagger.json"),
        ]));
        assert_eq!(config.bind, "127.0.0.1:8080");
        assert_eq!(config.tagger_config, Some(PathBuf::from("tagger.json")));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[("TAGGER_BIND", "  "), ("TAGGER_CONFIG", "")]));
        assert_eq!(config, ServerConfig::default());
    }
}
