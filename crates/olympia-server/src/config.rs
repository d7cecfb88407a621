use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    upstream: UpstreamSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamSection {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

impl ServerConfig {
    /// Load configuration once at boot: optional TOML file first, then
    /// environment variables. The upstream API key has no default; startup
    /// fails without one.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(file_config) = load_from_file()? {
            let api_key = match file_config.upstream.api_key {
                Some(key) => key,
                None => require_api_key()?,
            };
            return Ok(Self {
                host: file_config.server.host,
                port: file_config.server.port,
                api_key,
                model: file_config.upstream.model,
                base_url: file_config.upstream.base_url,
            });
        }

        Self::from_env()
    }

    fn from_env() -> anyhow::Result<Self> {
        let host = env::var("OLYMPIA_SERVER_HOST").unwrap_or_else(|_| default_host());
        let port = env::var("OLYMPIA_SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or_else(default_port);
        let model = env::var("OLYMPIA_MODEL").unwrap_or_else(|_| default_model());
        let base_url = env::var("OLYMPIA_BASE_URL").unwrap_or_else(|_| default_base_url());

        Ok(Self {
            host,
            port,
            api_key: require_api_key()?,
            model,
            base_url,
        })
    }
}

fn require_api_key() -> anyhow::Result<String> {
    env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY is not set; the relay cannot reach upstream"))
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("OLYMPIA_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let section = ServerSection::default();
        assert_eq!(section.host, "0.0.0.0");
        assert_eq!(section.port, 3000);

        let upstream = UpstreamSection::default();
        assert_eq!(upstream.model, "gpt-4o-mini");
        assert_eq!(upstream.base_url, "https://api.openai.com/v1");
        assert!(upstream.api_key.is_none());
    }

    #[test]
    fn test_file_config_partial_sections() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [server]
            port = 8081

            [upstream]
            api_key = "sk-test"
            model = "gpt-4o"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 8081);
        assert_eq!(parsed.upstream.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.upstream.model, "gpt-4o");
    }

    #[test]
    fn test_file_config_empty() {
        let parsed: FileConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.upstream.base_url, "https://api.openai.com/v1");
    }
}
