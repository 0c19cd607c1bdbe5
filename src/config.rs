use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "site.toml";
pub const DOTENV_PATH: &str = ".env";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Outgoing mail settings. Only exists when every field is known.
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub email: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub posts_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Enables live reload.
    pub is_development: bool,
    pub smtp: Option<SmtpConfig>,
    /// Address offered by the copy-email button; defaults to the SMTP account.
    pub contact_email: Option<String>,
}

/// Contents of the optional TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub posts_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub contact_email: Option<String>,
    pub smtp: SmtpFileConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SmtpFileConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileConfig {
    pub fn from_toml_str(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing file is not an error.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(FileConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config file");
        Self::from_toml_str(path, &text)
    }
}

impl Config {
    /// Loads `.env` into the process environment, reads `CONFIG_PATH`
    /// (default `site.toml`), then applies the environment on top.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv(Path::new(DOTENV_PATH));
        let path = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let file = FileConfig::read(&path)?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merges file settings with an environment lookup; the environment
    /// wins. Empty variables count as unset.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).filter(|value| !value.is_empty());

        let port = match env("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };
        let posts_dir = env("POSTS_DIR")
            .map(PathBuf::from)
            .or(file.posts_dir)
            .unwrap_or_else(|| PathBuf::from("posts"));
        let static_dir = env("STATIC_DIR")
            .map(PathBuf::from)
            .or(file.static_dir)
            .unwrap_or_else(|| PathBuf::from("static"));
        let is_development = env("RUST_ENV").map_or(false, |v| v == "development");

        let smtp_port = match env("SMTP_PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!(value = %value, "SMTP_PORT is not a valid port");
                    None
                }
            },
            None => file.smtp.port,
        };
        let smtp = resolve_smtp(
            env("SMTP_EMAIL").or(file.smtp.email),
            env("SMTP_PASSWORD").or(file.smtp.password),
            env("SMTP_HOST").or(file.smtp.host),
            smtp_port,
        );

        let contact_email = env("CONTACT_EMAIL")
            .or(file.contact_email)
            .or_else(|| smtp.as_ref().map(|smtp| smtp.email.clone()));

        Ok(Config {
            port,
            posts_dir,
            static_dir,
            is_development,
            smtp,
            contact_email,
        })
    }
}

/// Sets variables from a dotenv file. Variables already in the environment
/// keep their value. A missing file is normal outside development.
pub fn load_dotenv(path: &Path) {
    match dotenvy::from_path(path) {
        Ok(()) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => debug!(path = %path.display(), "No .env file found"),
        Err(e) => warn!(path = %path.display(), "Failed to load environment file: {}", e),
    }
}

// All four values or nothing.
fn resolve_smtp(
    email: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> Option<SmtpConfig> {
    match (email, password, host, port) {
        (Some(email), Some(password), Some(host), Some(port)) => Some(SmtpConfig {
            email,
            password,
            host,
            port,
        }),
        (email, password, host, port) => {
            let missing: Vec<&str> = [
                ("SMTP_EMAIL", email.is_none()),
                ("SMTP_PASSWORD", password.is_none()),
                ("SMTP_HOST", host.is_none()),
                ("SMTP_PORT", port.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, is_missing)| is_missing.then_some(key))
            .collect();
            if missing.len() < 4 {
                warn!(missing = ?missing, "Incomplete SMTP settings, email delivery disabled");
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const SMTP_ENV: [(&str, &str); 4] = [
        ("SMTP_EMAIL", "owner@example.com"),
        ("SMTP_PASSWORD", "secret"),
        ("SMTP_HOST", "smtp.example.com"),
        ("SMTP_PORT", "587"),
    ];

    #[test]
    fn defaults_without_any_source() {
        let config = Config::from_sources(FileConfig::default(), env_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.posts_dir, PathBuf::from("posts"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(!config.is_development);
        assert!(config.smtp.is_none());
    }

    #[test]
    fn complete_smtp_environment_enables_mail() {
        let config = Config::from_sources(FileConfig::default(), env_from(&SMTP_ENV)).unwrap();
        assert_eq!(
            config.smtp,
            Some(SmtpConfig {
                email: "owner@example.com".to_string(),
                password: "secret".to_string(),
                host: "smtp.example.com".to_string(),
                port: 587,
            })
        );
    }

    #[test]
    fn any_missing_smtp_value_disables_mail() {
        for skip in 0..SMTP_ENV.len() {
            let partial: Vec<_> = SMTP_ENV
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, pair)| *pair)
                .collect();
            let config = Config::from_sources(FileConfig::default(), env_from(&partial)).unwrap();
            assert!(config.smtp.is_none(), "{} missing", SMTP_ENV[skip].0);
        }
    }

    #[test]
    fn empty_variable_counts_as_unset() {
        let mut pairs = SMTP_ENV.to_vec();
        pairs[1] = ("SMTP_PASSWORD", "");
        let config = Config::from_sources(FileConfig::default(), env_from(&pairs)).unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn unparsable_smtp_port_disables_mail() {
        let mut pairs = SMTP_ENV.to_vec();
        pairs[3] = ("SMTP_PORT", "smtp");
        let config = Config::from_sources(FileConfig::default(), env_from(&pairs)).unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = Config::from_sources(FileConfig::default(), env_from(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { key: "PORT", .. })));
    }

    #[test]
    fn environment_overrides_file() {
        let file = FileConfig::from_toml_str(
            Path::new("site.toml"),
            r#"
port = 3000
posts_dir = "content/posts"

[smtp]
email = "file@example.com"
password = "from-file"
host = "mail.example.com"
port = 465
"#,
        )
        .unwrap();
        let config = Config::from_sources(
            file,
            env_from(&[("PORT", "9000"), ("SMTP_EMAIL", "env@example.com"), ("RUST_ENV", "development")]),
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.posts_dir, PathBuf::from("content/posts"));
        assert!(config.is_development);
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.email, "env@example.com");
        assert_eq!(smtp.password, "from-file");
        assert_eq!(smtp.port, 465);
    }

    #[test]
    fn rejects_malformed_file() {
        let result = FileConfig::from_toml_str(Path::new("site.toml"), "port = \"not a number\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn contact_email_falls_back_to_smtp_account() {
        let config = Config::from_sources(FileConfig::default(), env_from(&SMTP_ENV)).unwrap();
        assert_eq!(config.contact_email.as_deref(), Some("owner@example.com"));

        let mut pairs = SMTP_ENV.to_vec();
        pairs.push(("CONTACT_EMAIL", "hello@example.com"));
        let config = Config::from_sources(FileConfig::default(), env_from(&pairs)).unwrap();
        assert_eq!(config.contact_email.as_deref(), Some("hello@example.com"));
    }

    #[test]
    fn contact_email_from_file_without_smtp() {
        let file = FileConfig::from_toml_str(
            Path::new("site.toml"),
            "contact_email = \"me@example.com\"",
        )
        .unwrap();
        let config = Config::from_sources(file, env_from(&[])).unwrap();
        assert!(config.smtp.is_none());
        assert_eq!(config.contact_email.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn no_contact_email_without_any_source() {
        let config = Config::from_sources(FileConfig::default(), env_from(&[])).unwrap();
        assert!(config.contact_email.is_none());
    }

    #[test]
    fn dotenv_file_populates_environment() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PORTFOLIO_BLOG_DOTENV_CHECK=loaded\n").unwrap();

        load_dotenv(&path);
        assert_eq!(
            std::env::var("PORTFOLIO_BLOG_DOTENV_CHECK").as_deref(),
            Ok("loaded")
        );
    }

    #[test]
    fn missing_dotenv_file_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        load_dotenv(&dir.path().join(".env"));
        assert!(std::env::var("PORTFOLIO_BLOG_DOTENV_ABSENT").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = FileConfig::read(&dir.path().join("absent.toml")).unwrap();
        assert!(file.port.is_none());
    }
}
