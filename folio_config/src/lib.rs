use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{File, FileFormat};
use folio_models::email_address::EmailAddress;
use serde::Deserialize;
use url::Url;

pub use crate::duration::Duration;

mod duration;

/// The default configuration, always loaded before any other source.
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

/// Environment variable containing additional config files, separated like `PATH`.
pub const CONFIG_PATHS_ENV: &str = "FOLIO_CONFIG";

pub const RESEND_API_KEY_ENV: &str = "RESEND_API_KEY";
pub const RECIPIENT_EMAIL_ENV: &str = "RESEND_RECIPIENT_EMAIL";

/// Load the config from the default config, the files listed in
/// [`CONFIG_PATHS_ENV`] and the environment.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var_os(CONFIG_PATHS_ENV)
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();

    load_with_overrides(&paths, &EnvOverrides::from_env())
}

pub fn load_with_overrides(
    paths: &[impl AsRef<Path>],
    overrides: &EnvOverrides,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    paths
        .iter()
        .try_fold(builder, |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .set_override_option("email.resend.api_key", overrides.resend_api_key.clone())?
        .set_override_option("contact.recipient", overrides.recipient.clone())?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

/// Config values that can be set through well known environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub resend_api_key: Option<String>,
    pub recipient: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|value| !value.is_empty());
        Self {
            resend_api_key: var(RESEND_API_KEY_ENV),
            recipient: var(RECIPIENT_EMAIL_ENV),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub health: HealthConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub sentry: Option<SentryConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from: EmailAddress,
    #[serde(default)]
    pub resend: ResendConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Resend,
    Smtp,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResendConfig {
    api_key: Option<String>,
    pub endpoint_override: Option<Url>,
}

impl ResendConfig {
    /// The api key, unless it is missing or empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SmtpConfig {
    url: Option<String>,
}

impl SmtpConfig {
    /// The url of the smtp server, unless it is missing or empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct SentryConfig {
    pub dsn: Url,
}
