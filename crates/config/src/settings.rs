use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
    pub mail: MailSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Externally reachable origin, used to build links in outgoing mail.
    pub public_url: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Session tokens are issued by the external identity provider and only
/// verified here.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentitySettings {
    pub secret: String,
    pub issuer: String,
    pub sign_in_url: String,
    pub protected_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    /// SMTP relay host. Mail is logged instead of sent when unset.
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("REELHUB")
                    .list_separator(",")
                    .with_list_parse_key("app.cors_origins")
                    .with_list_parse_key("identity.protected_prefixes")
                    .try_parsing(true),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.public_url", "http://localhost:3000")?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default(
                "database.url",
                "mongodb://localhost:27019/?replicaSet=rs0&directConnection=true",
            )?
            .set_default("database.name", "reelhub")?
            .set_default("identity.secret", "change-me-in-production")?
            .set_default("identity.issuer", "reelhub-identity")?
            .set_default("identity.sign_in_url", "http://localhost:3000/auth/sign-in")?
            .set_default(
                "identity.protected_prefixes",
                vec!["/dashboard", "/payment", "/api/payment"],
            )?
            .set_default("mail.host", None::<String>)?
            .set_default("mail.port", 587)?
            .set_default("mail.username", None::<String>)?
            .set_default("mail.password", None::<String>)?
            .set_default("mail.from", "reelhub <no-reply@reelhub.local>")?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
