use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(rename = "polisgo_addr", default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_db_hostname")]
    pub db_hostname: String,
    #[serde(default = "default_db_hostport")]
    pub db_hostport: u16,
    #[serde(default = "default_db_credential")]
    pub db_username: String,
    #[serde(default = "default_db_credential")]
    pub db_password: String,
    #[serde(default = "default_db_credential")]
    pub db_name: String,
}

fn default_addr() -> String {
    "localhost:8080".to_string()
}

fn default_db_hostname() -> String {
    "localhost".to_string()
}

fn default_db_hostport() -> u16 {
    5432
}

fn default_db_credential() -> String {
    "postgres".to_string()
}

impl AppConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_hostname)
            .port(self.db_hostport)
            .username(&self.db_username)
            .password(&self.db_password)
            .database(&self.db_name)
    }
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}
