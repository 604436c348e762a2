use config::{Config, ConfigError, File};

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct DBConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DBConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HTTPConfig {
    pub host: String,
    pub port: u16,
}

impl HTTPConfig {
    pub fn connection_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub http_config: HTTPConfig,
    /// Absent when the server only ever runs against the in-memory store.
    pub db_config: Option<DBConfig>,
}

impl AppConfig {
    pub fn load(path_str: &str) -> Result<Self, ConfigError> {
        let mut conf = Config::default();
        let conf_file = File::new(path_str, config::FileFormat::Toml);
        conf.merge(conf_file)?;
        Self::from_config(&conf, |key| std::env::var(key).ok())
    }

    /// `env` looks up the `COOKBOOK_*` overrides.
    fn from_config(
        conf: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let db_config = match conf.get::<DBConfig>("db") {
            Ok(mut db_config) => {
                if let Some(db_host) = env("COOKBOOK_DB_HOST") {
                    info!("db host from env");
                    db_config.host = db_host;
                } else {
                    info!("db host from file")
                }
                if let Some(db_pass) = env("COOKBOOK_DB_PASSWORD") {
                    info!("password from env");
                    db_config.password = db_pass;
                } else {
                    info!("password from config file");
                }
                Some(db_config)
            }
            Err(ConfigError::NotFound(_)) => {
                info!("no db section in config");
                None
            }
            Err(err) => return Err(err),
        };

        let mut http_config = conf.get::<HTTPConfig>("http")?;
        if let Some(host) = env("COOKBOOK_SERVER_HOST") {
            info!("getting server host from env: {host}");
            http_config.host = host;
        } else {
            info!("getting server host from file");
        }
        if let Some(port) = env("COOKBOOK_SERVER_PORT") {
            info!("getting server port from env: {port}");
            http_config.port = port.parse::<u16>().map_err(|_| {
                ConfigError::Message(format!("Failed to parse server port {port}"))
            })?;
        }

        Ok(AppConfig {
            http_config,
            db_config,
        })
    }
}
