use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub analytics: AnalyticsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Directory holding the prebuilt front-end bundle (`index.html` + assets).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_trend_days")]
    pub default_trend_days: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

fn default_static_dir() -> String {
    "client/build".to_string()
}

fn default_trend_days() -> i64 {
    30
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite://incidents.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("web.static_dir", "client/build")?
            .set_default("analytics.default_trend_days", 30)?
            .set_default("log.format", "pretty")?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Configuration for an in-memory database, used by tests and local tooling.
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            web: WebConfig {
                static_dir: default_static_dir(),
            },
            analytics: AnalyticsConfig {
                default_trend_days: default_trend_days(),
            },
            log: LogConfig::default(),
        }
    }
}
