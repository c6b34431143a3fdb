#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first_of, env_or_default};

const DEFAULT_DATABASE: &str = "marketplace";

/// MongoDB connection settings.
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "marketplace")
///     .with_app_name("marketplace-api");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[username:password@]host[:port][/database][?options]`
    pub url: String,
    pub database: String,
    /// Reported in server logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_database(url, DEFAULT_DATABASE)
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

#[cfg(feature = "config")]
fn parse_number<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_or_default(key, default)
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

/// Environment variables:
/// - `MONGODB_URL`, `MONGO_URL` or `MONGO_URI` (required, first one set wins)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default: `marketplace`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (default: 100), `MONGODB_MIN_POOL_SIZE` (default: 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_first_of(&["MONGODB_URL", "MONGO_URL", "MONGO_URI"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_URL, MONGO_URL or MONGO_URI".to_string())
        })?;

        let database = env_first_of(&["MONGODB_DATABASE", "MONGO_DATABASE"])
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: parse_number("MONGODB_MAX_POOL_SIZE", "100")?,
            min_pool_size: parse_number("MONGODB_MIN_POOL_SIZE", "5")?,
            connect_timeout_secs: parse_number("MONGODB_CONNECT_TIMEOUT_SECS", "10")?,
            server_selection_timeout_secs: parse_number(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                "30",
            )?,
        })
    }
}
