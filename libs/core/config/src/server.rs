use crate::{ConfigError, FromEnv, env_or_default};
use std::net::Ipv4Addr;

/// Port the marketplace listens on unless `PORT` says otherwise
pub const DEFAULT_PORT: u16 = 4040;

/// HTTP listener address.
///
/// `HOST` defaults to `0.0.0.0`, `PORT` to 4040.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, as accepted by `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = env_or_default("HOST", &defaults.host);

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{raw:?}: {e}"),
            })?,
            Err(_) => defaults.port,
        };

        Ok(Self::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(["HOST", "PORT"], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::default());
            assert_eq!(config.address(), "0.0.0.0:4040");
        });
    }

    #[test]
    fn test_reads_host_and_port() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some(" 8081 "))], || {
            assert_eq!(ServerConfig::from_env().unwrap().address(), "127.0.0.1:8081");
        });
    }

    #[test]
    fn test_rejects_bad_ports() {
        for raw in ["http", "70000", "-1"] {
            temp_env::with_var("PORT", Some(raw), || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"), "{raw}: {err}");
            });
        }
    }
}
