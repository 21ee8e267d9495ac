// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup; a `.env` file in the working directory is honoured.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `DATA_DIR` | Directory holding `blog.redb` | `./data` |
//! | `JWT_SECRET` | HMAC secret used to sign bearer tokens | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use crate::auth::TokenConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// There is no default: the server refuses to start without it.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "blog.redb";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(()),
        }
    }
}

/// Typed server configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = match var(HOST_ENV) {
            Some(value) => parse(HOST_ENV, value)?,
            None => parse(HOST_ENV, DEFAULT_HOST.to_string())?,
        };
        let port = match var(PORT_ENV) {
            Some(value) => parse(PORT_ENV, value)?,
            None => DEFAULT_PORT,
        };
        let data_dir = var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        let log_format = match var(LOG_FORMAT_ENV) {
            Some(value) => parse(LOG_FORMAT_ENV, value)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            jwt_secret,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone())
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("./data/blog.redb"));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8081"),
            (DATA_DIR_ENV, "/var/lib/blog"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8081".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/blog/blog.redb"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing(JWT_SECRET_ENV));
        assert_eq!(
            load(&[(JWT_SECRET_ENV, "  ")]).unwrap_err(),
            ConfigError::Missing(JWT_SECRET_ENV)
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load(&[(JWT_SECRET_ENV, "s"), (PORT_ENV, "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: PORT_ENV,
                value: "eighty".to_string()
            }
        );
        assert!(load(&[(JWT_SECRET_ENV, "s"), (LOG_FORMAT_ENV, "xml")]).is_err());
        assert!(load(&[(JWT_SECRET_ENV, "s"), (HOST_ENV, "not-an-ip")]).is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = load(&[(JWT_SECRET_ENV, "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
