//! Configuration management for the Venmo client.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the values
//! that make the client look like a registered mobile device (device identifier,
//! user agent), the upstream base URLs, and the account credentials.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults mimicking the iOS app build the API expects

use std::{env, path::PathBuf};

use secrecy::SecretString;

use crate::{Res, error::Error};

/// Device identifier sent on every request. It impersonates a previously
/// registered device so the server does not ask for extra verification.
pub const DEFAULT_DEVICE_ID: &str = "EFF75587-5CB7-432B-BB59-639820DFD2DD";

/// User agent of the mobile app build the API accepts.
pub const DEFAULT_USER_AGENT: &str = "Venmo/7.8.1 (iPhone; iOS 10.2; Scale/2.0)";

pub const DEFAULT_WEB_URL: &str = "https://venmo.com";
pub const DEFAULT_API_URL: &str = "https://api.venmo.com";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Looks for the file at `venmo-client/.env` under the platform-specific local
/// data directory:
/// - Linux: `~/.local/share/venmo-client/.env`
/// - macOS: `~/Library/Application Support/venmo-client/.env`
/// - Windows: `%LOCALAPPDATA%/venmo-client/.env`
///
/// A missing file is not an error; variables already present in the process
/// environment are never overwritten.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
///
/// # Example
///
/// ```
/// use venmo_client::config;
///
/// config::load_env()?;
/// let credentials = config::Credentials::from_env()?;
/// ```
pub fn load_env() -> Res<()> {
    let path = env_path();
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))
}

/// Returns the path of the `.env` file read by [`load_env`].
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("venmo-client/.env");
    path
}

/// Settings that shape every request the client sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sent as the `device-id` header.
    pub device_id: String,
    pub user_agent: String,
    /// Base URL for [`Host::Web`](crate::types::Host::Web).
    pub web_url: String,
    /// Base URL for [`Host::Api`](crate::types::Host::Api).
    pub api_url: String,
    /// Ask the server to remember this device after a two-factor login.
    /// Not implemented upstream; enabling it makes a challenged login fail
    /// with [`Error::Unsupported`].
    pub remember_device: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            remember_device: false,
        }
    }
}

impl ClientConfig {
    /// Builds a config from the process environment.
    ///
    /// Reads `VENMO_DEVICE_ID`, `VENMO_USER_AGENT`, `VENMO_WEB_URL`,
    /// `VENMO_API_URL` and `VENMO_REMEMBER_DEVICE`; anything unset keeps its
    /// default.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key-value source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `VENMO_REMEMBER_DEVICE` is not a boolean.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let remember_device = match lookup("VENMO_REMEMBER_DEVICE") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                Error::Config(format!("VENMO_REMEMBER_DEVICE is not a boolean: {value}"))
            })?,
            None => defaults.remember_device,
        };

        Ok(Self {
            device_id: lookup("VENMO_DEVICE_ID").unwrap_or(defaults.device_id),
            user_agent: lookup("VENMO_USER_AGENT").unwrap_or(defaults.user_agent),
            web_url: trim_base(lookup("VENMO_WEB_URL").unwrap_or(defaults.web_url)),
            api_url: trim_base(lookup("VENMO_API_URL").unwrap_or(defaults.api_url)),
            remember_device,
        })
    }

    /// Points both hosts at one base URL, e.g. a local mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = trim_base(url.into());
        self.web_url = url.clone();
        self.api_url = url;
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }
}

/// Username (or phone, or email) and password for the password grant.
#[derive(Debug)]
pub struct Credentials {
    pub identifier: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Reads `VENMO_USERNAME` and `VENMO_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first variable that is missing.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let identifier = lookup("VENMO_USERNAME")
            .ok_or_else(|| Error::Config("VENMO_USERNAME must be set".to_string()))?;
        let password = lookup("VENMO_PASSWORD")
            .ok_or_else(|| Error::Config("VENMO_PASSWORD must be set".to_string()))?;
        Ok(Self::new(identifier, password))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
