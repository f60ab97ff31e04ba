//! CLI Arguments and Connection Profile
//!
//! Invocation takes three positional arguments, mirroring how the tool has
//! always been launched:
//!
//! ```text
//! chitter <database> <port> <user> [--host <host>]
//! ```
//!
//! Missing or extra positional arguments produce a usage message and the
//! process exits without connecting.
//!
//! # Stored profile
//! An optional per-user profile at `~/.config/chitter/connection.json`
//! supplies defaults that the command line does not carry: the server host
//! and the database password (directly, or by naming an environment
//! variable).
//!
//! # Resolution precedence
//! 1. Explicit CLI flags (highest priority)
//! 2. Stored profile
//! 3. Built-in defaults (`localhost`), environment (`CHITTER_DB_PASSWORD`)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::ConnectionParams;
use crate::error::{ChitterError, Result};

/// Environment variable consulted for the password when the profile does not
/// provide one
pub const PASSWORD_ENV: &str = "CHITTER_DB_PASSWORD";

/// chitter - console messenger client
#[derive(Parser, Debug)]
#[command(name = "chitter")]
#[command(about = "Menu-driven console messenger client for a PostgreSQL-backed chat schema")]
#[command(version)]
pub struct Cli {
    /// Database name
    pub database: String,

    /// Database server port
    pub port: u16,

    /// Database user login
    pub user: String,

    /// Database server hostname (default: from profile, then localhost)
    #[arg(long)]
    pub host: Option<String>,

    /// Enable verbose logging (to stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Stored connection profile
///
/// All fields optional; an absent profile file behaves like an empty one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionProfile {
    /// Default server hostname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Password stored directly in the profile
    /// WARNING: sensitive data, prefer `password_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name to read the password from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

/// Get path to the profile file (`~/.config/chitter/connection.json`)
pub fn profile_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ChitterError::config_error("could not determine user config directory"))?;

    Ok(config_dir.join("chitter").join("connection.json"))
}

/// Load the connection profile from a file
///
/// A missing file is not an error; it yields the empty profile.
pub fn load_profile(path: &Path) -> Result<ConnectionProfile> {
    if !path.exists() {
        return Ok(ConnectionProfile::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ChitterError::config_error(format!("could not read profile file: {e}")))?;

    serde_json::from_str(&contents)
        .map_err(|e| ChitterError::config_error(format!("invalid profile file format: {e}")))
}

/// Resolve the password from profile and environment.
///
/// Returns `None` when nothing is configured, in which case the caller
/// prompts interactively. A `password_env` that names a missing variable is
/// an error rather than a silent fallthrough.
pub fn resolve_password(profile: &ConnectionProfile) -> Result<Option<String>> {
    if let Some(env_var) = &profile.password_env {
        return match std::env::var(env_var) {
            Ok(password) => Ok(Some(password)),
            Err(_) => Err(ChitterError::config_error(format!(
                "environment variable {env_var} not found for password"
            ))),
        };
    }

    if let Some(password) = &profile.password {
        return Ok(Some(password.clone()));
    }

    Ok(std::env::var(PASSWORD_ENV).ok())
}

/// Combine CLI arguments, profile, and password into connection parameters
pub fn resolve_params(cli: &Cli, profile: &ConnectionProfile, password: String) -> ConnectionParams {
    let host = cli
        .host
        .clone()
        .or_else(|| profile.host.clone())
        .unwrap_or_else(|| "localhost".to_string());

    ConnectionParams {
        host,
        port: cli.port,
        database: cli.database.clone(),
        user: cli.user.clone(),
        password,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid command line")
    }

    #[test]
    fn test_positional_arguments() {
        let cli = cli(&["chitter", "messenger", "5432", "alice"]);
        assert_eq!(cli.database, "messenger");
        assert_eq!(cli.port, 5432);
        assert_eq!(cli.user, "alice");
        assert!(cli.host.is_none());
    }

    #[test]
    fn test_missing_arguments_are_usage_errors() {
        let err = Cli::try_parse_from(["chitter", "messenger"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err =
            Cli::try_parse_from(["chitter", "messenger", "5432", "alice", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_host_flag_beats_profile() {
        let cli = cli(&["chitter", "messenger", "5432", "alice", "--host", "db.example.org"]);
        let profile = ConnectionProfile { host: Some("profile-host".to_string()), ..Default::default() };

        let params = resolve_params(&cli, &profile, String::new());
        assert_eq!(params.host, "db.example.org");
    }

    #[test]
    fn test_profile_host_beats_default() {
        let cli = cli(&["chitter", "messenger", "5432", "alice"]);
        let profile = ConnectionProfile { host: Some("profile-host".to_string()), ..Default::default() };

        let params = resolve_params(&cli, &profile, String::new());
        assert_eq!(params.host, "profile-host");
    }

    #[test]
    fn test_default_host_is_localhost() {
        let cli = cli(&["chitter", "messenger", "5432", "alice"]);
        let params = resolve_params(&cli, &ConnectionProfile::default(), String::new());
        assert_eq!(params.host, "localhost");
    }

    #[test]
    fn test_profile_password_resolution() {
        let profile = ConnectionProfile { password: Some("hunter2".to_string()), ..Default::default() };
        assert_eq!(resolve_password(&profile).unwrap(), Some("hunter2".to_string()));
    }

    #[test]
    fn test_password_env_indirection() {
        std::env::set_var("CHITTER_TEST_PW_VAR", "from-env");
        let profile = ConnectionProfile {
            password_env: Some("CHITTER_TEST_PW_VAR".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_password(&profile).unwrap(), Some("from-env".to_string()));
        std::env::remove_var("CHITTER_TEST_PW_VAR");
    }

    #[test]
    fn test_missing_password_env_is_an_error() {
        let profile = ConnectionProfile {
            password_env: Some("CHITTER_TEST_PW_MISSING".to_string()),
            ..Default::default()
        };
        assert!(matches!(resolve_password(&profile), Err(ChitterError::ConfigError(_))));
    }

    #[test]
    fn test_missing_profile_file_is_empty_profile() {
        let profile =
            load_profile(Path::new("/nonexistent/chitter/connection.json")).unwrap();
        assert!(profile.host.is_none());
        assert!(profile.password.is_none());
    }

    #[test]
    fn test_profile_round_trip() {
        let profile = ConnectionProfile {
            host: Some("db.internal".to_string()),
            password: None,
            password_env: Some("PGPASSWORD".to_string()),
        };

        let json = serde_json::to_string(&profile).unwrap();
        let back: ConnectionProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host.as_deref(), Some("db.internal"));
        assert_eq!(back.password_env.as_deref(), Some("PGPASSWORD"));
    }
}
