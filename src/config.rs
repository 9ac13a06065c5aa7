use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://learning.db?mode=rwc";
pub const DEFAULT_SECRET_KEY: &str = "very-secret-key";
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4000";
pub const DEFAULT_REPORT_COMMAND: &str = "generate_report";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// HS256 signing secret for login tokens.
    pub secret_key: String,
    pub upload_folder: PathBuf,
    pub bind_addr: SocketAddr,
    /// Program invoked by `/api/export-grades`.
    pub report_command: String,
    pub seed_demo_data: bool,
}

impl Config {
    /// Reads settings from the process environment, falling back to the
    /// built-in defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let bind_addr = parse_bind_addr(&env_or("BIND_ADDR", DEFAULT_BIND_ADDR))?;

        let seed_demo_data = match env::var("SEED_DEMO_DATA") {
            Ok(v) => parse_seed_flag(&v)?,
            Err(_) => true,
        };

        Ok(Self {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            secret_key: env_or("SECRET_KEY", DEFAULT_SECRET_KEY),
            upload_folder: PathBuf::from(env_or("UPLOAD_FOLDER", DEFAULT_UPLOAD_FOLDER)),
            bind_addr,
            report_command: env_or("REPORT_COMMAND", DEFAULT_REPORT_COMMAND),
            seed_demo_data,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            upload_folder: PathBuf::from(DEFAULT_UPLOAD_FOLDER),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 4000)),
            report_command: DEFAULT_REPORT_COMMAND.to_string(),
            seed_demo_data: true,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bind_addr(value: &str) -> Result<SocketAddr, AppError> {
    value
        .parse::<SocketAddr>()
        .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))
}

fn parse_seed_flag(value: &str) -> Result<bool, AppError> {
    parse_flag(value)
        .ok_or_else(|| AppError::Config(format!("SEED_DEMO_DATA is invalid: {}", value)))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
