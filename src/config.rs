use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub spreadsheet_id: String,
    pub sheets_access_token: String,
    pub sheets_base_url: String,
    pub jwt_secret: String,
    pub cache_ttl_secs: u64,
    pub session_ttl_secs: i64,
    pub auth_rps: u32,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            spreadsheet_id: get_env("SPREADSHEET_ID")?,
            sheets_access_token: get_env("SHEETS_ACCESS_TOKEN")?,
            sheets_base_url: get_env_or("SHEETS_BASE_URL", "https://sheets.googleapis.com"),
            jwt_secret: get_env("JWT_SECRET")?,
            cache_ttl_secs: get_env_parse_or("CACHE_TTL_SECS", 300)?,
            session_ttl_secs: get_env_parse_or("SESSION_TTL_SECS", 86_400)?,
            auth_rps: get_env_parse_or("AUTH_RPS", 20)?,
            admin_username: env::var("ADMIN_USERNAME").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
