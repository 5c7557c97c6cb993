use chrono::Duration;
use std::{env, str::FromStr};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub secret: String,
    pub token_ttl_hours: i64,
    pub otp_ttl_minutes: i64,
    pub otp_max_attempts: i32,
    pub admin_phones: Vec<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    /// Reads the configuration from the process environment, after loading `.env`.
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(AppConfig {
            database_url: required("DATABASE_URL")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            secret: required("SECRET")?,
            token_ttl_hours: parsed_or("TOKEN_TTL_HOURS", 24)?,
            otp_ttl_minutes: parsed_or("OTP_TTL_MINUTES", 5)?,
            otp_max_attempts: parsed_or("OTP_MAX_ATTEMPTS", 5)?,
            admin_phones: parse_phone_list(&env::var("ADMIN_PHONES").unwrap_or_default()),
        })
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::hours(self.token_ttl_hours)
    }

    pub fn otp_ttl(&self) -> Duration {
        Duration::minutes(self.otp_ttl_minutes)
    }

    pub fn is_admin_phone(&self, phone: &str) -> bool {
        self.admin_phones.iter().any(|p| p == phone)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_phone_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_list_skips_blanks_and_trims() {
        let phones = parse_phone_list(" 9000000001, ,9000000002,");
        assert_eq!(phones, vec!["9000000001", "9000000002"]);
    }

    #[test]
    fn empty_phone_list() {
        assert!(parse_phone_list("").is_empty());
    }

    #[test]
    fn admin_phone_lookup() {
        let config = AppConfig {
            database_url: "sqlite::memory:".into(),
            bind_addr: "127.0.0.1:0".into(),
            secret: "secret".into(),
            token_ttl_hours: 24,
            otp_ttl_minutes: 5,
            otp_max_attempts: 5,
            admin_phones: vec!["9000000001".into()],
        };
        assert!(config.is_admin_phone("9000000001"));
        assert!(!config.is_admin_phone("9000000002"));
        assert_eq!(config.otp_ttl(), Duration::minutes(5));
    }
}
