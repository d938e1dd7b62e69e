use once_cell::sync::Lazy;
use std::cell::UnsafeCell;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use zeroize::Zeroize;

pub static CONF: Lazy<Config> = Lazy::new(|| Config::from_env().expect("Failed to load config"));

const DB_USERNAME_VAR: &str = "LUREWATCH_DB_USERNAME";
const DB_PASSWORD_VAR: &str = "LUREWATCH_DB_PASSWORD";
const DB_HOSTNAME_VAR: &str = "LUREWATCH_DB_HOSTNAME";
const DB_PORT_VAR: &str = "LUREWATCH_DB_PORT";
const DB_NAME_VAR: &str = "LUREWATCH_DB_NAME";
const DB_MAX_CONNECTIONS_VAR: &str = "LUREWATCH_DB_MAX_CONNECTIONS";

const EMAIL_ENABLED_VAR: &str = "LUREWATCH_EMAIL_ENABLED";
const SMTP_RELAY_ADDRESS_VAR: &str = "LUREWATCH_SMTP_RELAY_ADDRESS";
const MAX_SMTP_CONNECTIONS_VAR: &str = "LUREWATCH_MAX_SMTP_CONNECTIONS";
const SMTP_IDLE_TIMEOUT_SECS_VAR: &str = "LUREWATCH_SMTP_IDLE_TIMEOUT_SECS";
const SEND_TIMEOUT_SECS_VAR: &str = "LUREWATCH_SEND_TIMEOUT_SECS";
const FALLBACK_SENDER_SECRET_VAR: &str = "LUREWATCH_FALLBACK_SENDER_SECRET";

const TRACKING_BASE_URL_VAR: &str = "LUREWATCH_TRACKING_BASE_URL";
const DISPATCH_WORKER_COUNT_VAR: &str = "LUREWATCH_DISPATCH_WORKER_COUNT";
const ACTIX_WORKER_COUNT_VAR: &str = "LUREWATCH_ACTIX_WORKER_COUNT";

const HEALTH_ENDPOINT_KEY_VAR: &str = "LUREWATCH_HEALTH_ENDPOINT_KEY";
const LOG_LEVEL_VAR: &str = "LUREWATCH_LOG_LEVEL";

#[derive(Zeroize)]
pub struct ConfigInner {
    pub db_username: String,
    pub db_password: String,
    pub db_hostname: String,
    #[zeroize(skip)]
    pub db_port: u16,
    pub db_name: String,
    #[zeroize(skip)]
    pub db_max_connections: u32,

    #[zeroize(skip)]
    pub email_enabled: bool,
    #[zeroize(skip)]
    pub smtp_relay_address: String,
    #[zeroize(skip)]
    pub max_smtp_connections: u32,
    #[zeroize(skip)]
    pub smtp_idle_timeout: Duration,
    #[zeroize(skip)]
    pub send_timeout: Duration,
    /// Shared secret paired with a request-supplied sender address when a
    /// user has no stored credential record.
    pub fallback_sender_secret: Option<String>,

    #[zeroize(skip)]
    pub tracking_base_url: String,
    #[zeroize(skip)]
    pub dispatch_worker_count: usize,
    #[zeroize(skip)]
    pub actix_worker_count: usize,

    pub health_endpoint_key: String,
    #[zeroize(skip)]
    pub log_level: String,
}

pub struct Config {
    inner: UnsafeCell<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        // Safe as long as `unsafe Config::zeroize()` hasn't been called
        unsafe { &*self.inner.get() }
    }
}

// Safe to be shared across threads as long as `unsafe Config::zeroize()` hasn't been called
unsafe impl Sync for Config {}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let inner = ConfigInner {
            db_username: env_var(DB_USERNAME_VAR)?,
            db_password: env_var(DB_PASSWORD_VAR)?,
            db_hostname: env_var(DB_HOSTNAME_VAR)?,
            db_port: env_var(DB_PORT_VAR)?,
            db_name: env_var(DB_NAME_VAR)?,
            db_max_connections: env_var_or(DB_MAX_CONNECTIONS_VAR, 48),

            email_enabled: if cfg!(test) {
                false
            } else {
                env_var(EMAIL_ENABLED_VAR)?
            },
            smtp_relay_address: env_var_or(SMTP_RELAY_ADDRESS_VAR, String::from("smtp.gmail.com")),
            max_smtp_connections: env_var_or(MAX_SMTP_CONNECTIONS_VAR, 24),
            smtp_idle_timeout: Duration::from_secs(env_var_or(SMTP_IDLE_TIMEOUT_SECS_VAR, 60)),
            send_timeout: Duration::from_secs(env_var_or(SEND_TIMEOUT_SECS_VAR, 20)),
            fallback_sender_secret: std::env::var(FALLBACK_SENDER_SECRET_VAR).ok(),

            tracking_base_url: env_var(TRACKING_BASE_URL_VAR)?,
            dispatch_worker_count: env_var_or(DISPATCH_WORKER_COUNT_VAR, 2 * num_cpus::get()),
            actix_worker_count: env_var_or(ACTIX_WORKER_COUNT_VAR, num_cpus::get()),

            health_endpoint_key: env_var(HEALTH_ENDPOINT_KEY_VAR)?,
            log_level: env_var_or(LOG_LEVEL_VAR, String::from("info")),
        };

        Ok(Config {
            inner: UnsafeCell::new(inner),
        })
    }

    /// # Safety
    ///
    /// Safe only if the Config isn't being used by other threads or across an async
    /// boundary. Generally, this should only be used at the end of the main function once
    /// all threads have been joined.
    pub unsafe fn zeroize(&self) {
        unsafe {
            (*self.inner.get()).zeroize();
        }
    }
}

fn env_var<T: FromStr>(key: &'static str) -> Result<T, ConfigError> {
    let var = std::env::var(key).map_err(|_| ConfigError::missing(key))?;
    let var: T = var.parse().map_err(|_| ConfigError::invalid(key))?;
    Ok(var)
}

fn env_var_or<T: FromStr>(key: &'static str, default: T) -> T {
    let Ok(var) = std::env::var(key) else {
        return default;
    };

    var.parse().unwrap_or(default)
}

#[derive(Clone, Copy, Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar(&'static str),
}

impl ConfigError {
    fn missing(var_name: &'static str) -> Self {
        Self::MissingVar(var_name)
    }

    fn invalid(var_name: &'static str) -> Self {
        Self::InvalidVar(var_name)
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "Missing environment variable '{}'", key),
            Self::InvalidVar(key) => write!(f, "Environment variable '{}' is invalid", key),
        }
    }
}
