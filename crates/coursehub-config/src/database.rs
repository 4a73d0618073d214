use std::env;
use std::fmt;
use std::time::Duration;

use crate::env_or;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVar(pub &'static str);

impl fmt::Display for MissingVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be set", self.0)
    }
}

impl std::error::Error for MissingVar {}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, MissingVar> {
        let url = env::var("DATABASE_URL").map_err(|_| MissingVar("DATABASE_URL"))?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            acquire_timeout: Duration::from_secs(env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)),
        })
    }
}
