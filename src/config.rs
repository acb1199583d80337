use std::env;

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 5000,
        };

        let jwt_ttl_secs = match get("JWT_TTL_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::Invalid { name: "JWT_TTL_SECS", value: raw }),
            },
            None => 3600,
        };

        let mongodb_uri = match get("MONGODB_URI") {
            Some(uri) => uri,
            None => atlas_uri(
                &get("DB_USERNAME").ok_or(ConfigError::Missing("MONGODB_URI or DB_USERNAME"))?,
                &get("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?,
                &get("DB_CLUSTER").ok_or(ConfigError::Missing("DB_CLUSTER"))?,
            ),
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongodb_uri,
            database_name: get("MONGODB_DATABASE").unwrap_or_else(|| "CureCamp".to_string()),
            jwt_secret: get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_ttl_secs,
            stripe_secret_key: get("STRIPE_SECRET_KEY")
                .ok_or(ConfigError::Missing("STRIPE_SECRET_KEY"))?,
            stripe_api_base: get("STRIPE_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com/v1".to_string()),
            allowed_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn atlas_uri(user: &str, password: &str, cluster: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
        user, password, cluster
    )
}
