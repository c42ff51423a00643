use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime configuration. Loaded once at startup and handed to whatever
/// needs it; nothing in the crate reads the environment after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// HS256 signing secret. Rotating it invalidates every outstanding token.
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Upper bound on concurrently outstanding database connections.
    pub pool_max_connections: u32,
    /// How long an operation may wait for a free connection before the
    /// request is answered with 503.
    pub pool_acquire_timeout_secs: u64,
    pub volunteer_api_base: Url,
    pub volunteer_api_key: String,
}

pub const DEFAULT_JWT_SECRET: &str = "insecure-dev-secret";

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:sprout.db".to_string(),
            loglevel: "info".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: 24 * 60 * 60,
            pool_max_connections: 10,
            pool_acquire_timeout_secs: 5,
            volunteer_api_base: Url::parse(
                "http://openapi.1365.go.kr/openapi/service/getVltrPartcptnDtl",
            )
            .expect("default upstream URL is valid"),
            volunteer_api_key: String::new(),
        }
    }
}

impl Config {
    /// Defaults overridden by `SPROUT_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("SPROUT_"))
            .extract()
    }
}
