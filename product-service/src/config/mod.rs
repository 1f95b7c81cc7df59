use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreBackend,
    pub mongodb: MongoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the service config from `common` plus whatever `lookup` returns
    /// for each environment key.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";

        let store: StoreBackend = get_env(&lookup, "PRODUCT_STORE", Some("mongo"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // Only a Mongo-backed service needs a real connection string.
        let (uri_default, uri_required) = match store {
            StoreBackend::Mongo => (None, is_prod),
            StoreBackend::Memory => (Some(DEFAULT_MONGODB_URI), false),
        };

        Ok(ProductConfig {
            common,
            store,
            mongodb: MongoConfig {
                uri: get_env(&lookup, "MONGODB_URI", uri_default, uri_required)?,
                database: get_env(&lookup, "MONGODB_DATABASE", Some("product_db"), is_prod)?,
                collection: get_env(&lookup, "MONGODB_COLLECTION", Some("product"), false)?,
            },
        })
    }
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Mongo => "mongo",
            StoreBackend::Memory => "memory",
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid product store backend: {}", s)),
        }
    }
}

fn get_env<F>(
    lookup: &F,
    key: &str,
    default: Option<&str>,
    required: bool,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if required {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
