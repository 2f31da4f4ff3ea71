// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{EnhanceError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub pool: PoolConfig,
    pub fetch: FetchConfig,
    pub synthesis: SynthesisConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PoolConfig {
    pub capacity: usize,
    pub launch_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    pub page_load_timeout_ms: u64,
    pub fallback_timeout_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub model_tag: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub max_batch_size: usize,
    pub excerpt_limit: usize,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CONTENT_ENHANCER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| EnhanceError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| EnhanceError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            pool: PoolConfig {
                capacity: 4,
                launch_timeout_ms: 60_000,
                acquire_timeout_ms: 60_000,
            },
            fetch: FetchConfig {
                page_load_timeout_ms: 20_000,
                fallback_timeout_ms: 30_000,
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            },
            synthesis: SynthesisConfig {
                api_key: None,
                base_url: "https://api.together.xyz".to_string(),
                model: "meta-llama/Llama-4-Maverick-17B-128E-Instruct-FP8".to_string(),
                model_tag: "Llama-4-Maverick".to_string(),
                request_timeout_ms: 30_000,
            },
            pipeline: PipelineConfig {
                max_batch_size: 100,
                excerpt_limit: 5000,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.pool.capacity == 0 {
            return Err(EnhanceError::Config(
                "pool.capacity must be greater than 0".to_string(),
            ));
        }

        if self.pool.acquire_timeout_ms == 0 {
            return Err(EnhanceError::Config(
                "pool.acquire_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.fetch.page_load_timeout_ms == 0 || self.fetch.fallback_timeout_ms == 0 {
            return Err(EnhanceError::Config(
                "fetch timeouts must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.max_batch_size == 0 {
            return Err(EnhanceError::Config(
                "pipeline.max_batch_size must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.excerpt_limit == 0 {
            return Err(EnhanceError::Config(
                "pipeline.excerpt_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
