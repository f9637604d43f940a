use anyhow::{Context, Result};
use batch_loader::LoaderConfig;
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub dataloader_yield_count: usize,
    pub dataloader_max_batch_size: Option<usize>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            dataloader_yield_count: match env::var("DATALOADER_YIELD_COUNT") {
                Ok(value) => value
                    .parse()
                    .context("DATALOADER_YIELD_COUNT must be a valid number")?,
                Err(_) => LoaderConfig::DEFAULT_YIELD_COUNT,
            },
            dataloader_max_batch_size: parse_max_batch_size(
                env::var("DATALOADER_MAX_BATCH_SIZE").ok().as_deref(),
            )?,
        })
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            yield_count: self.dataloader_yield_count,
            max_batch_size: self.dataloader_max_batch_size,
        }
    }
}

/// Unset, blank or zero means unbounded.
fn parse_max_batch_size(value: Option<&str>) -> Result<Option<usize>> {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let size: usize = value
        .parse()
        .context("DATALOADER_MAX_BATCH_SIZE must be a valid number")?;
    Ok((size > 0).then_some(size))
}
