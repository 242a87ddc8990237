use thiserror::Error;

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod products;
pub mod report;

pub use app_config::{AppConfig, DataSource, SelectorProfileKind};
pub use catalog::fallback_catalog;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Credentials, Product, ProductOrigin};
pub use report::RunReport;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
