pub mod app_config;
pub mod categories;
pub mod config;
pub mod leads;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, MAX_CATEGORY_CAP};
pub use categories::{load_categories, CategoriesFile, CategoryCatalog, SearchTarget};
pub use config::{load_app_config, load_app_config_from_env};
pub use leads::{Area, Geography, Lead, PlaceHit};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[source] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
