mod config;
mod error;

pub use config::{AppConfigExt, APP_NAME, CONFIG_NAME};
pub use edgeline_types::{AppConfig, IndicatorConfig};
pub use error::ConfigError;
