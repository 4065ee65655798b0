pub mod config;
pub mod error;
pub mod file_config;
pub mod types;

pub use config::AppConfig;
pub use error::{DataPublicError, Result};
pub use file_config::{
    load_config, load_or_default, DispatchConfig, FileConfig, ReportConfig, DEFAULT_CONFIG_PATH,
};
pub use types::*;
