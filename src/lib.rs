pub mod config;
pub mod error;
pub mod extensions;
pub mod types;

pub use config::ExtensionConfig;
pub use error::{Error, Result};
pub use types::{DataType, Value};
