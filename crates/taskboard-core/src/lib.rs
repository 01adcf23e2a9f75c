pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use config::{AppConfig, ColumnConfig};
pub use error::TaskboardError;
pub use result::TaskboardResult;
