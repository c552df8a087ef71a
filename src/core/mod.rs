pub mod coerce;
pub mod config;
pub mod config_loader;
pub mod constants;
pub mod error;

pub use coerce::*;
pub use config::*;
pub use config_loader::*;
pub use error::*;
