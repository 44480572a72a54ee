pub mod c2dm_adapter;
pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::LogGuard;
