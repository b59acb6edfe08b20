//! Core logic for geo_drawer.
//! Creates GeoPackage repositories and seeds them with default layers.

pub mod bootstrap;
pub mod config;
pub mod container;
pub mod logging;
pub mod model;
pub mod progress;

pub use bootstrap::{BootstrapError, BootstrapResult, RepositoryBootstrapper};
pub use config::{load_config, parse_config, ConfigError, RepositoryConfig};
pub use container::{Container, ContainerError, ExistingContainerPolicy};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::repository::RepositoryMetadata;
pub use progress::{ProgressSink, StdoutProgress};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
