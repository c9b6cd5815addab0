pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{local::LocalStorage, postgres::PostgresSource};
pub use config::{AppConfig, ConnectionProfile};
pub use core::{etl::IdentityEngine, pipeline::IdentityPipeline};
pub use domain::model::{Domain, IdentitySet};
pub use utils::error::{IdentityError, Result};
