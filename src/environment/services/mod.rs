//! Application services for environment configuration.

mod resolver;

pub use resolver::{EnvironmentConfigError, EnvironmentConfigResult, EnvironmentConfigService};
