//! Configuration management

pub mod file_loader;
pub mod kubeconfig;
pub mod model;

pub use file_loader::load_from_file;
pub use kubeconfig::{HostEnvironment, KubeconfigError, PathResolver, SystemEnvironment};
pub use model::{Config, KubeconfigSettings, McpSettings};
