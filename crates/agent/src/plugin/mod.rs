//! Plugin capability traits, the name to factory registry and the
//! running instances a loaded configuration holds.

pub mod traits;
pub mod registry;
pub mod running;
pub mod builtin;

pub use traits::{decode, Input, Output, PluginError, Printer};
pub use registry::{InputFactory, OutputFactory, PluginKind, PluginRegistry, RegistryError};
pub use running::{InputConfig, RunningInput, RunningOutput};

#[cfg(test)]
pub(crate) mod mock;
