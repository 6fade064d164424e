//! Built-in plugins compiled into the agent.

pub mod discard;
pub mod file;

pub use discard::Discard;
pub use file::File;

use super::registry::PluginRegistry;

/// Names of the built-in inputs.
pub const INPUTS: &[&str] = &["file"];

/// Names of the built-in outputs.
pub const OUTPUTS: &[&str] = &["discard"];

/// Register every built-in plugin.
pub fn register_all(registry: &mut PluginRegistry) {
    registry.register_input("file", file::new);
    registry.register_output("discard", discard::new);
}
