//! Configuration: the model, file and directory loading, environment
//! substitution, durations and the sample config.

pub mod model;
pub mod load;
pub mod env;
pub mod duration;
pub mod error;
pub mod sample;

pub use model::{AgentSettings, Config};
pub use duration::{Duration, DurationParse};
pub use error::ConfigError;
pub use sample::print_sample_config;
