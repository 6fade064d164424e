// Module structure for the gatherd agent.

// Core infrastructure
pub mod metric;
pub mod parser;
pub mod plugin;

// Configuration and process lifecycle
pub mod conf;
pub mod cli;
pub mod runtime;
