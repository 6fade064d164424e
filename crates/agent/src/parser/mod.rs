/// Payload parsing module
///
/// Turns raw bytes handed over by an input plugin into metrics.
///
/// # Architecture
///
/// - `traits.rs`: the `MetricParser` trait every data format implements
/// - `model.rs`: declared data types and parse errors
/// - `value.rs`: single-scalar payloads ("value" data format)

pub mod traits;
pub mod model;
pub mod value;

// Re-export commonly used types
pub use traits::MetricParser;
pub use model::{DataType, ParseError};
pub use value::ValueParser;
