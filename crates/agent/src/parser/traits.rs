use std::collections::HashMap;

pub use super::model::ParseError;
pub use crate::metric::Metric;

pub trait MetricParser: Send + Sync {
    /// parse a raw payload into zero or more metrics
    fn parse(&self, buf: &[u8]) -> Result<Vec<Metric>, ParseError>;

    /// parse a single line, which must produce a metric
    fn parse_line(&self, line: &str) -> Result<Metric, ParseError>;

    fn set_default_tags(&mut self, tags: HashMap<String, String>);
}
