use crate::metric::Metric;
use crate::plugin::traits::{Output, PluginError, Printer};

/// Output that accepts every metric and drops it.
#[derive(Debug, Default)]
pub struct Discard;

pub fn new() -> Box<dyn Output> {
    Box::new(Discard)
}

impl Printer for Discard {
    fn description(&self) -> &str {
        "Send metrics to nowhere at all"
    }

    fn sample_config(&self) -> &str {
        ""
    }
}

impl Output for Discard {
    fn connect(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    fn write(&mut self, _metrics: &[Metric]) -> Result<(), PluginError> {
        Ok(())
    }
}
