//! Process lifecycle: boot, then run the selected mode.

pub mod boot;
pub mod run;
