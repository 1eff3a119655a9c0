pub mod cli;
pub mod metrics;
pub mod report;
