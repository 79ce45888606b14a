//! Command implementations

pub mod demo;
pub mod stress;

pub use demo::{DemoReport, DemoStep, run_demo};
pub use stress::{StressResult, run_stress};
