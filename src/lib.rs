pub mod artifacts;
pub mod booleans;
pub mod config;
pub mod errors;
pub mod escapes;
pub mod hex_literals;
mod identifier;
pub mod logger;
pub mod metrics;
pub mod pipeline;
pub mod property_access;
pub mod renamer;
pub mod string_table;

pub use pipeline::{deobfuscate, normalize_only, Mode, Pipeline, PipelineOutput, Stage};
