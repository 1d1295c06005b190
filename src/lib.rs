//! src/lib.rs
pub mod configuration;
pub mod engine;
pub mod job;
pub mod splitter;
pub mod staging;
pub mod telemetry;
pub mod wordcount;
