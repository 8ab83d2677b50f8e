// Library exports for the pt-grade CLI
// This allows testing of internal modules

pub mod commands;
pub mod config;
