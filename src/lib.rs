//! collector-config: load collector configuration and apply `--set` overrides
//!
//! Config files are read into a hierarchical [`config::ConfigStore`]; repeated
//! `--set key=value` flags then replace scalars and arrays and join maps.

pub mod cli;
pub mod config;
