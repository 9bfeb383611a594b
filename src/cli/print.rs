//! Print command implementation

use anyhow::Result;

use super::utils::render;
use super::OutputFormat;
use crate::config::ConfigStore;

pub fn run(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    print!("{}", render(&store.as_value(), format)?);
    Ok(())
}
