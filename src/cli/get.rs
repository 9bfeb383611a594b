//! Get command implementation

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use super::utils::render;
use super::OutputFormat;
use crate::config::ConfigStore;

#[derive(Args)]
pub struct GetArgs {
    /// Dot-delimited key, e.g. processors.batch.timeout
    #[arg(value_name = "KEY")]
    pub key: String,
}

pub fn run(store: &ConfigStore, args: GetArgs, format: OutputFormat) -> Result<()> {
    let Some(value) = store.get(&args.key) else {
        anyhow::bail!("Key not found: {}", args.key);
    };

    // Plain strings print bare so the output can be used in scripts.
    match value {
        Value::String(s) => println!("{}", s),
        other => print!("{}", render(other, format)?),
    }
    Ok(())
}
