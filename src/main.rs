//! collector-config: load collector configuration and apply `--set` overrides

use anyhow::Result;

fn main() -> Result<()> {
    collector_config::cli::run()
}
