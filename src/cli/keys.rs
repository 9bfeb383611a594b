//! Keys command implementation

use anyhow::Result;

use crate::config::ConfigStore;

pub fn run(store: &ConfigStore) -> Result<()> {
    for key in store.all_keys() {
        println!("{}", key);
    }
    Ok(())
}
