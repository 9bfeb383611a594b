//! `--set key=value` overrides
//!
//! Overrides are applied key by key instead of being merged as a whole tree:
//! a scalar or array replaces whatever the loaded config had at that key,
//! while map values are flattened into their leaf keys so they join the
//! existing map.

use clap::parser::MatchesError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use super::properties::{self, PropertiesError};
use super::store::{join_key, ConfigStore, StoreError};

/// Id and long name of the override flag.
pub const SET_FLAG_NAME: &str = "set";

const SET_FLAG_HELP: &str = "Set arbitrary component config property. The component has to be \
defined in the config file and the flag has a higher precedence. Array config properties are \
overridden and maps are joined, note that only a single (first) array property can be set e.g. \
--set=processors.attributes.actions.key=some_key. Example --set=processors.batch.timeout=2s";

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error(transparent)]
    FlagRead(#[from] MatchesError),

    #[error("failed to read set flag config: {0}")]
    Parse(#[from] PropertiesError),

    #[error("failed to apply set flag config: {0}")]
    Store(#[from] StoreError),
}

/// Register the repeatable `--set` flag on `cmd`.
pub fn add_set_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(SET_FLAG_NAME)
            .long(SET_FLAG_NAME)
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help(SET_FLAG_HELP),
    )
}

/// Read the `--set` values from parsed arguments and apply them to `store`.
pub fn apply_set_flag(store: &mut ConfigStore, matches: &ArgMatches) -> Result<(), OverlayError> {
    let overrides: Vec<String> = matches
        .try_get_many::<String>(SET_FLAG_NAME)?
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    apply_overrides(store, &overrides)
}

/// Apply raw `key=value` overrides to `store`.
///
/// The overrides are decoded as one properties document and written to a copy
/// of `store`, which replaces it only once every key is set. Any error leaves
/// `store` untouched.
pub fn apply_overrides(store: &mut ConfigStore, overrides: &[String]) -> Result<(), OverlayError> {
    if overrides.is_empty() {
        return Ok(());
    }

    let mut document = String::new();
    for entry in overrides {
        document.push_str(entry.trim());
        document.push('\n');
    }

    let decoded = properties::decode(&document)?;

    let leaves = decoded.leaves();
    tracing::debug!(
        "Applying {} override key(s) from {} --set flag(s)",
        leaves.len(),
        overrides.len()
    );
    let mut patched = store.clone();
    for (path, value) in leaves {
        tracing::debug!("--set {} = {}", join_key(&path), value);
        patched.set_path(&path, value.clone())?;
    }
    *store = patched;
    Ok(())
}
