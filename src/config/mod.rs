//! Configuration loading and `--set` overrides
//!
//! Config files are layered into a [`ConfigStore`]; `--set key=value` flags
//! are then applied per key on top (CLI > later files > earlier files).

pub mod loader;
pub mod overlay;
pub mod properties;
pub mod store;

pub use loader::load_files;
pub use overlay::{add_set_flag, apply_overrides, apply_set_flag, OverlayError, SET_FLAG_NAME};
pub use properties::PropertiesError;
pub use store::{ConfigStore, StoreError};
