pub mod check;
pub mod deps;
pub mod eval;
pub mod list;

use crate::error::{CliError, Result};
use qcvars::core::families;
use qcvars::core::registry::{Registry, RegistryError};
use tracing::info;

/// Loads the named families, or every available family when none are named.
pub(crate) fn load_registry(names: &[String]) -> Result<Registry> {
    let names: Vec<&str> = if names.is_empty() {
        families::available()
    } else {
        names.iter().map(String::as_str).collect()
    };
    info!(families = ?names, "Loading quantity families.");

    families::load(&names).map_err(|e| match e {
        RegistryError::UnknownFamily(name) => CliError::Config(format!(
            "Unknown quantity family '{}'. Available families: {}",
            name,
            families::available().join(", ")
        )),
        other => other.into(),
    })
}
