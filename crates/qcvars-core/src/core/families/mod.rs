//! # Families Module
//!
//! Each family of derived quantities is produced by one factory function returning a fully
//! populated [`Registry`]. Families are independent of the evaluator: adding a new family
//! means adding a factory and an entry in the name table below, nothing else.
//!
//! - [`sapt`] - Symmetry-adapted perturbation theory interaction-energy components
//!   (SAPT0, sSAPT0, SCS-SAPT0, SAPT2 through SAPT2+3(CCD)dMP2)

pub mod sapt;

use crate::core::registry::{Registry, RegistryBuilder, RegistryError};
use phf::{Map, phf_map};

pub type FamilyFactory = fn() -> Registry;

static FAMILIES: Map<&'static str, FamilyFactory> = phf_map! {
    "sapt" => sapt::sapt_psivars as FamilyFactory,
};

pub fn by_name(name: &str) -> Result<Registry, RegistryError> {
    FAMILIES
        .get(name)
        .map(|factory| factory())
        .ok_or_else(|| RegistryError::UnknownFamily(name.to_string()))
}

/// Family names in alphabetical order.
pub fn available() -> Vec<&'static str> {
    let mut names: Vec<_> = FAMILIES.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Loads and merges the named families into a single registry.
pub fn load<S: AsRef<str>>(names: &[S]) -> Result<Registry, RegistryError> {
    let mut builder = RegistryBuilder::new();
    for name in names {
        builder = builder.family(by_name(name.as_ref())?);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_returns_sapt_family() {
        let registry = by_name("sapt").unwrap();
        assert!(registry.contains("SAPT0 TOTAL ENERGY"));
    }

    #[test]
    fn by_name_rejects_unknown_family() {
        assert_eq!(
            by_name("mp2").unwrap_err(),
            RegistryError::UnknownFamily("mp2".to_string())
        );
    }

    #[test]
    fn available_lists_registered_families() {
        assert_eq!(available(), vec!["sapt"]);
    }

    #[test]
    fn load_merges_requested_families() {
        let registry = load(&["sapt"]).unwrap();
        assert_eq!(registry.len(), sapt::sapt_psivars().len());
    }

    #[test]
    fn load_rejects_the_same_family_twice() {
        let err = load(&["sapt", "sapt"]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRule { .. }));
    }
}
