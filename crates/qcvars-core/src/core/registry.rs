//! # Registry Module
//!
//! Holds the immutable mapping from derived-quantity name to [`Rule`].
//!
//! ## Overview
//!
//! A [`Registry`] is produced once by a family factory (see [`crate::core::families`]) and is
//! read-only afterwards. Lookups are exact-match on the quantity name; no whitespace or case
//! normalization is ever applied, so `SAPT2+(3)(CCD)DMP2 TOTAL ENERGY` and
//! `SAPT2+(3)(CCD) TOTAL ENERGY` are distinct keys.
//!
//! Rules keep their declaration order, which is the order used when a caller asks for
//! "every quantity in the registry".
//!
//! Several families can be merged into one registry through [`RegistryBuilder`]. A name
//! claimed by two families is rejected rather than silently overwritten.
//!
//! ```ignore
//! use qcvars::core::families::sapt::sapt_psivars;
//! use qcvars::core::registry::RegistryBuilder;
//!
//! let registry = RegistryBuilder::new().family(sapt_psivars()).build()?;
//! let rule = registry.lookup("SAPT0 TOTAL ENERGY")?;
//! ```

use crate::core::rules::Rule;
use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown derived quantity: '{name}'")]
    UnknownQuantity { name: String },

    #[error("Quantity '{name}' is defined by both the '{first}' and '{second}' families")]
    DuplicateRule {
        name: String,
        first: String,
        second: String,
    },

    #[error("Unknown quantity family: '{0}'")]
    UnknownFamily(String),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    families: Vec<String>,
    rules: IndexMap<String, Rule>,
}

impl Registry {
    /// Builds a single-family table. Later entries replace earlier ones with the same name.
    pub fn from_rules<I, N>(family: &str, rules: I) -> Self
    where
        I: IntoIterator<Item = (N, Rule)>,
        N: Into<String>,
    {
        Self {
            families: vec![family.to_string()],
            rules: rules
                .into_iter()
                .map(|(name, rule)| (name.into(), rule))
                .collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Rule, RegistryError> {
        self.rules
            .get(name)
            .ok_or_else(|| RegistryError::UnknownQuantity {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    families: Vec<Registry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn family(mut self, registry: Registry) -> Self {
        self.families.push(registry);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut merged = Registry::default();
        let mut owners: IndexMap<String, String> = IndexMap::new();

        for family in self.families {
            let family_label = family.families.join("+");
            for (name, rule) in family.rules {
                match owners.entry(name.clone()) {
                    Entry::Occupied(owner) => {
                        return Err(RegistryError::DuplicateRule {
                            name,
                            first: owner.get().clone(),
                            second: family_label,
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(family_label.clone());
                    }
                }
                merged.rules.insert(name, rule);
            }
            merged.families.extend(family.families);
        }

        Ok(merged)
    }
}
