use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only view of the values an external engine has already computed.
pub trait BaseSource {
    fn value(&self, name: &str) -> Option<f64>;

    fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }
}

impl<T: BaseSource + ?Sized> BaseSource for &T {
    fn value(&self, name: &str) -> Option<f64> {
        (**self).value(name)
    }
}

impl<S: BuildHasher> BaseSource for HashMap<String, f64, S> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> BaseSource for HashMap<&str, f64, S> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl BaseSource for BTreeMap<String, f64> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<S: BuildHasher> BaseSource for IndexMap<String, f64, S> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}
