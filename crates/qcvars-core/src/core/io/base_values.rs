use crate::core::source::BaseSource;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaseValuesError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Quantity '{name}' is listed more than once in '{path}'")]
    DuplicateName { path: String, name: String },
    #[error("Unsupported base value file '{path}': expected a .toml or .csv extension")]
    UnsupportedFormat { path: String },
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    name: String,
    value: f64,
}

/// Values reported by an external engine, keyed by quantity name in the order they were read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseValues {
    values: IndexMap<String, f64>,
}

impl BaseValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, BaseValuesError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::load_toml(path),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::load_csv(path),
            _ => Err(BaseValuesError::UnsupportedFormat {
                path: path.to_string_lossy().to_string(),
            }),
        }
    }

    fn load_toml(path: &Path) -> Result<Self, BaseValuesError> {
        let content = std::fs::read_to_string(path).map_err(|e| BaseValuesError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let values: IndexMap<String, f64> =
            toml::from_str(&content).map_err(|e| BaseValuesError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        Ok(Self { values })
    }

    fn load_csv(path: &Path) -> Result<Self, BaseValuesError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| BaseValuesError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut values = IndexMap::new();
        for result in reader.deserialize::<CsvRecord>() {
            let record = result.map_err(|e| BaseValuesError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            match values.entry(record.name) {
                Entry::Occupied(entry) => {
                    return Err(BaseValuesError::DuplicateName {
                        path: path.to_string_lossy().to_string(),
                        name: entry.key().clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(record.value);
                }
            }
        }
        Ok(Self { values })
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl BaseSource for BaseValues {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for BaseValues {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_toml_reads_quoted_quantity_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.toml");
        fs::write(
            &path,
            r#"
            "SAPT EXCH10 ENERGY" = 0.02
            "SAPT EXCH10(S^2) ENERGY" = 0.018
            "SAPT ELST10,R ENERGY" = -1
            "#,
        )
        .unwrap();

        let values = BaseValues::load(&path).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values.get("SAPT EXCH10 ENERGY"), Some(0.02));
        assert_eq!(values.get("SAPT EXCH10(S^2) ENERGY"), Some(0.018));
        assert_eq!(values.get("SAPT ELST10,R ENERGY"), Some(-1.0));
    }

    #[test]
    fn load_csv_preserves_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.csv");
        fs::write(
            &path,
            "name,value\n\"SAPT ELST10,R ENERGY\",-0.5\nSAPT EXCH10 ENERGY, 0.25\n",
        )
        .unwrap();

        let values = BaseValues::load(&path).unwrap();
        let names: Vec<_> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["SAPT ELST10,R ENERGY", "SAPT EXCH10 ENERGY"]);
        assert_eq!(values.get("SAPT EXCH10 ENERGY"), Some(0.25));
    }

    #[test]
    fn load_csv_rejects_duplicate_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.csv");
        fs::write(&path, "name,value\nA,1.0\nA,2.0\n").unwrap();

        let result = BaseValues::load(&path);
        assert!(
            matches!(result, Err(BaseValuesError::DuplicateName { ref name, .. }) if name == "A")
        );
    }

    #[test]
    fn load_csv_fails_for_non_numeric_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "name,value\nA,not-a-number\n").unwrap();
        assert!(matches!(
            BaseValues::load(&path),
            Err(BaseValuesError::Csv { .. })
        ));
    }

    #[test]
    fn load_toml_fails_for_malformed_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not toml").unwrap();
        assert!(matches!(
            BaseValues::load(&path),
            Err(BaseValuesError::Toml { .. })
        ));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            BaseValues::load(&path),
            Err(BaseValuesError::Io { .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.json");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(
            BaseValues::load(&path),
            Err(BaseValuesError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn collected_values_act_as_base_source() {
        let values: BaseValues = [("A", 1.0), ("B", 2.0)].into_iter().collect();
        assert_eq!(values.value("B"), Some(2.0));
        assert!(values.contains("A"));
        assert!(!values.contains("C"));
    }
}
