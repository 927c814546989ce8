use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ArgSpec {
    Literal(f64),
    Reference(String),
}

impl ArgSpec {
    pub fn literal(value: f64) -> Self {
        Self::Literal(value)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            Self::Literal(_) => None,
        }
    }
}

impl From<&str> for ArgSpec {
    fn from(name: &str) -> Self {
        Self::Reference(name.to_string())
    }
}

impl From<String> for ArgSpec {
    fn from(name: String) -> Self {
        Self::Reference(name)
    }
}

impl From<f64> for ArgSpec {
    fn from(value: f64) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{}", value),
            Self::Reference(name) => write!(f, "'{}'", name),
        }
    }
}
