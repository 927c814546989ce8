use std::fmt;
use thiserror::Error;

pub type FormulaFn = fn(&[f64]) -> f64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombinatorError {
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("produced a non-finite value from finite arguments")]
    NonFiniteResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    Sum,
}

impl ReduceOp {
    /// Folds strictly left to right so results match the declared argument order bit for bit.
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Self::Sum => values.iter().fold(0.0, |acc, &v| acc + v),
        }
    }
}

impl fmt::Display for ReduceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
        }
    }
}

#[derive(Clone, Copy)]
pub enum Combinator {
    Reduce(ReduceOp),
    Formula { arity: usize, func: FormulaFn },
}

impl Combinator {
    pub fn sum() -> Self {
        Self::Reduce(ReduceOp::Sum)
    }

    pub fn formula(arity: usize, func: FormulaFn) -> Self {
        Self::Formula { arity, func }
    }

    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Reduce(_) => None,
            Self::Formula { arity, .. } => Some(*arity),
        }
    }

    pub fn check_arity(&self, found: usize) -> Result<(), CombinatorError> {
        match self.arity() {
            Some(expected) if expected != found => {
                Err(CombinatorError::ArityMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&self, values: &[f64]) -> Result<f64, CombinatorError> {
        self.check_arity(values.len())?;

        match self {
            // Reductions carry IEEE overflow through like plain addition.
            Self::Reduce(op) => Ok(op.apply(values)),
            Self::Formula { func, .. } => {
                let result = func(values);
                if !result.is_finite() && values.iter().all(|v| v.is_finite()) {
                    return Err(CombinatorError::NonFiniteResult);
                }
                Ok(result)
            }
        }
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reduce(op) => f.debug_tuple("Reduce").field(op).finish(),
            Self::Formula { arity, .. } => f
                .debug_struct("Formula")
                .field("arity", arity)
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reduce(op) => write!(f, "{}", op),
            Self::Formula { arity, .. } => write!(f, "formula/{}", arity),
        }
    }
}
