use super::argument::ArgSpec;
use super::combinator::{Combinator, FormulaFn, ReduceOp};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Rule {
    combinator: Combinator,
    arguments: Vec<ArgSpec>,
}

impl Rule {
    pub fn new<I, A>(combinator: Combinator, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgSpec>,
    {
        Self {
            combinator,
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sum<I, A>(arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgSpec>,
    {
        Self::new(Combinator::Reduce(ReduceOp::Sum), arguments)
    }

    pub fn formula<I, A>(arity: usize, func: FormulaFn, arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ArgSpec>,
    {
        Self::new(Combinator::formula(arity, func), arguments)
    }

    pub fn combinator(&self) -> &Combinator {
        &self.combinator
    }

    pub fn arguments(&self) -> &[ArgSpec] {
        &self.arguments
    }

    /// Quantity names this rule depends on, in declared order, duplicates included.
    pub fn references(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.arguments.iter().filter_map(ArgSpec::as_reference)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.combinator)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
