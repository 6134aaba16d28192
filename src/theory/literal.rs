//! Literals.

use std::fmt;

use crate::common::{consts::syntax, str_hash};

/// A predicate application with a polarity.
///
/// Arguments are variable names, canonical literals built by the
/// [parser](../parse/index.html) use `v0`, `v1`, ...
///
/// # Examples
///
/// ```rust
/// # use wfolearn::theory::Literal;
/// let lit = Literal::new("friends", false, vec!["v0".into(), "v1".into()]);
/// assert_eq! { lit.to_string(), "!friends(v0,v1)" }
/// let lit = Literal::new("smokes", true, vec!["v0".into()]);
/// assert_eq! { lit.to_string(), "smokes(v0)" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    /// Predicate name.
    name: String,
    /// Polarity, false for negative literals.
    positive: bool,
    /// Arguments.
    args: Vec<String>,
}
impl Literal {
    /// Constructor.
    pub fn new<S: Into<String>>(name: S, positive: bool, args: Vec<String>) -> Self {
        Literal {
            name: name.into(),
            positive,
            args,
        }
    }

    /// Predicate name.
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Polarity.
    pub fn is_positive(&self) -> bool {
        self.positive
    }
    /// Arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }
    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Stable hash of the literal.
    pub fn hash_code(&self) -> u64 {
        let mut res = 1u64;
        res = res.wrapping_mul(31).wrapping_add(str_hash(&self.name));
        res = res
            .wrapping_mul(37)
            .wrapping_add(if self.positive { 1 } else { 0 });
        for arg in &self.args {
            res = res.wrapping_mul(41).wrapping_add(str_hash(arg))
        }
        res
    }
}
impl fmt::Display for Literal {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if !self.positive {
            write!(fmt, "{}", syntax::negation)?
        }
        write!(fmt, "{}{}", self.name, syntax::start_args)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                write!(fmt, "{}", syntax::arg_sep)?
            }
            write!(fmt, "{}", arg)?
        }
        write!(fmt, "{}", syntax::end_args)
    }
}
