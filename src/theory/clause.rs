//! Hash-consed clauses.
//!
//! Clauses are shared by all the models built during the search, so they are
//! hash-consed: cloning a [`Clause`][clause] is cheap and equality is a
//! pointer comparison.
//!
//! [clause]: type.Clause.html (Clause type)

use std::fmt;

use hashconsing::{HConsed, HashConsign};

use crate::{common::consts::syntax, theory::Literal};

hashconsing::consign! {
    /// Clause factory.
    let factory = consign(1_000) for RClause ;
}

/// Creates a clause.
///
/// The literals are sorted so that two disjunctions of the same literals
/// yield the same clause, whatever the order they are given in.
///
/// # Examples
///
/// ```rust
/// # use wfolearn::theory::{clause, Literal};
/// let p = Literal::new("p", true, vec!["v0".into()]);
/// let q = Literal::new("q", false, vec!["v0".into()]);
/// let c_1 = clause::new(vec![p.clone(), q.clone()]);
/// let c_2 = clause::new(vec![q, p]);
/// assert_eq! { c_1, c_2 }
/// assert_eq! { c_1.hash_code(), c_2.hash_code() }
/// assert_eq! { c_1.to_string(), "p(v0) v !q(v0)" }
/// ```
pub fn new(mut lits: Vec<Literal>) -> Clause {
    lits.sort();
    lits.dedup();
    factory.mk(RClause { lits })
}

/// A hash-consed clause.
pub type Clause = HConsed<RClause>;

/// A disjunction of literals.
///
/// Do not build these directly, use [`new`](fn.new.html).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RClause {
    /// Literals, sorted.
    lits: Vec<Literal>,
}
impl RClause {
    /// Literals of the clause.
    pub fn lits(&self) -> &[Literal] {
        &self.lits
    }
    /// Number of literals.
    pub fn len(&self) -> usize {
        self.lits.len()
    }
    /// True if the clause has no literals.
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Stable hash of the clause, used to name artifacts.
    ///
    /// Running multiply-add over the literal hashes. Literals are sorted at
    /// construction, so the hash does not depend on the order the literals
    /// were written in.
    pub fn hash_code(&self) -> u64 {
        self.lits.iter().fold(1u64, |acc, lit| {
            acc.wrapping_mul(31).wrapping_add(lit.hash_code())
        })
    }
}
impl fmt::Display for RClause {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (idx, lit) in self.lits.iter().enumerate() {
            if idx > 0 {
                fmt.write_str(syntax::disjunction)?
            }
            write!(fmt, "{}", lit)?
        }
        Ok(())
    }
}

/// Sorts some clauses by their textual representation.
pub fn sorted<'a, I>(clauses: I) -> Vec<&'a Clause>
where
    I: IntoIterator<Item = &'a Clause>,
{
    let mut res: Vec<(String, &'a Clause)> = clauses
        .into_iter()
        .map(|clause| (clause.get().to_string(), clause))
        .collect();
    res.sort_by(|(s_1, _), (s_2, _)| s_1.cmp(s_2));
    res.into_iter().map(|(_, clause)| clause).collect()
}
