//! Theories: literals, clauses, and the models built from them.

pub mod clause;
pub mod literal;
pub mod model;
pub mod parse;

pub use self::clause::{Clause, RClause};
pub use self::literal::Literal;
pub use self::model::{rank, Bounds, Model};
