//! Parses theories: typing headers and candidate clauses.
//!
//! Clauses are written one per line, literals separated by ` v `, negative
//! literals prefixed by `!`:
//!
//! ```text
//! workedUnder(-1,-2) v !workedUnder(-3,-2) v !actor(-1)
//! !workedUnder(v0,v1) v !movie(v2,v0) v !movie(v2,v1)
//! ```
//!
//! Parsing canonicalizes clauses: variables are renamed `v0`, `v1`, ... and
//! literals are sorted. Among all the renamings, the one yielding the smallest
//! sorted literals is kept, so that clauses equal up to variable renaming and
//! literal order parse to the same clause, and so that printing a clause and
//! parsing it again is the identity.
//!
//! Renamings are only enumerated among variables with the same occurrences,
//! see [`Occurrences`](type.Occurrences.html). Variables with fewer or earlier
//! occurrences get the lower indices.

use crate::{
    common::{consts::syntax, *},
    theory::{clause, Clause, Literal},
};

/// Typing declarations of a header, one per non-empty line.
pub fn typings_of_header(header: &str) -> Vec<String> {
    header
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Parses the distinct clauses of a theory, in order of first appearance.
///
/// Empty lines are ignored. Fails on the first malformed clause.
pub fn clauses_of_theory(theory: &str) -> Res<Vec<Clause>> {
    let mut known = HashSet::new();
    let mut res = vec![];
    for (line, clause) in lines(theory) {
        let clause = clause_of_str(clause, line)?;
        if known.insert(clause.clone()) {
            res.push(clause)
        }
    }
    Ok(res)
}

/// Parses the distinct clauses of a theory, indexed by their length.
pub fn clauses_per_length(theory: &str) -> Res<BTreeMap<usize, Vec<Clause>>> {
    let mut res: BTreeMap<usize, Vec<Clause>> = BTreeMap::new();
    for clause in clauses_of_theory(theory)? {
        res.entry(clause.len()).or_insert_with(Vec::new).push(clause)
    }
    Ok(res)
}

/// Non-empty lines of a theory, with their line number (starting at 1).
fn lines(theory: &str) -> impl Iterator<Item = (usize, &str)> {
    theory
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Parses a single clause. `line` is only used in errors.
///
/// # Examples
///
/// ```rust
/// # use wfolearn::theory::parse::clause_of_str;
/// let c_1 = clause_of_str("smokes(X) v !friends(X,Y)", 1).unwrap();
/// let c_2 = clause_of_str("!friends(A,B) v smokes(A)", 1).unwrap();
/// assert_eq! { c_1, c_2 }
/// assert_eq! { c_1.to_string(), "!friends(v0,v1) v smokes(v0)" }
/// ```
pub fn clause_of_str(text: &str, line: usize) -> Res<Clause> {
    // Distinct literals, sorted.
    let raw: BTreeSet<&str> = text.split(syntax::disjunction).map(str::trim).collect();
    let mut lits = Vec::with_capacity(raw.len());
    for lit in raw {
        lits.push(split_literal(lit, line)?)
    }

    if lits.is_empty() {
        bail!(ErrorKind::ParseError(line, "empty clause".into()))
    }

    Ok(clause::new(smallest_renaming(&lits)))
}

/// Predicate, polarity and position of each occurrence of a variable, sorted.
pub type Occurrences<'a> = Vec<(&'a str, bool, usize)>;

/// A literal before renaming.
type RawLit<'a> = (String, bool, Vec<&'a str>);

/// Renames the variables of some literals so that the sorted result is
/// minimal.
fn smallest_renaming(lits: &[RawLit]) -> Vec<Literal> {
    // Variables grouped by occurrences, groups in increasing order.
    let mut occurrences: BTreeMap<&str, Occurrences> = BTreeMap::new();
    for (name, positive, args) in lits {
        for (pos, arg) in args.iter().enumerate() {
            occurrences
                .entry(*arg)
                .or_insert_with(Vec::new)
                .push((name.as_str(), *positive, pos))
        }
    }
    let mut classes: BTreeMap<Occurrences, Vec<&str>> = BTreeMap::new();
    for (var, mut occs) in occurrences {
        occs.sort();
        classes.entry(occs).or_insert_with(Vec::new).push(var)
    }

    // Variables allowed at each index.
    let mut slots: Vec<&[&str]> = vec![];
    for vars in classes.values() {
        for _ in vars {
            slots.push(vars)
        }
    }

    let mut renaming = BTreeMap::new();
    let mut best = None;
    rename(lits, &slots, &mut renaming, &mut best);
    best.unwrap_or_default()
}

/// Enumerates the renamings compatible with `slots`, keeps the smallest
/// renamed literals in `best`.
fn rename<'a>(
    lits: &[RawLit<'a>],
    slots: &[&[&'a str]],
    renaming: &mut BTreeMap<&'a str, usize>,
    best: &mut Option<Vec<Literal>>,
) {
    let idx = renaming.len();
    if idx == slots.len() {
        let mut res: Vec<Literal> = lits
            .iter()
            .map(|(name, positive, args)| {
                let args = args
                    .iter()
                    .map(|arg| format!("{}{}", syntax::var_pref, renaming[arg]))
                    .collect();
                Literal::new(name.clone(), *positive, args)
            })
            .collect();
        res.sort();
        let better = match best.as_ref() {
            Some(current) => res < *current,
            None => true,
        };
        if better {
            *best = Some(res)
        }
        return;
    }

    for var in slots[idx] {
        if renaming.contains_key(var) {
            continue;
        }
        renaming.insert(*var, idx);
        rename(lits, slots, renaming, best);
        renaming.remove(var);
    }
}

/// Splits a literal into its name, polarity and raw arguments.
fn split_literal(lit: &str, line: usize) -> Res<(String, bool, Vec<&str>)> {
    macro_rules! fail {
        ($($tt:tt)*) => {
            bail!(ErrorKind::ParseError(line, format!($($tt)*)))
        };
    }

    let positive = !lit.contains(syntax::negation);

    let open = if let Some(idx) = lit.find(syntax::start_args) {
        idx
    } else {
        fail!("expected `{}` in literal `{}`", syntax::start_args, lit)
    };
    let close = if let Some(idx) = lit.rfind(syntax::end_args) {
        idx
    } else {
        fail!("expected `{}` in literal `{}`", syntax::end_args, lit)
    };
    if close < open {
        fail!("illegal literal `{}`", lit)
    }
    if !lit[close + 1..].trim().is_empty() {
        fail!("unexpected `{}` after literal `{}`", &lit[close + 1..], lit)
    }

    let name: String = lit[..open]
        .chars()
        .filter(|c| *c != syntax::negation)
        .collect();
    let name = name.trim();
    if name.is_empty() {
        fail!("literal `{}` has no predicate name", lit)
    }
    if name.chars().any(char::is_whitespace) {
        fail!("illegal predicate name `{}`", name)
    }

    let args: Vec<&str> = lit[open + 1..close]
        .split(syntax::arg_sep)
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .collect();

    Ok((name.to_string(), positive, args))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn literal_splitting() {
        let (name, pos, args) = split_literal("!workedUnder(-3, -2)", 1).unwrap();
        assert_eq! { name, "workedUnder" }
        assert!(!pos);
        assert_eq! { args, vec!["-3", "-2"] }

        let (name, pos, args) = split_literal("nullary()", 1).unwrap();
        assert_eq! { name, "nullary" }
        assert!(pos);
        assert!(args.is_empty());
    }

    #[test]
    fn malformed_literals() {
        for bad in &["p", "p(x", "px)", "(x)", "!(x)", "p)x(", "p(x) q"] {
            match clause_of_str(bad, 7) {
                Ok(clause) => panic!("parsed `{}` as `{}`", bad, clause),
                Err(e) => {
                    assert!(e.is_parse_error());
                    assert!(e.to_string().contains("line 7"))
                }
            }
        }
    }

    #[test]
    fn duplicate_literals() {
        let clause = clause_of_str("p(X) v p(X) v q(X)", 1).unwrap();
        assert_eq! { clause.len(), 2 }
    }

    #[test]
    fn renaming_is_minimal_among_equivalent_variables() {
        let clause = clause_of_str("a(B) v p(A,C) v p(B,D)", 1).unwrap();
        assert_eq! { clause.to_string(), "a(v0) v p(v0,v2) v p(v1,v3)" }
        let clause = clause_of_str("p(A,B) v p(B,C) v p(C,A)", 1).unwrap();
        assert_eq! { clause.to_string(), "p(v0,v1) v p(v1,v2) v p(v2,v0)" }
    }

    #[test]
    fn header() {
        let typings = typings_of_header("person = {a, b}\n\n  smokes(person)  \n");
        assert_eq! { typings, vec!["person = {a, b}", "smokes(person)"] }
    }
}
