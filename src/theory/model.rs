//! Models: a typing header plus a set of clauses, with their scores.

use std::cmp::Ordering;

use crate::{
    common::*,
    task::Score,
    theory::{clause, parse, Clause},
};

/// Iteration-wide normalization bounds.
///
/// Computed by the driver once all the children of an iteration are scored,
/// read-only afterwards. Only used when the objective is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum circuit size.
    pub min_size: u64,
    /// Maximum circuit size.
    pub max_size: u64,
    /// Minimum log-likelihood.
    pub min_ll: f64,
    /// Maximum log-likelihood.
    pub max_ll: f64,
}
impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            min_size: 0,
            max_size: u64::MAX,
            min_ll: -f64::MAX,
            max_ll: f64::MAX,
        }
    }
}
impl Bounds {
    /// Bounds over the first fold score of some models.
    ///
    /// Models without scores are ignored. If no model has a score, the
    /// bounds are empty (minimums above maximums) and normalization yields
    /// zero.
    pub fn of_models<'a, I>(models: I) -> Self
    where
        I: IntoIterator<Item = &'a Model>,
    {
        let mut res = Bounds {
            min_size: u64::MAX,
            max_size: 0,
            min_ll: f64::MAX,
            max_ll: -f64::MAX,
        };
        for score in models.into_iter().filter_map(|m| m.scores().first()) {
            res.min_size = res.min_size.min(score.min_circuit_size());
            res.max_size = res.max_size.max(score.max_circuit_size());
            res.min_ll = res.min_ll.min(score.ll());
            res.max_ll = res.max_ll.max(score.ll());
        }
        res
    }

    /// Normalized log-likelihood.
    pub fn norm_ll(&self, ll: f64) -> f64 {
        normalize(self.min_ll, self.max_ll, ll)
    }
    /// Normalized circuit size.
    pub fn norm_size(&self, size: u64) -> f64 {
        normalize(self.min_size as f64, self.max_size as f64, size as f64)
    }
}

/// Min-max normalization, zero if the range is empty or degenerate.
fn normalize(min: f64, max: f64, val: f64) -> f64 {
    if max > min {
        (val - min) / (max - min)
    } else {
        0.
    }
}

/// Exact min-max normalization, zero if the range is empty or degenerate.
fn normalize_exact(min: &Rat, max: &Rat, val: &Rat) -> Rat {
    if max > min {
        (val - min) / (max - min)
    } else {
        Rat::zero()
    }
}

/// A theory under evaluation.
///
/// Clauses and typings only grow. A [child](#method.child) copies the
/// typings and clauses of its parent but none of its scores.
#[derive(Debug, Clone)]
pub struct Model {
    /// Typing declarations.
    typings: BTreeSet<String>,
    /// Clauses.
    clauses: HashSet<Clause>,
    /// Last clause added.
    last_clause: Option<Clause>,
    /// Fold scores.
    scores: Vec<Score>,
    /// Score on all the databases.
    final_score: Option<Score>,
}
impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
impl Model {
    /// Empty model.
    pub fn new() -> Self {
        Model {
            typings: BTreeSet::new(),
            clauses: HashSet::new(),
            last_clause: None,
            scores: vec![],
            final_score: None,
        }
    }

    /// Model with no clauses, typings from a header.
    pub fn of_header(header: &str) -> Self {
        let mut model = Self::new();
        for typing in parse::typings_of_header(header) {
            model.add_typing(typing)
        }
        model
    }

    /// Child of this model extended with a clause.
    pub fn child(&self, clause: Clause) -> Self {
        let mut model = Model {
            typings: self.typings.clone(),
            clauses: self.clauses.clone(),
            last_clause: None,
            scores: vec![],
            final_score: None,
        };
        model.add_clause(clause);
        model
    }

    /// Adds a typing declaration.
    pub fn add_typing<S: Into<String>>(&mut self, typing: S) {
        self.typings.insert(typing.into());
    }
    /// Adds a clause, which becomes the last clause.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.insert(clause.clone());
        self.last_clause = Some(clause)
    }
    /// Adds a fold score.
    pub fn add_score(&mut self, score: Score) {
        self.scores.push(score)
    }
    /// Sets the score on all the databases.
    pub fn add_final_score(&mut self, score: Score) {
        self.final_score = Some(score)
    }

    /// Typing declarations.
    pub fn typings(&self) -> &BTreeSet<String> {
        &self.typings
    }
    /// Clauses.
    pub fn clauses(&self) -> &HashSet<Clause> {
        &self.clauses
    }
    /// Last clause added, if any.
    pub fn last_clause(&self) -> Option<&Clause> {
        self.last_clause.as_ref()
    }
    /// Fold scores.
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }
    /// Score on all the databases, if any.
    pub fn final_score(&self) -> Option<&Score> {
        self.final_score.as_ref()
    }

    /// Hash of the clauses, identifies the model in artifact names and
    /// rankings. Typings are ignored.
    pub fn hash_code(&self) -> u64 {
        let mut hashes: Vec<u64> = self.clauses.iter().map(|c| c.hash_code()).collect();
        hashes.sort_unstable();
        hashes
            .into_iter()
            .fold(1u64, |acc, hash| acc.wrapping_mul(31).wrapping_add(hash))
    }

    /// Sum of the fold log-likelihoods, negative infinity if there are none.
    pub fn ll(&self) -> f64 {
        if self.scores.is_empty() {
            f64::NEG_INFINITY
        } else {
            self.scores.iter().map(Score::ll).sum()
        }
    }

    /// Log-likelihood on all the databases, negative infinity if unscored.
    pub fn final_ll(&self) -> f64 {
        self.final_score
            .as_ref()
            .map(Score::ll)
            .unwrap_or(f64::NEG_INFINITY)
    }

    /// Objective of the model: average over the fold scores of the
    /// log-likelihood minus the penalized maximum circuit size.
    ///
    /// Negative infinity if the model has no fold score.
    pub fn score(&self, conf: &LearnConf, bounds: &Bounds) -> f64 {
        if self.scores.is_empty() {
            return f64::NEG_INFINITY;
        }
        let sum: f64 = self
            .scores
            .iter()
            .map(|score| {
                let (ll, size) = if conf.normalize_obj {
                    (
                        bounds.norm_ll(score.ll()),
                        bounds.norm_size(score.max_circuit_size()),
                    )
                } else {
                    (score.ll(), score.max_circuit_size() as f64)
                };
                ll - conf.penalty * size
            })
            .sum();
        sum / (self.scores.len() as f64)
    }

    /// Same as [`score`](#method.score), using exact arithmetic.
    ///
    /// `None` if the model has no fold score, or if some value is not
    /// finite.
    pub fn score_exact(&self, conf: &LearnConf, bounds: &Bounds) -> Option<Rat> {
        if self.scores.is_empty() {
            return None;
        }
        let penalty = Rat::from_float(conf.penalty)?;
        let bounds = if conf.normalize_obj {
            Some((
                Rat::from_float(bounds.min_ll)?,
                Rat::from_float(bounds.max_ll)?,
                Rat::from_integer(Int::from(bounds.min_size)),
                Rat::from_integer(Int::from(bounds.max_size)),
            ))
        } else {
            None
        };

        let mut sum = Rat::zero();
        for score in &self.scores {
            let mut ll = Rat::from_float(score.ll())?;
            let mut size = Rat::from_integer(Int::from(score.max_circuit_size()));
            if let Some((min_ll, max_ll, min_size, max_size)) = bounds.as_ref() {
                ll = normalize_exact(min_ll, max_ll, &ll);
                size = normalize_exact(min_size, max_size, &size);
            }
            sum = sum + ll - &penalty * size
        }
        Some(sum / Rat::from_integer(Int::from(self.scores.len())))
    }

    /// Compares the objective of two models, best first.
    ///
    /// Objectives that are not a number compare as negative infinity.
    pub fn compare(&self, other: &Self, conf: &LearnConf, bounds: &Bounds) -> Ordering {
        cmp_desc(self.score(conf, bounds), other.score(conf, bounds))
    }

    /// Theory file content: typings, a blank line, and clauses.
    pub fn to_theory_string(&self) -> String {
        let mut s = String::new();
        for typing in &self.typings {
            s.push_str(typing);
            s.push('\n')
        }
        s.push('\n');
        for clause in clause::sorted(&self.clauses) {
            s.push_str(&clause.to_string());
            s.push('\n')
        }
        s
    }

    /// Clause set as a string, in the ranking format.
    pub fn clauses_string(&self) -> String {
        let clauses: Vec<String> = clause::sorted(&self.clauses)
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        format!("[{}]", clauses.join(", "))
    }
}

/// Descending comparison of two objectives, NaN is negative infinity.
fn cmp_desc(lft: f64, rgt: f64) -> Ordering {
    let fix = |val: f64| if val.is_nan() { f64::NEG_INFINITY } else { val };
    fix(rgt)
        .partial_cmp(&fix(lft))
        .unwrap_or(Ordering::Equal)
}

/// Ranks the models that have exactly `folds` fold scores, best first.
///
/// The sort is stable: models with the same objective keep their relative
/// order. Other models are dropped.
pub fn rank(models: Vec<Model>, folds: usize, conf: &LearnConf, bounds: &Bounds) -> Vec<Model> {
    let mut scored: Vec<(f64, Model)> = models
        .into_iter()
        .filter(|model| model.scores().len() == folds)
        .map(|model| (model.score(conf, bounds), model))
        .collect();
    scored.sort_by(|(lft, _), (rgt, _)| cmp_desc(*lft, *rgt));
    scored.into_iter().map(|(_, model)| model).collect()
}
