//! Scores, and the parser of the inference engine's output.

use crate::common::{consts::output, *};

/// Value of a circuit statistic the engine did not report.
pub const UNKNOWN: u64 = u64::MAX;

/// Result of one engine run on a model and a set of databases.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Index of the model in the batch it was scored in.
    model: usize,
    /// Learned model, as printed by the engine.
    learned: Vec<String>,
    /// Log-likelihood.
    ll: f64,
    /// Order of the partition function circuit.
    partition_order: u64,
    /// Size of the partition function circuit.
    partition_size: u64,
    /// Orders of the query circuits.
    query_orders: Vec<u64>,
    /// Sizes of the query circuits.
    query_sizes: Vec<u64>,
    /// True if the engine reported a log-likelihood.
    compilable: bool,
}
impl Score {
    /// Empty, non-compilable score.
    pub fn new(model: usize) -> Self {
        Score {
            model,
            learned: vec![],
            ll: 0.,
            partition_order: UNKNOWN,
            partition_size: UNKNOWN,
            query_orders: vec![],
            query_sizes: vec![],
            compilable: false,
        }
    }

    /// Parses the output of an engine run.
    ///
    /// Only fails on IO errors. Output without a log-likelihood line yields
    /// a non-compilable score.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use wfolearn::task::Score;
    /// let output = "\
    /// Learned model:
    /// 1.5 smokes(v0)
    /// End learned model
    /// Partition function has order 2
    /// Partition function has size 17
    /// Query circuit has size 4
    /// Query circuit has size 21
    /// Final loglikelihood: 12.5
    /// ";
    /// let score = Score::of_output(0, output.as_bytes()).unwrap();
    /// assert!(score.is_compilable());
    /// assert_eq! { score.ll(), -12.5 }
    /// assert_eq! { score.max_circuit_size(), 21 }
    /// assert_eq! { score.min_circuit_size(), 4 }
    /// assert_eq! { score.learned_model_string(), "1.5 smokes(v0)\n" }
    /// ```
    pub fn of_output<R: BufRead>(model: usize, reader: R) -> Res<Self> {
        let mut score = Self::new(model);
        let mut in_model = false;

        for line in reader.lines() {
            let line = line?;

            if line.trim() == output::model_end {
                in_model = false
            }
            if in_model {
                score.learned.push(line.clone())
            }
            if line.trim() == output::model_start {
                in_model = true
            }

            if line.starts_with(output::partition_order) {
                if let Some(val) = digits_of(&line) {
                    score.partition_order = val
                }
            } else if line.starts_with(output::partition_size) {
                if let Some(val) = digits_of(&line) {
                    score.partition_size = val
                }
            } else if line.starts_with(output::query_order) {
                if let Some(val) = digits_of(&line) {
                    score.query_orders.push(val)
                }
            } else if line.starts_with(output::query_size) {
                if let Some(val) = digits_of(&line) {
                    score.query_sizes.push(val)
                }
            } else if line.starts_with(output::loglikelihood) {
                // Third token, the engine reports the negated log-likelihood.
                match line.split(' ').nth(2).map(str::parse::<f64>) {
                    Some(Ok(val)) => {
                        score.ll = -val;
                        score.compilable = true
                    }
                    _ => log_debug! { "ignoring illegal log-likelihood line `{}`", line },
                }
            }
        }

        Ok(score)
    }

    /// Index of the model this score is for.
    pub fn model(&self) -> usize {
        self.model
    }
    /// Log-likelihood.
    pub fn ll(&self) -> f64 {
        self.ll
    }
    /// True if the engine reported a log-likelihood.
    pub fn is_compilable(&self) -> bool {
        self.compilable
    }
    /// Order of the partition function circuit.
    pub fn partition_order(&self) -> u64 {
        self.partition_order
    }
    /// Size of the partition function circuit.
    pub fn partition_size(&self) -> u64 {
        self.partition_size
    }
    /// Orders of the query circuits.
    pub fn query_orders(&self) -> &[u64] {
        &self.query_orders
    }
    /// Sizes of the query circuits.
    pub fn query_sizes(&self) -> &[u64] {
        &self.query_sizes
    }

    /// Maximum circuit order.
    pub fn max_circuit_order(&self) -> u64 {
        self.query_orders
            .iter()
            .fold(self.partition_order, |acc, order| acc.max(*order))
    }
    /// Maximum circuit size.
    pub fn max_circuit_size(&self) -> u64 {
        self.query_sizes
            .iter()
            .fold(self.partition_size, |acc, size| acc.max(*size))
    }
    /// Minimum circuit size.
    pub fn min_circuit_size(&self) -> u64 {
        self.query_sizes
            .iter()
            .fold(self.partition_size, |acc, size| acc.min(*size))
    }

    /// Learned model, one line per line.
    pub fn learned_model(&self) -> &[String] {
        &self.learned
    }
    /// Learned model as a string, each line terminated by a newline.
    pub fn learned_model_string(&self) -> String {
        let mut s = String::new();
        for line in &self.learned {
            s.push_str(line);
            s.push('\n')
        }
        s
    }
}

/// Number formed by the digits of a line, if any.
fn digits_of(line: &str) -> Option<u64> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
