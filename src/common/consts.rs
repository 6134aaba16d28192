//! Constants of the crate.

/// Theory syntax, as understood by the inference engine.
pub mod syntax {
    /// Separates the literals of a clause.
    pub const disjunction: &str = " v ";
    /// Opens the argument list of a literal.
    pub const start_args: char = '(';
    /// Closes the argument list of a literal.
    pub const end_args: char = ')';
    /// Separates the arguments of a literal.
    pub const arg_sep: char = ',';
    /// Prefix of negative literals.
    pub const negation: char = '!';
    /// Prefix of canonical variable names.
    pub const var_pref: &str = "v";
}

/// Lines and line prefixes of the inference engine's output.
pub mod output {
    /// Line opening the learned model block.
    pub const model_start: &str = "Learned model:";
    /// Line closing the learned model block.
    pub const model_end: &str = "End learned model";
    /// Prefix of the (negated) log-likelihood line.
    pub const loglikelihood: &str = "Final loglikelihood: ";
    /// Prefix of the partition circuit order line.
    pub const partition_order: &str = "Partition function has order";
    /// Prefix of the partition circuit size line.
    pub const partition_size: &str = "Partition function has size";
    /// Prefix of the query circuit order lines.
    pub const query_order: &str = "Query circuit has order";
    /// Prefix of the query circuit size lines.
    pub const query_size: &str = "Query circuit has size";
}

/// Command-line flags of the inference engine.
pub mod engine {
    /// Verbosity flag, needed for the engine to report circuit statistics.
    pub const verbose: &str = "-v";
    /// Likelihood normalization flag.
    pub const normalize_ll: &str = "--normalizell";
    /// Precedes each training database.
    pub const train: &str = "--train";
    /// Environment variable overriding the path to the engine's jar.
    pub const jar_env_var: &str = "WFOMC_JAR";
}

/// Default values of the configuration.
pub mod default {
    /// Default engine command.
    pub const engine: &str = "java -jar forclift.jar";
    /// Default timeout of an engine run, in seconds.
    pub const timeout: u64 = 910;
    /// Default complexity penalty.
    pub const penalty: f64 = 0.01;
    /// Default maximum number of clauses added to the theory.
    pub const max_clauses: usize = 15;
    /// Default search strategy.
    pub const strategy: usize = 0;
    /// Default step size.
    pub const step_size: f64 = 0.99;
    /// Default number of worker threads.
    pub const threads: usize = 2;
}

/// Name of the file user-visible messages are appended to, in the output
/// directory.
pub const message_file: &str = "output.txt";
