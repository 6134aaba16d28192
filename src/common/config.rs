//! Global configuration.
//!
//! The binary builds a [`Config`][conf] from the command line with
//! [`Config::clap`][clap]. Library users build the sub-configurations
//! directly, their `Default` implementations match the command-line defaults.
//!
//! [conf]: struct.Config.html (Config struct)
//! [clap]: struct.Config.html#method.clap (Config's clap function)

use ansi_term::{Colour, Style};
use clap::Arg;

use crate::common::{consts, *};

/// Clap `Command` with static lifetimes.
pub type App = clap::Command<'static>;
/// Clap `ArgMatches`.
pub type Matches = clap::ArgMatches;

/// Inference engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConf {
    /// Program launching the engine.
    pub cmd: String,
    /// Arguments passed to the program before anything else.
    pub args: Vec<String>,
    /// Asks the engine to normalize the likelihood.
    pub normalize_ll: bool,
    /// Time budget of a single engine run, after which it is killed.
    pub timeout: Duration,
}
impl Default for EngineConf {
    fn default() -> Self {
        let mut conf = Self::of_cmd(consts::default::engine);
        conf.apply_jar_env();
        conf
    }
}
impl EngineConf {
    /// Creates a configuration from a command line, split on whitespace into
    /// the program and its leading arguments.
    ///
    /// An empty command line yields an empty program, which fails at spawn
    /// time.
    pub fn of_cmd(cmd: &str) -> Self {
        let mut tokens = cmd.split_whitespace().map(|s| s.to_string());
        let program = tokens.next().unwrap_or_else(String::new);
        EngineConf {
            cmd: program,
            args: tokens.collect(),
            normalize_ll: false,
            timeout: Duration::from_secs(consts::default::timeout),
        }
    }

    /// Replaces the jar path of a `java -jar <path>` command by the value of
    /// the `WFOMC_JAR` environment variable, if any.
    fn apply_jar_env(&mut self) {
        if let Ok(jar) = std::env::var(consts::engine::jar_env_var) {
            if self.args.len() >= 2 && self.args[0] == "-jar" {
                self.args[1] = jar
            }
        }
    }

    /// The command, as a string.
    pub fn cmd_string(&self) -> String {
        let mut s = self.cmd.clone();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg)
        }
        s
    }

    /// Adds clap options to a clap `App`.
    pub fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.arg(
            Arg::new("engine")
                .long("engine")
                .help("sets the command used to launch the inference engine")
                .default_value(consts::default::engine)
                .value_name("CMD")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("normalize_ll")
                .long("normalize_ll")
                .help("(de)activates likelihood normalization in the engine")
                .validator(bool_validator)
                .value_name(bool_format)
                .default_value("no")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .short('t')
                .help("sets the timeout of a single engine run in seconds")
                .validator(int_validator)
                .value_name("int")
                .default_value("910")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
    }

    /// Creates itself from some matches.
    pub fn new(matches: &Matches) -> Self {
        let cmd = matches
            .value_of("engine")
            .expect("unreachable(engine): default is provided");
        let mut conf = Self::of_cmd(cmd);
        if matches.occurrences_of("engine") == 0 {
            conf.apply_jar_env()
        }
        conf.normalize_ll = bool_of_matches(matches, "normalize_ll");
        conf.timeout = Duration::from_secs(int_of_matches(matches, "timeout") as u64);
        conf
    }
}

/// Search configuration.
#[derive(Debug, Clone)]
pub struct LearnConf {
    /// Normalizes log-likelihood and circuit size before combining them.
    pub normalize_obj: bool,
    /// Weight of the circuit size in the objective.
    pub penalty: f64,
    /// Maximum number of clauses added to the theory.
    pub max_clauses: usize,
    /// Search strategy, reported but not used.
    pub strategy: usize,
    /// Step size, reported but not used.
    pub step_size: f64,
    /// Number of engine runs executed concurrently.
    pub threads: usize,
}
impl Default for LearnConf {
    fn default() -> Self {
        LearnConf {
            normalize_obj: false,
            penalty: consts::default::penalty,
            max_clauses: consts::default::max_clauses,
            strategy: consts::default::strategy,
            step_size: consts::default::step_size,
            threads: consts::default::threads,
        }
    }
}
impl LearnConf {
    /// Adds clap options to a clap `App`.
    pub fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.arg(
            Arg::new("normalize_obj")
                .long("normalize_obj")
                .help(
                    "(de)activates min-max normalization of the log-likelihood \
                     and the circuit size in the objective",
                )
                .validator(bool_validator)
                .value_name(bool_format)
                .default_value("no")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("penalty")
                .long("penalty")
                .short('p')
                .help("sets the weight of the circuit size in the objective")
                .validator(float_validator)
                .value_name("float")
                .default_value("0.01")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("max_clauses")
                .long("max_clauses")
                .short('m')
                .help("sets the maximum number of clauses added to the theory")
                .validator(int_validator)
                .value_name("int")
                .default_value("15")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("strategy")
                .long("strategy")
                .help("sets the search strategy")
                .validator(int_validator)
                .value_name("int")
                .default_value("0")
                .takes_value(true)
                .number_of_values(1)
                .hide(true)
                .display_order(order()),
        )
        .arg(
            Arg::new("step_size")
                .long("step_size")
                .help("sets the step size")
                .validator(float_validator)
                .value_name("float")
                .default_value("0.99")
                .takes_value(true)
                .number_of_values(1)
                .hide(true)
                .display_order(order()),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('j')
                .help("sets the number of engine runs executed concurrently")
                .validator(|s| bounded_int_validator(s, 1, usize::MAX))
                .value_name("int")
                .default_value("2")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
    }

    /// Creates itself from some matches.
    pub fn new(matches: &Matches) -> Self {
        LearnConf {
            normalize_obj: bool_of_matches(matches, "normalize_obj"),
            penalty: float_of_matches(matches, "penalty"),
            max_clauses: int_of_matches(matches, "max_clauses"),
            strategy: int_of_matches(matches, "strategy"),
            step_size: float_of_matches(matches, "step_size"),
            threads: int_of_matches(matches, "threads"),
        }
    }
}

/// Global configuration.
pub struct Config {
    /// Header file: typing declarations.
    pub header: PathBuf,
    /// Formula file: candidate clauses.
    pub formulas: PathBuf,
    /// Training databases.
    pub dbs: Vec<PathBuf>,
    /// Verbosity.
    pub verb: usize,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Styles, for coloring.
    styles: Styles,

    /// Engine configuration.
    pub engine: EngineConf,
    /// Search configuration.
    pub learn: LearnConf,
}
impl ColorExt for Config {
    fn styles(&self) -> &Styles {
        &self.styles
    }
}
impl Config {
    /// Log level corresponding to the verbosity.
    pub fn log_filter(&self) -> log::LevelFilter {
        use log::LevelFilter::*;
        match self.verb {
            0 => Warn,
            1 => Info,
            2 => Debug,
            _ => Trace,
        }
    }

    /// Parses command-line arguments and generates the configuration.
    pub fn clap() -> Self {
        let mut app = App::new(crate_name!());
        app = Self::add_args(app, 0);
        app = EngineConf::add_args(app, 100);
        app = LearnConf::add_args(app, 200);

        let matches = app.get_matches();

        let header = PathBuf::from(
            matches
                .value_of("header")
                .expect("unreachable(header): argument is required"),
        );
        let formulas = PathBuf::from(
            matches
                .value_of("formulas")
                .expect("unreachable(formulas): argument is required"),
        );
        let dbs = matches
            .values_of("db")
            .map(|vals| vals.map(PathBuf::from).collect())
            .unwrap_or_else(Vec::new);

        // Verbosity, info by default.
        let mut verb = 1;
        for _ in 0..matches.occurrences_of("verb") {
            verb += 1
        }
        for _ in 0..matches.occurrences_of("quiet") {
            if verb > 0 {
                verb -= 1
            }
        }

        // Colors.
        let color = atty::is(atty::Stream::Stdout) && bool_of_matches(&matches, "color");
        let styles = Styles::new(color);

        let out_dir = PathBuf::from(
            matches
                .value_of("out_dir")
                .expect("unreachable(out_dir): default is provided"),
        );

        let engine = EngineConf::new(&matches);
        let learn = LearnConf::new(&matches);

        Config {
            header,
            formulas,
            dbs,
            verb,
            out_dir,
            styles,
            engine,
            learn,
        }
    }

    /// Adds clap options to a clap App.
    pub fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.version(*crate::common::version)
            .about("Greedy structure learning for weighted first-order theories.")
            .arg(
                Arg::new("header")
                    .help("sets the header file (typing declarations)")
                    .required(true)
                    .index(1)
                    .display_order(order()),
            )
            .arg(
                Arg::new("formulas")
                    .help("sets the candidate formula file (one clause per line)")
                    .required(true)
                    .index(2)
                    .display_order(order()),
            )
            .arg(
                Arg::new("db")
                    .long("db")
                    .short('d')
                    .help("adds a training database (repeatable, order matters)")
                    .value_name("FILE")
                    .required(true)
                    .takes_value(true)
                    .number_of_values(1)
                    .multiple_occurrences(true)
                    .display_order(order()),
            )
            .arg(
                Arg::new("verb")
                    .short('v')
                    .help("increases verbosity")
                    .takes_value(false)
                    .multiple_occurrences(true)
                    .display_order(order()),
            )
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .help("decreases verbosity")
                    .takes_value(false)
                    .multiple_occurrences(true)
                    .display_order(order()),
            )
            .arg(
                Arg::new("color")
                    .long("color")
                    .short('c')
                    .help("(de)activates coloring (off if output is not a tty)")
                    .validator(bool_validator)
                    .value_name(bool_format)
                    .default_value("on")
                    .takes_value(true)
                    .number_of_values(1)
                    .display_order(order()),
            )
            .arg(
                Arg::new("out_dir")
                    .long("out_dir")
                    .short('o')
                    .help("sets the output directory, must exist")
                    .validator(dir_exists)
                    .value_name("DIR")
                    .default_value(".")
                    .takes_value(true)
                    .number_of_values(1)
                    .display_order(order()),
            )
    }
}

/// Contains some styles for coloring.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Emphasis style.
    emph: Style,
    /// Happy style.
    hap: Style,
    /// Sad style.
    sad: Style,
    /// Bad style.
    bad: Style,
}
impl Default for Styles {
    fn default() -> Self {
        Styles::new(true)
    }
}
impl ColorExt for Styles {
    fn styles(&self) -> &Styles {
        self
    }
}
impl Styles {
    /// Creates some styles.
    pub fn new(colored: bool) -> Self {
        Styles {
            emph: if colored {
                Style::new().bold()
            } else {
                Style::new()
            },
            hap: if colored {
                Colour::Green.normal().bold()
            } else {
                Style::new()
            },
            sad: if colored {
                Colour::Yellow.normal().bold()
            } else {
                Style::new()
            },
            bad: if colored {
                Colour::Red.normal().bold()
            } else {
                Style::new()
            },
        }
    }
}

/// Can color things.
pub trait ColorExt {
    /// The styles in the colorizer: emph, happy, sad, and bad.
    fn styles(&self) -> &Styles;
    /// String emphasis.
    #[inline]
    fn emph<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().emph.paint(s.as_ref()))
    }
    /// Happy string.
    #[inline]
    fn happy<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().hap.paint(s.as_ref()))
    }
    /// Sad string.
    #[inline]
    fn sad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().sad.paint(s.as_ref()))
    }
    /// Bad string.
    #[inline]
    fn bad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().bad.paint(s.as_ref()))
    }
}

/// Format for booleans.
pub static bool_format: &str = "on/true|no/off/false";

/// Boolean of a string.
pub fn bool_of_str(s: &str) -> Option<bool> {
    match s {
        "on" | "true" | "yes" => Some(true),
        "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

/// Boolean of some matches.
///
/// Assumes a default is provided and the input has been validated with
/// `bool_validator`.
pub fn bool_of_matches(matches: &Matches, key: &str) -> bool {
    matches
        .value_of(key)
        .and_then(bool_of_str)
        .expect("failed to retrieve boolean argument")
}

/// Integer of some matches.
///
/// Assumes a default is provided and the input has been validated with
/// `int_validator`.
pub fn int_of_matches(matches: &Matches, key: &str) -> usize {
    matches
        .value_of(key)
        .and_then(|s| s.parse::<usize>().ok())
        .expect("failed to retrieve integer argument")
}

/// Float of some matches.
///
/// Assumes a default is provided and the input has been validated with
/// `float_validator`.
pub fn float_of_matches(matches: &Matches, key: &str) -> f64 {
    matches
        .value_of(key)
        .and_then(|s| s.parse::<f64>().ok())
        .expect("failed to retrieve float argument")
}

/// Validates integer input.
pub fn int_validator(s: &str) -> Result<(), String> {
    match s.parse::<usize>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("expected an integer, got `{}`", s)),
    }
}

/// Validates integer input between some bounds.
pub fn bounded_int_validator(s: &str, lo: usize, hi: usize) -> Result<(), String> {
    match s.parse::<usize>() {
        Ok(val) => {
            if lo <= val && val <= hi {
                Ok(())
            } else {
                Err(format!(
                    "expected a value between {} and {}, got `{}`",
                    lo, hi, val
                ))
            }
        }
        Err(_) => Err(format!("expected an integer, got `{}`", s)),
    }
}

/// Validates float input.
pub fn float_validator(s: &str) -> Result<(), String> {
    match s.parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(()),
        _ => Err(format!("expected a finite float, got `{}`", s)),
    }
}

/// Validates boolean input.
pub fn bool_validator(s: &str) -> Result<(), String> {
    if bool_of_str(s).is_some() {
        Ok(())
    } else {
        Err(format!("expected `on/true` or `off/false`, got `{}`", s))
    }
}

/// Checks whether a directory exists.
pub fn dir_exists(path: &str) -> Result<(), String> {
    if Path::new(path).is_dir() {
        Ok(())
    } else {
        Err(format!("`{}` is not a directory", path))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn engine_command_splitting() {
        let conf = EngineConf::of_cmd("  java   -jar  /opt/forclift.jar ");
        assert_eq! { conf.cmd, "java" }
        assert_eq! { conf.args, vec!["-jar", "/opt/forclift.jar"] }
        assert_eq! { conf.cmd_string(), "java -jar /opt/forclift.jar" }

        let conf = EngineConf::of_cmd("");
        assert_eq! { conf.cmd, "" }
        assert!(conf.args.is_empty())
    }

    #[test]
    fn uncolored_styles_leave_text_alone() {
        let styles = Styles::new(false);
        assert_eq! { styles.happy("done"), "done" }
        assert_eq! { styles.bad("error"), "error" }
        let styles = Styles::new(true);
        assert_ne! { styles.happy("done"), "done" }
        assert!(styles.happy("done").contains("done"))
    }

    #[test]
    fn validators() {
        assert_eq! { bool_of_str("on"), Some(true) }
        assert_eq! { bool_of_str("off"), Some(false) }
        assert_eq! { bool_of_str("maybe"), None }
        assert!(int_validator("42").is_ok());
        assert!(int_validator("-1").is_err());
        assert!(float_validator("0.5").is_ok());
        assert!(float_validator("inf").is_err());
        assert!(bounded_int_validator("0", 1, 4).is_err());
        assert!(bounded_int_validator("3", 1, 4).is_ok());
    }
}
