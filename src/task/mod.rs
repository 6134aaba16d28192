//! Engine runs.
//!
//! A [`ScoreTask`][task] writes a model to a theory file, launches the
//! inference engine on it and some databases, and parses the engine's output
//! into a [`Score`][score]. The engine's standard output and error go to the
//! `.log` and `.err` artifacts of the run. A [`TaskMonitor`][monitor] kills
//! the engine when it runs out of time.
//!
//! [task]: struct.ScoreTask.html (ScoreTask struct)
//! [score]: score/struct.Score.html (Score struct)
//! [monitor]: struct.TaskMonitor.html (TaskMonitor struct)

use std::{
    fs::File,
    io::BufReader,
    process::{Child, Command, Stdio},
};

use wait_timeout::ChildExt;

use crate::{
    common::{consts::engine, *},
    files::FileBuilder,
    theory::Model,
};

pub mod executor;
pub mod score;

pub use self::executor::TaskExecutor;
pub use self::score::Score;

/// Engine sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Learns the weights of a theory and reports its log-likelihood.
    Score,
}
impl TaskKind {
    /// Engine sub-command.
    pub fn command(self) -> &'static str {
        match self {
            TaskKind::Score => "score",
        }
    }
}

/// Scores a model on some databases.
#[derive(Debug, Clone)]
pub struct ScoreTask {
    /// Index of the model in its batch.
    model: usize,
    /// Hash of the model.
    model_hash: u64,
    /// Theory of the model.
    theory: String,
    /// Databases.
    dbs: Vec<PathBuf>,
}
impl ScoreTask {
    /// Constructor, `model` is the index of the model in its batch.
    pub fn new(model: usize, model_ref: &Model, dbs: Vec<PathBuf>) -> Self {
        ScoreTask {
            model,
            model_hash: model_ref.hash_code(),
            theory: model_ref.to_theory_string(),
            dbs,
        }
    }

    /// Index of the model in its batch.
    pub fn model(&self) -> usize {
        self.model
    }
    /// Hash of the model.
    pub fn model_hash(&self) -> u64 {
        self.model_hash
    }
    /// Databases.
    pub fn dbs(&self) -> &[PathBuf] {
        &self.dbs
    }
    /// Hash of the databases.
    pub fn dbs_hash(&self) -> u64 {
        paths_hash(&self.dbs)
    }
    /// Kind of the task.
    pub fn kind(&self) -> TaskKind {
        TaskKind::Score
    }

    /// Arguments passed to the engine program.
    pub fn command(&self, conf: &EngineConf, theory: &Path) -> Vec<String> {
        let mut args = conf.args.clone();
        args.push(self.kind().command().into());
        args.push(engine::verbose.into());
        if conf.normalize_ll {
            args.push(engine::normalize_ll.into())
        }
        for db in &self.dbs {
            args.push(engine::train.into());
            args.push(db.to_string_lossy().into_owned())
        }
        args.push(theory.to_string_lossy().into_owned());
        args
    }

    /// Runs the engine and parses its output.
    ///
    /// Fails if the output has no log-likelihood.
    pub fn run(&self, conf: &EngineConf, files: &FileBuilder) -> Res<Score> {
        let (model, dbs) = (self.model_hash, self.dbs_hash());
        let theory = files.write_theory(model, dbs, &self.theory)?;
        let log = files.log_file(model, dbs);
        let err = files.err_file(model, dbs);

        let stdout = File::create(&log)
            .chain_err(|| format!("while creating `{}`", log.to_string_lossy()))?;
        let stderr = File::create(&err)
            .chain_err(|| format!("while creating `{}`", err.to_string_lossy()))?;

        let args = self.command(conf, &theory);
        log_debug! { "running {} {}", conf.cmd, args.join(" ") }

        let child = Command::new(&conf.cmd)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .chain_err(|| ErrorKind::EngineSpawn(conf.cmd_string()))?;

        TaskMonitor::new(child, conf.timeout).wait()?;

        let log_file = File::open(&log)
            .chain_err(|| format!("while opening `{}`", log.to_string_lossy()))?;
        let score = Score::of_output(self.model, BufReader::new(log_file))?;
        if !score.is_compilable() {
            bail!(ErrorKind::EngineOutput(format!(
                "no log-likelihood in `{}`",
                log.to_string_lossy()
            )))
        }
        Ok(score)
    }
}

/// Waits for an engine process, killing it when it runs out of time.
pub struct TaskMonitor {
    /// Engine process.
    child: Child,
    /// Time budget.
    timeout: Duration,
}
impl TaskMonitor {
    /// Constructor, the budget starts when the monitor is created.
    pub fn new(child: Child, timeout: Duration) -> Self {
        TaskMonitor { child, timeout }
    }

    /// Waits for the process to exit.
    ///
    /// Kills the process and fails with a [timeout][timeout] if it does not
    /// exit before the end of the budget. The exit status is not checked,
    /// the output decides whether the run succeeded.
    ///
    /// [timeout]: ../errors/enum.ErrorKind.html#variant.Timeout
    /// (ErrorKind's Timeout variant)
    pub fn wait(mut self) -> Res<()> {
        match self.child.wait_timeout(self.timeout)? {
            Some(status) => {
                if !status.success() {
                    log_debug! { "engine exited with {}", status }
                }
                Ok(())
            }
            None => {
                if let Err(e) = self.child.kill() {
                    warn!("failed to kill engine process {}: {}", self.child.id(), e)
                }
                if let Err(e) = self.child.wait() {
                    log_debug! { "failed to reap engine process {}: {}", self.child.id(), e }
                }
                bail!(ErrorKind::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
