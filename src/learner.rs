//! Greedy structure search.
//!
//! Starting from a model with no clauses, each iteration extends the current
//! model with each remaining candidate clause, scores the extensions by
//! leave-one-out over the databases, and ranks them. The best extension is
//! scored on all the databases and accepted if its log-likelihood is strictly
//! better than the current one. Otherwise the search stops.

use std::slice;

use crate::{
    common::*,
    files::FileBuilder,
    task::{ScoreTask, TaskExecutor},
    theory::{parse, rank, Bounds, Clause, Model},
};

/// Reason the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No extension improved the log-likelihood.
    Converged,
    /// No candidate left, or the clause cap was reached.
    Exhausted,
    /// No extension was scored on all the folds.
    NoCompleteModel,
    /// The initial model could not be scored on all the databases.
    BaseUnscored,
}
impl Status {
    /// Short description.
    pub fn desc(self) -> &'static str {
        match self {
            Status::Converged => "converged",
            Status::Exhausted => "no candidate left or clause cap reached",
            Status::NoCompleteModel => "no model scored on all folds",
            Status::BaseUnscored => "initial model could not be scored",
        }
    }
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct LearnRes {
    /// Last accepted model.
    pub model: Model,
    /// Number of iterations started.
    pub iterations: usize,
    /// Why the search stopped.
    pub status: Status,
    /// Candidates not in the model.
    pub pool: Vec<Clause>,
    /// Number of engine runs that failed or produced unusable output.
    pub failed_tasks: usize,
    /// Number of engine runs killed on timeout, included in `failed_tasks`.
    pub timeouts: usize,
    /// Total runtime.
    pub runtime: Duration,
}

/// Search driver.
pub struct StructureLearner {
    /// Databases, absolute paths.
    dbs: Vec<PathBuf>,
    /// Header: typing declarations.
    header: String,
    /// Candidate clauses.
    formulas: String,
    /// Search configuration.
    conf: LearnConf,
    /// Runs the engine.
    executor: TaskExecutor,
    /// User-visible messages.
    reporter: Reporter,
}
impl StructureLearner {
    /// Constructor.
    ///
    /// Fails if there are no databases or if the output directory does not
    /// exist.
    pub fn new<P: AsRef<Path>>(
        dbs: &[PathBuf],
        header: String,
        formulas: String,
        engine: EngineConf,
        conf: LearnConf,
        out_dir: P,
    ) -> Res<Self> {
        if dbs.is_empty() {
            bail!("cannot learn without databases")
        }
        let dbs = dbs.iter().map(absolute).collect::<Res<Vec<_>>>()?;
        let files = FileBuilder::new(out_dir)?;
        let reporter = Reporter::new(files.out_dir());
        let executor = TaskExecutor::new(conf.threads, engine, files)?;
        Ok(StructureLearner {
            dbs,
            header,
            formulas,
            conf,
            executor,
            reporter,
        })
    }

    /// Replaces the message sink.
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Number of databases, and of folds.
    fn folds(&self) -> usize {
        self.dbs.len()
    }

    /// Reports the settings of the search.
    fn report_settings(&self) {
        let engine = self.executor.engine();
        let files = self.executor.files();
        let report = |msg: String| self.reporter.report(msg);
        report(format!("Search strategy: {}", self.conf.strategy));
        report(format!("Normalize likelihood: {}", engine.normalize_ll));
        report(format!(
            "Normalize objective function: {}",
            self.conf.normalize_obj
        ));
        report(format!("Complexity penalty: {}", self.conf.penalty));
        report(format!(
            "Maximum number of clauses: {}",
            self.conf.max_clauses
        ));
        report(format!("Step size: {}", self.conf.step_size));
        report(format!("Timeout: {}", engine.timeout.as_secs()));
        report(format!("Number of threads: {}", self.conf.threads));
        report(format!(
            "Output directory: {}",
            files.out_dir().to_string_lossy()
        ));
    }

    /// Scores a model on all the databases.
    fn score_final(&mut self, model: &mut Model) {
        let task = ScoreTask::new(0, model, self.dbs.clone());
        self.executor
            .execute(slice::from_mut(model), vec![task], true);
    }

    /// Scores some models by leave-one-out over the databases.
    fn score_folds(&mut self, models: &mut [Model]) {
        let mut tasks = Vec::with_capacity(models.len() * self.folds());
        for (idx, model) in models.iter().enumerate() {
            for held_out in 0..self.folds() {
                let mut dbs = self.dbs.clone();
                dbs.remove(held_out);
                tasks.push(ScoreTask::new(idx, model, dbs))
            }
        }
        self.executor.execute(models, tasks, false);
    }

    /// Runs the search.
    ///
    /// Only fails if the candidate clauses cannot be parsed. Failed engine
    /// runs are dropped, see [`LearnRes`](struct.LearnRes.html).
    pub fn run(&mut self) -> Res<LearnRes> {
        self.report_settings();
        let start = Instant::now();

        let mut pool: Vec<Clause> = parse::clauses_of_theory(&self.formulas)
            .chain_err(|| "while parsing candidate clauses")?;
        let mut model = Model::of_header(&self.header);
        log_info! {
            "{} candidate clause(s), {} database(s)", pool.len(), self.folds()
        }

        self.score_final(&mut model);
        let base_scored = model.final_score().is_some();
        if !base_scored {
            warn!("failed to score the initial model, any scored extension will be accepted")
        }

        let max_clauses = pool.len().min(self.conf.max_clauses);
        let mut accepted = 0;
        let mut iteration = 0;

        let status = loop {
            if pool.is_empty() || accepted >= max_clauses {
                break Status::Exhausted;
            }
            log_info! { "iteration {}, {} candidate(s)", iteration, pool.len() }

            let mut children: Vec<Model> =
                pool.iter().map(|clause| model.child(clause.clone())).collect();
            self.score_folds(&mut children);

            let bounds = Bounds::of_models(&children);
            let mut ranked = rank(children, self.folds(), &self.conf, &bounds);
            iteration += 1;

            if ranked.is_empty() {
                log_info! { "no model scored on all folds" }
                break Status::NoCompleteModel;
            }

            let suffix = format!("iteration{}", iteration - 1);
            let path = self
                .executor
                .files()
                .store_ranking(&ranked, &suffix, &self.conf, &bounds);
            self.reporter.report(format!(
                "Iteration {} ranking: {}",
                iteration - 1,
                path.to_string_lossy()
            ));

            let mut best = ranked.swap_remove(0);
            self.score_final(&mut best);

            if best.final_ll() > model.final_ll() {
                log_info! {
                    "accepting model {}, log-likelihood {} > {}",
                    best.hash_code(), best.final_ll(), model.final_ll()
                }
                if let Some(clause) = best.last_clause() {
                    pool.retain(|candidate| candidate != clause)
                }
                model = best;
                accepted += 1;

                let path = self
                    .executor
                    .files()
                    .store_model(&model, &self.dbs, &suffix);
                self.reporter.report(format!(
                    "Iteration {} model: {}",
                    iteration - 1,
                    path.to_string_lossy()
                ))
            } else {
                log_info! {
                    "rejecting model {}, log-likelihood {} <= {}",
                    best.hash_code(), best.final_ll(), model.final_ll()
                }
                break Status::Converged;
            }
        };

        let status = if base_scored {
            status
        } else {
            Status::BaseUnscored
        };

        let learned = match model.final_score() {
            Some(score) => score.learned_model_string(),
            None => model.to_theory_string(),
        };
        self.reporter.report("----------");
        self.reporter.report(learned.trim_end());
        self.reporter.report("----------");
        self.reporter
            .report(format!("Final model hashcode: {}", model.hash_code()));
        let path = self
            .executor
            .files()
            .store_model(&model, &self.dbs, "final");
        self.reporter
            .report(format!("Final model: {}", path.to_string_lossy()));

        let runtime = start.elapsed();
        self.reporter
            .report(format!("Total runtime: {} ms", runtime.as_millis()));
        log_info! { "search stopped: {}", status.desc() }

        Ok(LearnRes {
            model,
            iterations: iteration,
            status,
            pool,
            failed_tasks: self.executor.failed(),
            timeouts: self.executor.timeouts(),
            runtime,
        })
    }
}
