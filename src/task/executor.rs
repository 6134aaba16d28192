//! Concurrent execution of score tasks.

use rayon::prelude::*;

use crate::{
    common::*,
    files::FileBuilder,
    task::{Score, ScoreTask},
    theory::Model,
};

/// Runs batches of score tasks on a bounded thread pool.
///
/// [`execute`](#method.execute) blocks until every task of the batch is
/// done. Failed runs are logged, counted and dropped. Runs killed on timeout
/// are also counted on their own.
pub struct TaskExecutor {
    /// Worker pool.
    pool: rayon::ThreadPool,
    /// Engine configuration.
    engine: EngineConf,
    /// Artifacts.
    files: FileBuilder,
    /// Number of failed runs so far.
    failed: usize,
    /// Number of runs killed on timeout so far.
    timeouts: usize,
}
impl TaskExecutor {
    /// Constructor, `threads` is the maximum number of concurrent runs.
    pub fn new(threads: usize, engine: EngineConf, files: FileBuilder) -> Res<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|idx| format!("scorer-{}", idx))
            .build()
            .map_err(|e| Error::from(format!("while building worker pool: {}", e)))?;
        Ok(TaskExecutor {
            pool,
            engine,
            files,
            failed: 0,
            timeouts: 0,
        })
    }

    /// Number of failed runs so far.
    pub fn failed(&self) -> usize {
        self.failed
    }
    /// Number of runs killed on timeout so far.
    pub fn timeouts(&self) -> usize {
        self.timeouts
    }
    /// Engine configuration.
    pub fn engine(&self) -> &EngineConf {
        &self.engine
    }
    /// Artifacts.
    pub fn files(&self) -> &FileBuilder {
        &self.files
    }

    /// Runs a batch of tasks and folds the usable scores onto the models.
    ///
    /// Task indices refer to `models`. Scores become final scores if `is_final`,
    /// fold scores otherwise. Tasks for a model and database subset already
    /// in the batch are skipped, as they would write the same artifacts.
    ///
    /// Returns the number of runs that failed or produced an unusable score.
    pub fn execute(&mut self, models: &mut [Model], tasks: Vec<ScoreTask>, is_final: bool) -> usize {
        let mut known = HashSet::new();
        let tasks: Vec<ScoreTask> = tasks
            .into_iter()
            .filter(|task| {
                let fresh = known.insert((task.model_hash(), task.dbs_hash()));
                if !fresh {
                    log_debug! {
                        "skipping duplicate task for model {}", task.model_hash()
                    }
                }
                fresh
            })
            .collect();

        log_debug! { "running {} task(s)", tasks.len() }

        let (engine, files) = (&self.engine, &self.files);
        let results: Vec<(u64, Res<Score>)> = self.pool.install(|| {
            tasks
                .par_iter()
                .map(|task| (task.model_hash(), task.run(engine, files)))
                .collect()
        });

        let mut failed = 0;
        for (hash, res) in results {
            match res {
                Ok(score) => match models.get_mut(score.model()) {
                    Some(model) => {
                        if is_final {
                            model.add_final_score(score)
                        } else {
                            model.add_score(score)
                        }
                    }
                    None => {
                        warn!("dropping score for unknown model #{}", score.model());
                        failed += 1
                    }
                },
                Err(e) => {
                    if e.is_timeout() {
                        self.timeouts += 1
                    }
                    if e.is_task_failure() {
                        if_debug! {
                            debug!("dropping failed run for model {}:", hash);
                            for e in e.iter() {
                                debug!("  {}", e)
                            }
                        }
                    } else {
                        warn!("dropping run for model {}:", hash);
                        for e in e.iter() {
                            warn!("  {}", e)
                        }
                    }
                    failed += 1
                }
            }
        }

        if failed > 0 {
            warn!("{} of {} engine run(s) failed", failed, tasks.len())
        }
        self.failed += failed;
        failed
    }
}
