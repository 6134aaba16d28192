//! Artifacts of a run, all in the output directory.
//!
//! The artifacts of an engine run are named after the hash of the model and
//! the hash of the database subset: `structure-<model>-<dbs>.mln` for the
//! theory, `.log` and `.err` for the engine's output, and `_learned.mln` for
//! the learned model. Rankings and accepted models are stored per iteration.

use std::fs::{self, OpenOptions};

use crate::{
    common::*,
    theory::{Bounds, Model},
};

/// Prefix of the artifacts of an engine run.
const run_pref: &str = "structure";

/// Builds and writes artifacts.
#[derive(Debug, Clone)]
pub struct FileBuilder {
    /// Output directory.
    out_dir: PathBuf,
}
impl FileBuilder {
    /// Constructor, fails if the output directory does not exist.
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Res<Self> {
        let out_dir = absolute(out_dir)?;
        if !out_dir.is_dir() {
            bail!(
                "output directory `{}` does not exist",
                out_dir.to_string_lossy()
            )
        }
        Ok(FileBuilder { out_dir })
    }

    /// Output directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path to a file of the output directory.
    fn path(&self, name: String) -> PathBuf {
        let mut path = self.out_dir.clone();
        path.push(name);
        path
    }

    /// Path to an artifact of an engine run.
    fn run_file(&self, model: u64, dbs: u64, suffix: &str) -> PathBuf {
        self.path(format!("{}-{}-{}{}", run_pref, model, dbs, suffix))
    }

    /// Theory file of an engine run.
    pub fn theory_file(&self, model: u64, dbs: u64) -> PathBuf {
        self.run_file(model, dbs, ".mln")
    }
    /// Standard output of an engine run.
    pub fn log_file(&self, model: u64, dbs: u64) -> PathBuf {
        self.run_file(model, dbs, ".log")
    }
    /// Standard error of an engine run.
    pub fn err_file(&self, model: u64, dbs: u64) -> PathBuf {
        self.run_file(model, dbs, ".err")
    }
    /// Learned model of an engine run, written by the engine.
    pub fn learned_file(&self, model: u64, dbs: u64) -> PathBuf {
        self.run_file(model, dbs, "_learned.mln")
    }

    /// Stored model file.
    pub fn stored_model_file(&self, suffix: &str) -> PathBuf {
        self.path(format!("model-{}.mln", suffix))
    }
    /// Stored ranking file.
    pub fn ranking_file(&self, suffix: &str) -> PathBuf {
        self.path(format!("ranking-{}.txt", suffix))
    }

    /// Writes the theory file of an engine run.
    pub fn write_theory(&self, model: u64, dbs: u64, theory: &str) -> Res<PathBuf> {
        let path = self.theory_file(model, dbs);
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&path)
            .chain_err(|| format!("while creating `{}`", path.to_string_lossy()))?;
        file.write_all(theory.as_bytes())?;
        file.flush()?;
        Ok(path)
    }

    /// Stores a ranking, best model first.
    ///
    /// One line per model: rank, objective, clauses, and hash, separated by
    /// tabs. Errors are logged and swallowed.
    pub fn store_ranking(
        &self,
        models: &[Model],
        suffix: &str,
        conf: &LearnConf,
        bounds: &Bounds,
    ) -> PathBuf {
        let path = self.ranking_file(suffix);
        let mut content = String::new();
        for (rank, model) in models.iter().enumerate() {
            let score = model
                .score_exact(conf, bounds)
                .map(|score| rat_to_decimal(&score, 5))
                .unwrap_or_else(|| "-inf".into());
            content.push_str(&format!(
                "{}\t{}\t{}\t{}\n",
                rank,
                score,
                model.clauses_string(),
                model.hash_code()
            ))
        }
        if let Err(e) = fs::write(&path, content) {
            warn!(
                "failed to store ranking `{}`: {}",
                path.to_string_lossy(),
                e
            )
        }
        path
    }

    /// Stores a model scored on some databases.
    ///
    /// Copies the learned model written by the engine if any, otherwise
    /// writes the learned model of the final score, or the theory itself if
    /// the model has no final score. Errors are logged and swallowed.
    pub fn store_model(&self, model: &Model, dbs: &[PathBuf], suffix: &str) -> PathBuf {
        let path = self.stored_model_file(suffix);
        let learned = self.learned_file(model.hash_code(), paths_hash(dbs));
        let res = if learned.is_file() {
            fs::copy(&learned, &path).map(|_| ())
        } else if let Some(score) = model.final_score() {
            fs::write(&path, score.learned_model_string())
        } else {
            fs::write(&path, model.to_theory_string())
        };
        if let Err(e) = res {
            warn!("failed to store model `{}`: {}", path.to_string_lossy(), e)
        }
        path
    }
}
