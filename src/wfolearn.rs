//! Greedy structure learning for weighted first-order theories.
//!
//! Given a typing header, a file of candidate clauses and some relational
//! databases, [`StructureLearner`][learner] grows a theory one clause at a
//! time. Candidate theories are scored by an external weighted inference
//! engine, which reports a log-likelihood and the size of the circuits it
//! compiles. The objective trades the former against the latter.
//!
//! [learner]: learner/struct.StructureLearner.html (StructureLearner struct)

#![allow(non_upper_case_globals)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

pub mod errors;
#[macro_use]
pub mod common;
pub mod files;
pub mod learner;
pub mod task;
pub mod theory;

#[cfg(all(test, not(windows)))]
mod tests;

use crate::common::*;
use crate::learner::{LearnRes, StructureLearner};

/// Reads a file to a string.
fn read_file(path: &Path, desc: &str) -> Res<String> {
    let mut content = String::new();
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_string(&mut content))
        .chain_err(|| format!("while reading {} file `{}`", desc, path.to_string_lossy()))?;
    Ok(content)
}

/// Runs a search as described by a configuration.
pub fn work(conf: &Config) -> Res<LearnRes> {
    let header = read_file(&conf.header, "header")?;
    let formulas = read_file(&conf.formulas, "formula")?;

    log_info! {
        "learning from {} database(s), output in `{}`",
        conf.dbs.len(), conf.emph(conf.out_dir.to_string_lossy())
    }

    let mut learner = StructureLearner::new(
        &conf.dbs,
        header,
        formulas,
        conf.engine.clone(),
        conf.learn.clone(),
        &conf.out_dir,
    )?;
    learner.run()
}
