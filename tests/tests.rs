//! Searches driven against an engine stub, see `rsc/engine_stub.sh`.
#![cfg(not(windows))]
#![allow(non_upper_case_globals)]

use std::fs;

use tempfile::TempDir;

use wfolearn::{
    common::*,
    learner::{LearnRes, Status, StructureLearner},
    theory::parse,
};

static header: &str = "person = {alice, bob}\nsmokes(person)\nfriends(person,person)\n";

macro_rules! run {
    ($f:expr) => {
        match $f {
            Ok(res) => res,
            Err(e) => {
                println!("Error:");
                for e in e.iter() {
                    let mut pref = "> ";
                    for line in format!("{}", e).lines() {
                        println!("{}{}", pref, line);
                        pref = "  "
                    }
                }
                panic!("failure")
            }
        }
    };
}

/// Engine configuration running the stub in some mode.
fn stub(mode: &str, timeout: u64) -> EngineConf {
    let mut script = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    script.push("tests");
    script.push("rsc");
    script.push("engine_stub.sh");
    EngineConf {
        cmd: "sh".into(),
        args: vec![script.to_string_lossy().into_owned(), mode.into()],
        normalize_ll: false,
        timeout: Duration::from_secs(timeout),
    }
}

/// Creates `count` databases in a directory.
fn databases(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|idx| {
            let mut path = dir.to_path_buf();
            path.push(format!("db{}.db", idx));
            fs::write(&path, "smokes(alice)\n").expect("while writing database");
            path
        })
        .collect()
}

/// Runs a search in a fresh output directory.
fn learn(mode: &str, timeout: u64, dbs: usize, formulas: &str) -> (TempDir, LearnRes) {
    learn_with(mode, timeout, dbs, formulas, LearnConf::default())
}

/// Runs a search in a fresh output directory, with some search configuration.
fn learn_with(
    mode: &str,
    timeout: u64,
    dbs: usize,
    formulas: &str,
    conf: LearnConf,
) -> (TempDir, LearnRes) {
    let dir = TempDir::new().expect("while creating temporary directory");
    let dbs = databases(dir.path(), dbs);
    let learner = StructureLearner::new(
        &dbs,
        header.into(),
        formulas.into(),
        stub(mode, timeout),
        conf,
        dir.path(),
    );
    let mut learner = run!(learner).with_reporter(Reporter::silent(dir.path()));
    let res = run!(learner.run());
    (dir, res)
}

fn read(dir: &TempDir, name: &str) -> String {
    let mut path = dir.path().to_path_buf();
    path.push(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("while reading `{}`: {}", path.to_string_lossy(), e))
}

#[test]
fn improving_clause_is_accepted() {
    let (dir, res) = learn("accept", 60, 2, "smokes(X) v !friends(X,Y)\n");

    assert_eq! { res.status, Status::Exhausted }
    assert_eq! { res.iterations, 1 }
    assert_eq! { res.failed_tasks, 0 }
    assert!(res.pool.is_empty());
    assert_eq! { res.model.clauses().len(), 1 }
    assert_eq! { res.model.final_ll(), -18. }
    assert_eq! { res.model.scores().len(), 2 }

    let expected = parse::clause_of_str("!friends(A,B) v smokes(A)", 1).unwrap();
    assert!(res.model.clauses().contains(&expected));

    let ranking = read(&dir, "ranking-iteration0.txt");
    let lines: Vec<&str> = ranking.lines().collect();
    assert_eq! { lines.len(), 1 }
    let fields: Vec<&str> = lines[0].split('\t').collect();
    assert_eq! { fields.len(), 4 }
    assert_eq! { fields[0], "0" }
    assert_eq! { fields[1], "-10.05000" }
    assert_eq! { fields[2], "[!friends(v0,v1) v smokes(v0)]" }
    assert_eq! { fields[3], res.model.hash_code().to_string() }

    assert!(read(&dir, "model-iteration0.mln").contains("!friends(v0,v1) v smokes(v0)"));
    assert!(read(&dir, "model-final.mln").contains("!friends(v0,v1) v smokes(v0)"));

    let output = read(&dir, consts::message_file);
    assert!(output.contains("Final model hashcode:"));
    assert!(output.contains("Total runtime:"));
}

#[test]
fn timeouts_stop_the_search() {
    let start = Instant::now();
    let (_dir, res) = learn("timeout", 1, 2, "smokes(X)\n!friends(X,Y) v smokes(Y)\n");

    assert!(start.elapsed() < Duration::from_secs(20));
    assert_eq! { res.status, Status::NoCompleteModel }
    assert_eq! { res.iterations, 1 }
    assert_eq! { res.failed_tasks, 4 }
    assert_eq! { res.timeouts, 4 }
    assert_eq! { res.pool.len(), 2 }
    assert!(res.model.clauses().is_empty());
    assert_eq! { res.model.final_ll(), -20. }
}

#[test]
fn greedy_search_stops_without_improvement() {
    let (dir, res) = learn("greedy", 60, 2, "bad(X)\ngood(X)\n");

    assert_eq! { res.status, Status::Converged }
    assert_eq! { res.iterations, 2 }
    assert_eq! { res.failed_tasks, 0 }
    assert_eq! { res.model.final_ll(), -25. }
    let clauses: Vec<String> = res.model.clauses().iter().map(|c| c.to_string()).collect();
    assert_eq! { clauses, vec!["good(v0)"] }

    // First iteration ranks `good` first, in spite of `bad` coming first.
    let ranking = read(&dir, "ranking-iteration0.txt");
    let ranked: Vec<&str> = ranking
        .lines()
        .map(|line| line.split('\t').nth(2).unwrap())
        .collect();
    assert_eq! { ranked, vec!["[good(v0)]", "[bad(v0)]"] }

    // Second iteration was ranked but not accepted.
    let ranking = read(&dir, "ranking-iteration1.txt");
    assert_eq! { ranking.lines().count(), 1 }
    let mut path = dir.path().to_path_buf();
    path.push("model-iteration1.mln");
    assert!(!path.exists());
}

#[test]
fn broken_engine_is_reported() {
    let (_dir, res) = learn("broken", 60, 2, "smokes(X)\n");

    assert_eq! { res.status, Status::BaseUnscored }
    assert_eq! { res.iterations, 1 }
    assert_eq! { res.failed_tasks, 3 }
    assert_eq! { res.timeouts, 0 }
    assert!(res.model.clauses().is_empty());
}

#[test]
fn clause_cap_stops_the_search() {
    let conf = LearnConf {
        max_clauses: 1,
        ..LearnConf::default()
    };
    let (dir, res) = learn_with("accept", 60, 2, "smokes(X)
!friends(X,Y)
", conf);

    // Both extensions improve, only the first one fits.
    assert_eq! { res.status, Status::Exhausted }
    assert_eq! { res.iterations, 1 }
    assert_eq! { res.failed_tasks, 0 }
    let clauses: Vec<String> = res.model.clauses().iter().map(|c| c.to_string()).collect();
    assert_eq! { clauses, vec!["smokes(v0)"] }
    let pool: Vec<String> = res.pool.iter().map(|c| c.to_string()).collect();
    assert_eq! { pool, vec!["!friends(v0,v1)"] }

    let ranking = read(&dir, "ranking-iteration0.txt");
    assert_eq! { ranking.lines().count(), 2 }
    let mut path = dir.path().to_path_buf();
    path.push("ranking-iteration1.txt");
    assert!(!path.exists());
}

#[test]
fn clause_cap_above_pool_size_is_harmless() {
    let conf = LearnConf {
        max_clauses: 5,
        ..LearnConf::default()
    };
    let (_dir, res) = learn_with("accept", 60, 2, "smokes(X)
", conf);

    assert_eq! { res.status, Status::Exhausted }
    assert_eq! { res.iterations, 1 }
    assert_eq! { res.model.clauses().len(), 1 }
    assert!(res.pool.is_empty());
}

#[test]
fn malformed_candidates_fail() {
    let dir = TempDir::new().expect("while creating temporary directory");
    let dbs = databases(dir.path(), 1);
    let learner = StructureLearner::new(
        &dbs,
        header.into(),
        "smokes(X)\nsmokes X\n".into(),
        stub("accept", 60),
        LearnConf::default(),
        dir.path(),
    );
    let mut learner = run!(learner).with_reporter(Reporter::silent(dir.path()));
    match learner.run() {
        Ok(res) => panic!("expected parse error, got {:?}", res.status),
        Err(e) => assert!(e.iter().any(|e| e.to_string().contains("line 2"))),
    }
}

#[test]
fn missing_output_directory_fails() {
    let dir = TempDir::new().expect("while creating temporary directory");
    let dbs = databases(dir.path(), 1);
    let mut out_dir = dir.path().to_path_buf();
    out_dir.push("nowhere");
    let learner = StructureLearner::new(
        &dbs,
        header.into(),
        "smokes(X)\n".into(),
        stub("accept", 60),
        LearnConf::default(),
        &out_dir,
    );
    assert!(learner.is_err())
}
