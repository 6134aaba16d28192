//! Tests over clause canonicalization, models and ranking.

use std::cmp::Ordering;

use crate::{
    common::*,
    files::FileBuilder,
    task::{Score, ScoreTask},
    theory::{clause, parse, rank, Bounds, Clause, Model},
};

fn clause(s: &str) -> Clause {
    match parse::clause_of_str(s, 1) {
        Ok(clause) => clause,
        Err(e) => panic!("failed to parse `{}`: {}", s, e),
    }
}

/// Score with some log-likelihood and partition circuit size.
fn score(model: usize, ll: f64, size: u64) -> Score {
    let output = format!(
        "Partition function has size {}\nFinal loglikelihood: {}\n",
        size, -ll
    );
    Score::of_output(model, output.as_bytes()).unwrap()
}

/// Model with one clause and some fold scores.
fn scored(clause_str: &str, scores: &[(f64, u64)]) -> Model {
    let mut model = Model::new().child(clause(clause_str));
    for (ll, size) in scores {
        model.add_score(score(0, *ll, *size))
    }
    model
}

#[test]
fn constant_arguments_are_renamed() {
    let c = clause("p(-1) v !q(-1)");
    assert_eq! { c.len(), 2 }
    for lit in c.lits() {
        assert_eq! { lit.args(), &["v0".to_string()] }
    }
    assert_eq! { c.to_string(), "p(v0) v !q(v0)" }
}

#[test]
fn canonicalization_is_idempotent() {
    let text = "workedUnder(-1,-2) v !workedUnder(-3,-2) v !actor(-1)";
    let c_1 = clause(text);
    assert_eq! { c_1, clause(text) }
    assert_eq! { c_1, clause(&c_1.to_string()) }
    assert_eq! { c_1.hash_code(), clause(&c_1.to_string()).hash_code() }
}

#[test]
fn permuted_and_renamed_clauses_are_equal() {
    let c_1 = clause("r(A,B) v !s(B,A)");
    let c_2 = clause("!s(Y,X) v r(X,Y)");
    assert_eq! { c_1, c_2 }
    assert_eq! { c_1.hash_code(), c_2.hash_code() }

    // Not the same structure.
    let c_3 = clause("!s(X,Y) v r(X,Y)");
    assert_ne! { c_1, c_3 }
}

#[test]
fn printing_then_parsing_is_the_identity() {
    for text in &[
        "a(B) v p(A,C) v p(B,D)",
        "p(A,B) v p(B,C)",
        "!q(Z,X) v q(X,Y) v !r(Y) v r(Z)",
        "workedUnder(-1,-2) v !workedUnder(-3,-2) v !actor(-1)",
    ] {
        let c = clause(text);
        assert_eq! { c, clause(&c.to_string()) }
    }
}

#[test]
fn renamed_variants_are_equal() {
    let c_1 = clause("p(A,B) v p(B,C)");
    let c_2 = clause("p(C,B) v p(B,A)");
    assert_eq! { c_1, c_2 }
    assert_eq! { c_1.to_string(), "p(v0,v1) v p(v1,v2)" }

    let c_1 = clause("a(B) v p(A,C) v p(B,D)");
    let c_2 = clause("p(Y,W) v a(Y) v p(X,Z)");
    assert_eq! { c_1, c_2 }

    // Same candidates, one pool entry.
    let clauses = parse::clauses_of_theory("p(A,B) v p(B,C)\np(C,B) v p(B,A)\n").unwrap();
    assert_eq! { clauses.len(), 1 }
}

#[test]
fn theory_round_trip() {
    let theory = "\
smokes(X) v !friends(X,Y)
!cancer(X) v smokes(X)

friends(A,B) v !friends(B,A)
!friends(B,A) v friends(A,B)
";
    let clauses = parse::clauses_of_theory(theory).unwrap();
    // Last two lines are the same clause.
    assert_eq! { clauses.len(), 3 }

    let mut model = Model::of_header("person = {a, b}\nsmokes(person)\n");
    for clause in &clauses {
        model.add_clause(clause.clone())
    }
    let text = model.to_theory_string();
    let mut sections = text.splitn(2, "\n\n");
    assert_eq! { sections.next(), Some("person = {a, b}\nsmokes(person)") }
    let reparsed = parse::clauses_of_theory(sections.next().unwrap()).unwrap();

    let expected: HashSet<Clause> = clauses.into_iter().collect();
    let reparsed: HashSet<Clause> = reparsed.into_iter().collect();
    assert_eq! { expected, reparsed }
}

#[test]
fn clauses_by_length() {
    let theory = "p(X)\nq(X) v !p(X)\n!q(X) v p(X)\nr(X,Y) v p(X) v q(Y)\np(Y)\n";
    let per_length = parse::clauses_per_length(theory).unwrap();
    let lengths: Vec<(usize, usize)> = per_length.iter().map(|(len, cs)| (*len, cs.len())).collect();
    assert_eq! { lengths, vec![(1, 1), (2, 2), (3, 1)] }
}

#[test]
fn malformed_clause_reports_its_line() {
    let err = parse::clauses_of_theory("p(X)\n\nq(X v r(X)\n").unwrap_err();
    assert!(err.is_parse_error());
    match *err.kind() {
        ErrorKind::ParseError(line, _) => assert_eq! { line, 3 },
        ref kind => panic!("unexpected error {}", kind),
    }
}

#[test]
fn model_hash_ignores_insertion_order_and_typings() {
    let (c_1, c_2) = (clause("p(X)"), clause("q(X) v !p(X)"));
    let mut m_1 = Model::of_header("t = {a}");
    m_1.add_clause(c_1.clone());
    m_1.add_clause(c_2.clone());
    let mut m_2 = Model::new();
    m_2.add_clause(c_2);
    m_2.add_clause(c_1);
    assert_eq! { m_1.hash_code(), m_2.hash_code() }
    assert_ne! { m_1.hash_code(), Model::new().hash_code() }
}

#[test]
fn child_copies_clauses_not_scores() {
    let mut parent = scored("p(X)", &[(-1., 3)]);
    parent.add_final_score(score(0, -2., 3));
    let child = parent.child(clause("q(X)"));
    assert_eq! { child.clauses().len(), 2 }
    assert_eq! { child.last_clause(), Some(&clause("q(X)")) }
    assert!(child.scores().is_empty());
    assert!(child.final_score().is_none());
    assert_eq! { child.final_ll(), f64::NEG_INFINITY }
    assert_eq! { parent.final_ll(), -2. }
    assert_eq! { parent.ll(), -1. }
}

#[test]
fn objective() {
    let conf = LearnConf::default();
    let bounds = Bounds::default();
    let model = scored("p(X)", &[(-10., 100), (-20., 300)]);
    // ((-10 - 1) + (-20 - 3)) / 2
    assert_eq! { model.score(&conf, &bounds), -17. }
    let exact = model.score_exact(&conf, &bounds).unwrap();
    assert_eq! { rat_to_decimal(&exact, 5), "-17.00000" }

    assert_eq! { Model::new().score(&conf, &bounds), f64::NEG_INFINITY }
    assert!(Model::new().score_exact(&conf, &bounds).is_none());
}

#[test]
fn normalized_objective() {
    let conf = LearnConf {
        normalize_obj: true,
        penalty: 0.5,
        ..LearnConf::default()
    };
    let models = vec![
        scored("p(X)", &[(-10., 10)]),
        scored("q(X)", &[(-20., 30)]),
    ];
    let bounds = Bounds::of_models(&models);
    assert_eq! {
        bounds,
        Bounds { min_size: 10, max_size: 30, min_ll: -20., max_ll: -10. }
    }
    // 1 - 0.5 * 0
    assert_eq! { models[0].score(&conf, &bounds), 1. }
    // 0 - 0.5 * 1
    assert_eq! { models[1].score(&conf, &bounds), -0.5 }
}

#[test]
fn degenerate_normalization() {
    let conf = LearnConf {
        normalize_obj: true,
        ..LearnConf::default()
    };
    let models = vec![scored("p(X)", &[(-10., 10)])];
    let bounds = Bounds::of_models(&models);
    assert_eq! { models[0].score(&conf, &bounds), 0. }
    let exact = models[0].score_exact(&conf, &bounds).unwrap();
    assert!(exact.is_zero());

    // No scored model at all.
    let bounds = Bounds::of_models(&[Model::new()]);
    assert_eq! { bounds.norm_ll(-3.), 0. }
    assert_eq! { bounds.norm_size(7), 0. }
}

#[test]
fn ranking() {
    let conf = LearnConf::default();
    let bounds = Bounds::default();
    let models = vec![
        scored("a(X)", &[(-5., 0), (-5., 0)]),
        // Incomplete, dropped.
        scored("b(X)", &[(-1., 0)]),
        scored("c(X)", &[(-3., 0), (-3., 0)]),
        scored("d(X)", &[(-5., 0), (-5., 0)]),
        scored("e(X)", &[(-9., 0), (-3., 0)]),
    ];

    assert_eq! { models[0].compare(&models[2], &conf, &bounds), Ordering::Greater }
    assert_eq! { models[2].compare(&models[0], &conf, &bounds), Ordering::Less }
    assert_eq! { models[0].compare(&models[3], &conf, &bounds), Ordering::Equal }

    let ranked = rank(models, 2, &conf, &bounds);
    let names: Vec<String> = ranked
        .iter()
        .map(|m| m.last_clause().unwrap().lits()[0].name().to_string())
        .collect();
    // Ties keep their order.
    assert_eq! { names, vec!["c", "a", "d", "e"] }
}

#[test]
fn command_generation() {
    let dir = tempfile::TempDir::new().unwrap();
    let files = FileBuilder::new(dir.path()).unwrap();
    let mut conf = EngineConf::of_cmd("java -jar forclift.jar");
    conf.normalize_ll = true;

    let model = Model::new().child(clause("p(X)"));
    let dbs = vec![PathBuf::from("/data/db1"), PathBuf::from("/data/db2")];
    let task = ScoreTask::new(0, &model, dbs.clone());
    let theory = files.theory_file(model.hash_code(), paths_hash(&dbs));
    let args = task.command(&conf, &theory);

    let mut expected: Vec<String> = vec![
        "-jar",
        "forclift.jar",
        "score",
        "-v",
        "--normalizell",
        "--train",
        "/data/db1",
        "--train",
        "/data/db2",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    expected.push(theory.to_string_lossy().into_owned());
    assert_eq! { args, expected }

    let name = theory.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq! {
        name,
        format!("structure-{}-{}.mln", model.hash_code(), paths_hash(&dbs))
    }
}

#[test]
fn sorted_clauses() {
    let clauses = vec![clause("q(X)"), clause("p(X)"), clause("!r(X)")];
    let sorted: Vec<String> = clause::sorted(&clauses)
        .into_iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq! { sorted, vec!["!r(v0)", "p(v0)", "q(v0)"] }
}
