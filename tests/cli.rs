use std::{path::Path, process::Command};

use finite_automata::prelude::*;
use tempfile::TempDir;

const TEN_THOUSAND: &str = "6\n2\n0\n5\n0 1 1\n1 0 2\n2 0 3\n3 0 4\n4 0 5\n";
const SECOND_TO_LAST: &str = "3\n2\n0\n2\n0 0 0\n0 1 0 1\n1 0 2\n1 1 2\n";

fn fa<I, S>(args: I) -> std::process::Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_fa"))
        .args(args)
        .output()
        .expect("binary must be runnable")
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &std::process::Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test_log::test]
fn simulate_prints_verdict() {
    let dir = TempDir::new().unwrap();
    let aut = write_input(&dir, "aut.txt", TEN_THOUSAND);

    for (input, expected) in [("10000", "true\n"), ("1001", "false\n"), ("", "false\n")] {
        let output = fa(["simulate", aut.as_str(), input]);
        assert!(output.status.success(), "{input}: {output:?}");
        assert_eq!(stdout(&output), expected, "{input}");

        let output = fa(["simulate", aut.as_str(), input, "--frontier"]);
        assert_eq!(stdout(&output), expected, "{input} with frontier");
    }
}

#[test_log::test]
fn simulate_handles_long_input() {
    let dir = TempDir::new().unwrap();
    let aut = write_input(&dir, "loop.txt", "1\n1\n0\n0\n0 0 0\n");
    let input = "0".repeat(50_000);

    let output = fa(["simulate", aut.as_str(), input.as_str()]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout(&output), "true\n");
}

#[test_log::test]
fn determinize_writes_readable_automaton() {
    let dir = TempDir::new().unwrap();
    let nfa_path = write_input(&dir, "nfa.txt", SECOND_TO_LAST);
    let dfa_path = path_str(&dir.path().join("dfa.txt"));

    let output = fa(["determinize", nfa_path.as_str(), dfa_path.as_str()]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).is_empty());

    let nfa: Automaton = SECOND_TO_LAST.parse().unwrap();
    let dfa = Automaton::from_file(&dfa_path).unwrap();
    assert_eq!(dfa, nfa.determinize());
    assert!(dfa.accepts(&[0, 1, 1]));
}

#[test_log::test]
fn minimize_writes_readable_automaton() {
    let dir = TempDir::new().unwrap();
    let nfa_path = write_input(&dir, "nfa.txt", SECOND_TO_LAST);
    let nfa: Automaton = SECOND_TO_LAST.parse().unwrap();

    let raw_path = path_str(&dir.path().join("raw.txt"));
    let output = fa(["minimize", nfa_path.as_str(), raw_path.as_str()]);
    assert!(output.status.success(), "{output:?}");
    let raw = Automaton::from_file(&raw_path).unwrap();
    assert_eq!(raw, nfa.determinize().minimize().unwrap());

    let canonical_path = path_str(&dir.path().join("canonical.txt"));
    let output = fa([
        "minimize",
        nfa_path.as_str(),
        canonical_path.as_str(),
        "--canonical",
    ]);
    assert!(output.status.success(), "{output:?}");
    let canonical = Automaton::from_file(&canonical_path).unwrap();
    assert_eq!(canonical, nfa.determinize().minimize_canonical().unwrap());
}

#[test_log::test]
fn show_prints_transition_table() {
    let dir = TempDir::new().unwrap();
    let aut = write_input(&dir, "aut.txt", SECOND_TO_LAST);

    let output = fa(["show", aut.as_str()]);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout(&output).contains("→0"));
    assert!(stdout(&output).contains("{0, 1}"));
}

#[test_log::test]
fn failures_exit_with_status_one() {
    let dir = TempDir::new().unwrap();
    let broken = write_input(&dir, "broken.txt", "2\n2\n0\n1\n0 1 2\n");
    let aut = write_input(&dir, "aut.txt", TEN_THOUSAND);
    let missing = path_str(&dir.path().join("missing.txt"));
    let target = path_str(&dir.path().join("out.txt"));

    for args in [
        vec!["simulate", broken.as_str(), "10"],
        vec!["simulate", missing.as_str(), "10"],
        vec!["simulate", aut.as_str(), "1-0"],
        vec!["determinize", broken.as_str(), target.as_str()],
        vec!["minimize", broken.as_str(), target.as_str()],
    ] {
        let output = fa(&args);
        assert_eq!(output.status.code(), Some(1), "{args:?}: {output:?}");
        assert!(stdout(&output).is_empty(), "{args:?}");
    }
    assert!(!dir.path().join("out.txt").exists());
}
