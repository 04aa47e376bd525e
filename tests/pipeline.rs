use finite_automata::prelude::*;
use tempfile::TempDir;

const TEN_THOUSAND: &str = "6\n2\n0\n5\n0 1 1\n1 0 2\n2 0 3\n3 0 4\n4 0 5\n";
const WORDS: [&str; 8] = ["", "1", "10", "100", "1000", "10000", "1001", "1111"];

fn write_input(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test_log::test]
fn simulate_from_file() {
    let dir = TempDir::new().unwrap();
    let aut = Automaton::from_file(write_input(&dir, "aut.txt", TEN_THOUSAND)).unwrap();

    assert!(aut.accepts_str("10000").unwrap());
    for word in ["1001", "101", "111", ""] {
        assert!(!aut.accepts_str(word).unwrap(), "{word} must be rejected");
    }
}

#[test_log::test]
fn determinized_file_accepts_the_same_words() {
    let dir = TempDir::new().unwrap();
    let nfa = Automaton::from_file(write_input(&dir, "nfa.txt", TEN_THOUSAND)).unwrap();

    let dfa_path = dir.path().join("dfa.txt");
    nfa.determinize().to_file(&dfa_path).unwrap();
    let dfa = Automaton::from_file(&dfa_path).unwrap();

    assert!(dfa.is_deterministic());
    for word in WORDS {
        assert_eq!(nfa.accepts_str(word), dfa.accepts_str(word), "{word}");
    }
}

#[test_log::test]
fn minimized_file_accepts_the_same_words() {
    let dir = TempDir::new().unwrap();
    // accepts every word over {0, 1} that contains the factor `11`
    let nfa = Automaton::from_file(write_input(
        &dir,
        "nfa.txt",
        "3\n2\n0\n2\n0 0 0\n0 1 0 1\n1 1 2\n2 0 2\n2 1 2\n",
    ))
    .unwrap();

    let min_path = dir.path().join("min.txt");
    nfa.determinize().minimize().unwrap().to_file(&min_path).unwrap();
    let minimized = Automaton::from_file(&min_path).unwrap();

    assert!(minimized.is_deterministic());
    assert!(minimized.size() <= nfa.determinize().size());
    for word in WORDS.iter().chain(&["011", "0110", "0101", "11", "010"]) {
        assert_eq!(nfa.accepts_str(word), minimized.accepts_str(word), "{word}");
    }
    assert!(minimized.accepts_str("0110").unwrap());
    assert!(!minimized.accepts_str("0101").unwrap());
}

#[test_log::test]
fn malformed_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "broken.txt", "2\n2\n0\n1\n0 1 2\n");
    assert!(matches!(
        Automaton::from_file(path),
        Err(ParseError::OutOfRange { line: 5, .. })
    ));
    assert!(matches!(
        Automaton::from_file(dir.path().join("missing.txt")),
        Err(ParseError::Io(_))
    ));
}
