use std::collections::HashMap;

use msgen::evaluate;
use msgen::flags::NoFlags;

fn flags(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_and() {
    assert!(evaluate("A AND B", &flags(&[("A", true), ("B", true)])));
    assert!(!evaluate("A AND B", &flags(&[("A", true), ("B", false)])));
    assert!(!evaluate("A AND B", &flags(&[("A", false), ("B", true)])));
}

#[test]
fn test_or() {
    assert!(evaluate("A OR B", &flags(&[("A", false), ("B", true)])));
    assert!(!evaluate("A OR B", &flags(&[("A", false), ("B", false)])));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let set = flags(&[("A", false), ("B", true), ("C", false)]);
    assert!(!evaluate("A OR B AND C", &set));
    assert!(!evaluate("B AND C OR A", &set));

    let set = flags(&[("A", true), ("B", false), ("C", false)]);
    assert!(evaluate("A OR B AND C", &set));
}

#[test]
fn test_not() {
    assert!(!evaluate("NOT A", &flags(&[("A", true)])));
    assert!(evaluate("NOT A", &flags(&[("A", false)])));
    assert!(evaluate("NOT NOT A", &flags(&[("A", true)])));
    // NOT binds tighter than AND
    assert!(evaluate("NOT A AND B", &flags(&[("A", false), ("B", true)])));
    assert!(!evaluate("NOT (A AND B)", &flags(&[("A", true), ("B", true)])));
}

#[test]
fn test_parentheses() {
    let set = flags(&[("A", true), ("B", false), ("C", true)]);
    assert!(evaluate("(A OR B) AND C", &set));
    assert!(evaluate("((A OR B) AND (C))", &set));
    assert!(!evaluate("(A OR B) AND NOT C", &set));
    assert!(evaluate("(A)", &set));
}

#[test]
fn test_unknown_flags_are_false() {
    assert!(!evaluate("X", &NoFlags));
    assert!(!evaluate("X", &flags(&[])));
    assert!(evaluate("NOT X", &flags(&[])));
}

#[test]
fn test_identifiers_are_case_sensitive_keywords_are_not() {
    let set = flags(&[("UseREST", true), ("UseGRPC", false)]);
    assert!(!evaluate("userest", &set));
    assert!(evaluate("UseREST or UseGRPC", &set));
    assert!(!evaluate("UseREST and UseGRPC", &set));
    assert!(evaluate("not UseGRPC", &set));
}

#[test]
fn test_flag_names_containing_keywords() {
    let set = flags(&[("ANDROID", true), ("MODERATE", true), ("NOTES", false), ("ORDERS", true)]);
    assert!(evaluate("ANDROID", &set));
    assert!(evaluate("MODERATE", &set));
    assert!(!evaluate("NOTES", &set));
    assert!(evaluate("ORDERS AND ANDROID", &set));
    assert!(evaluate("NOTES OR MODERATE", &set));
    assert!(evaluate("NOT NOTES", &set));
}

#[test]
fn test_malformed_expressions_best_effort() {
    let set = flags(&[("A", true), ("B", false)]);
    assert!(!evaluate("", &set));
    assert!(!evaluate("   ", &set));
    assert!(!evaluate("()", &set));
    // a missing operand is false
    assert!(evaluate("A OR", &set));
    assert!(evaluate("OR A", &set));
    assert!(!evaluate("A AND", &set));
    assert!(!evaluate("AND A", &set));
    assert!(evaluate("NOT", &set));
    // adjacent words are one unknown flag
    assert!(!evaluate("A B", &set));
    assert!(evaluate("NOT B C", &set));
    assert!(evaluate("B C OR A", &set));
}

#[test]
fn test_unparsable_condition_is_one_flag_name() {
    assert!(!evaluate("A)", &flags(&[("A", true)])));
    assert!(!evaluate("A) OR B", &flags(&[("A", true), ("B", true)])));
    assert!(evaluate("odd) name", &flags(&[("odd) name", true)])));
}

#[test]
fn test_unbalanced_parentheses_best_effort() {
    let set = flags(&[("A", true), ("B", false)]);
    assert!(evaluate("(A OR B", &set));
    assert!(!evaluate("((A AND B", &set));
}

#[test]
fn test_whitespace() {
    let set = flags(&[("A", true), ("B", true)]);
    assert!(evaluate("  A\tAND\u{a0}B  ", &set));
    assert!(evaluate("(A)AND(B)", &set));
}
