use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use repike::{Config, Regex};

use crate::setup;

/// A random pattern drawn from the supported syntax plus a random
/// haystack over a small alphabet, so that matches are actually likely.
#[derive(Clone, Debug)]
struct SearchCase {
    pattern: String,
    haystack: Vec<u8>,
}

impl Arbitrary for SearchCase {
    fn arbitrary(g: &mut Gen) -> SearchCase {
        let pattern = gen_pattern(g, 3);
        let len = usize::arbitrary(g) % 12;
        let haystack =
            (0..len).map(|_| *g.choose(b"abcd").unwrap()).collect();
        SearchCase { pattern, haystack }
    }
}

/// Generate a syntactically valid pattern of bounded depth. Repetitions
/// always apply to a parenthesized subpattern so that rendering can never
/// produce an accidental `**`.
fn gen_pattern(g: &mut Gen, depth: usize) -> String {
    let choices: &[u8] =
        if depth == 0 { &[0, 1] } else { &[0, 0, 1, 2, 2, 3, 4, 5, 6, 7] };
    match *g.choose(choices).unwrap() {
        0 => char::from(*g.choose(b"abc").unwrap()).to_string(),
        1 => ".".to_string(),
        2 => format!(
            "{}{}",
            gen_pattern(g, depth - 1),
            gen_pattern(g, depth - 1),
        ),
        3 => format!(
            "{}|{}",
            gen_pattern(g, depth - 1),
            gen_pattern(g, depth - 1),
        ),
        4 => format!("({})", gen_pattern(g, depth - 1)),
        5 => {
            let greedy = if bool::arbitrary(g) { "" } else { "?" };
            format!("({})*{}", gen_pattern(g, depth - 1), greedy)
        }
        6 => {
            let greedy = if bool::arbitrary(g) { "" } else { "?" };
            format!("({})+{}", gen_pattern(g, depth - 1), greedy)
        }
        _ => {
            let greedy = if bool::arbitrary(g) { "" } else { "?" };
            format!("({})?{}", gen_pattern(g, depth - 1), greedy)
        }
    }
}

fn compile(pattern: &str, config: Config) -> Option<Regex> {
    // Deeply nested generated patterns can exceed the capture group
    // limit; those cases are discarded rather than shrunk into noise.
    Regex::builder().configure(config).build(pattern).ok()
}

#[test]
fn all_engines_agree() {
    setup();
    fn prop(case: SearchCase) -> TestResult {
        let mut nfa = match compile(&case.pattern, Config::new()) {
            None => return TestResult::discard(),
            Some(re) => re,
        };
        let mut dfa =
            compile(&case.pattern, Config::new().dfa(true)).unwrap();
        let mut bounded = compile(
            &case.pattern,
            Config::new().dfa(true).bound_mem(true).cache_capacity(2),
        )
        .unwrap();

        let expected = nfa.is_match(&case.haystack);
        TestResult::from_bool(
            dfa.is_match(&case.haystack) == expected
                && bounded.is_match(&case.haystack) == expected
                && nfa.find(&case.haystack).is_some() == expected,
        )
    }
    QuickCheck::new()
        .tests(400)
        .quickcheck(prop as fn(SearchCase) -> TestResult);
}

#[test]
fn engines_agree_under_anchors() {
    setup();
    fn prop(case: SearchCase) -> TestResult {
        for (head, tail) in
            [(true, false), (false, true), (true, true)]
        {
            let config =
                Config::new().anchor_head(head).anchor_tail(tail);
            let mut nfa = match compile(&case.pattern, config) {
                None => return TestResult::discard(),
                Some(re) => re,
            };
            let mut dfa =
                compile(&case.pattern, config.dfa(true)).unwrap();
            let expected = nfa.is_match(&case.haystack);
            if dfa.is_match(&case.haystack) != expected {
                return TestResult::failed();
            }
            if nfa.find(&case.haystack).is_some() != expected {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }
    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(SearchCase) -> TestResult);
}

#[test]
fn searches_are_idempotent() {
    setup();
    fn prop(case: SearchCase) -> TestResult {
        let mut one = match compile(&case.pattern, Config::new()) {
            None => return TestResult::discard(),
            Some(re) => re,
        };
        let mut two = compile(&case.pattern, Config::new()).unwrap();

        let first = one.captures(&case.haystack);
        let second = one.captures(&case.haystack);
        let fresh = two.captures(&case.haystack);
        TestResult::from_bool(first == second && first == fresh)
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(SearchCase) -> TestResult);
}

#[test]
fn lazy_repetitions_never_match_longer_than_greedy() {
    setup();
    fn prop(case: SearchCase) -> TestResult {
        let greedy_pattern = format!("({})*", case.pattern);
        let lazy_pattern = format!("({})*?", case.pattern);
        let config = Config::new().anchor_head(true);
        let mut greedy = match compile(&greedy_pattern, config) {
            None => return TestResult::discard(),
            Some(re) => re,
        };
        let mut lazy = match compile(&lazy_pattern, config) {
            None => return TestResult::discard(),
            Some(re) => re,
        };
        // Both match at offset 0 by construction. The lazy variant's
        // overall span must never exceed the greedy one's.
        let greedy_end = match greedy.find(&case.haystack) {
            None => return TestResult::discard(),
            Some(m) => m.end(),
        };
        let lazy_end = match lazy.find(&case.haystack) {
            None => return TestResult::discard(),
            Some(m) => m.end(),
        };
        TestResult::from_bool(lazy_end <= greedy_end)
    }
    QuickCheck::new()
        .tests(300)
        .quickcheck(prop as fn(SearchCase) -> TestResult);
}
