use repike::{
    hybrid::dfa::{self, Cache, Config},
    nfa::{sim, NFA},
    parse::Parser,
};

use crate::setup;

fn nfa(pattern: &str) -> NFA {
    NFA::new(&Parser::parse(pattern.as_bytes()).unwrap())
}

/// Compare the lazy DFA against the NFA simulation over a grid of
/// patterns, haystacks and anchoring modes.
#[test]
fn agrees_with_the_nfa_simulation() {
    setup();
    let patterns = [
        "a(b|c)*d",
        "(a|b)*a",
        "a.*b",
        "a.*?b",
        "(a+)(b+)",
        "a|",
        "",
        "((a)|b)+c?",
        ".b.",
        "a(b(c|d)*)*e",
    ];
    let haystacks: &[&[u8]] = &[
        b"",
        b"a",
        b"b",
        b"ab",
        b"ba",
        b"abd",
        b"abcbd",
        b"abccbcccd",
        b"aaaaaabac",
        b"axxxxbxxxb",
        b"aaabbb",
        b"xyz",
        b"abcdcde",
        b"a\x00b",
    ];
    for pattern in patterns {
        let nfa = nfa(pattern);
        let mut sim_cache = sim::Cache::new(&nfa);
        let mut dfa_cache = Cache::new(&nfa, Config::new());
        let mut bounded_cache =
            Cache::new(&nfa, Config::new().bound_mem(true).cache_capacity(2));
        for &haystack in haystacks {
            for (head, tail) in
                [(false, false), (true, false), (false, true), (true, true)]
            {
                let expected = sim::is_match(
                    &nfa,
                    &mut sim_cache,
                    haystack,
                    head,
                    tail,
                );
                let got = dfa::is_match(
                    &nfa,
                    &mut dfa_cache,
                    haystack,
                    head,
                    tail,
                );
                assert_eq!(
                    expected, got,
                    "lazy DFA disagrees: {:?} / {:?} head={} tail={}",
                    pattern, haystack, head, tail,
                );
                let got = dfa::is_match(
                    &nfa,
                    &mut bounded_cache,
                    haystack,
                    head,
                    tail,
                );
                assert_eq!(
                    expected, got,
                    "bounded lazy DFA disagrees: {:?} / {:?} head={} tail={}",
                    pattern, haystack, head, tail,
                );
            }
        }
    }
}

#[test]
fn cache_grows_lazily_and_is_reused() {
    let nfa = nfa("(a|b)*c");
    let mut cache = Cache::new(&nfa, Config::new());
    assert_eq!(cache.state_len(), 0);
    assert!(dfa::is_match(&nfa, &mut cache, b"abc", false, false));
    let after_first = cache.state_len();
    assert!(after_first > 0);
    assert!(dfa::is_match(&nfa, &mut cache, b"babc", false, false));
    assert_eq!(cache.state_len(), after_first);
    assert_eq!(cache.clear_count(), 0);
}

#[test]
fn bounded_cache_clears_under_pressure() {
    let pattern = "a(b|c)(b|c)(b|c)(b|c)d";
    let nfa = nfa(pattern);
    let mut cache =
        Cache::new(&nfa, Config::new().bound_mem(true).cache_capacity(2));
    assert!(dfa::is_match(&nfa, &mut cache, b"abcbcd", false, false));
    assert!(cache.clear_count() > 0, "expected at least one eviction");
    assert!(cache.state_len() <= 2);

    // The same search keeps producing the same answer after arbitrarily
    // many evictions.
    for _ in 0..8 {
        assert!(dfa::is_match(&nfa, &mut cache, b"abcbcd", false, false));
        assert!(!dfa::is_match(&nfa, &mut cache, b"abcbc", false, false));
    }
}

#[test]
fn unbounded_cache_never_clears() {
    let nfa = nfa("(a|b|c|d)*e");
    let mut cache = Cache::new(&nfa, Config::new());
    let haystack = b"abcdabcdabcdabcde".repeat(16);
    assert!(dfa::is_match(&nfa, &mut cache, &haystack, false, false));
    assert_eq!(cache.clear_count(), 0);
}
