/*!
A small byte-oriented regex engine in the Thompson/Pike lineage.

A pattern is parsed once and compiled into two forms: a Thompson NFA and a
flat instruction program. Three engines can then run against a haystack:

* The [NFA simulation](crate::nfa::sim) advances the set of live automaton
  states one byte at a time and answers "does it match".
* The [Pike VM](crate::pikevm) advances a prioritized list of threads and
  additionally resolves capturing groups under greedy/non-greedy
  semantics.
* The [lazy DFA](crate::hybrid) memoizes the NFA simulation's state sets
  as DFA states with per-byte transition caching, optionally under a
  memory bound with wholesale eviction.

All three run in time linear in the haystack for one start offset, and
never more than `O(pattern * haystack)` overall. There is no
backtracking, so there are no pathological patterns.

# Syntax

The syntax is deliberately small, and operates on bytes:

| Construct | Meaning |
|-----------|---------|
| any byte not in `*?+()\|` | literal |
| `.` | any byte |
| `AB` | concatenation |
| `A\|B` | alternation, preferring `A` |
| `A*` / `A*?` | zero or more, greedy / non-greedy |
| `A+` / `A+?` | one or more, greedy / non-greedy |
| `A?` / `A??` | zero or one, greedy / non-greedy |
| `(A)` | capturing group |

The empty pattern and empty alternation branches are valid and match the
empty string.

# Example

```
use repike::Regex;

let mut re = Regex::new("a(b|c)*d")?;
assert!(re.is_match(b"xxabccbdxx"));
assert!(!re.is_match(b"abccbc"));
# Ok::<(), repike::BuildError>(())
```

# Example: capturing groups

```
use repike::{Regex, Span};

let mut re = Regex::new("(a+)(b+)")?;
let caps = re.captures(b"zzaaabbb").unwrap();
assert_eq!(caps.get_group(1), Some(Span::new(2, 5)));
assert_eq!(caps.get_group(2), Some(Span::new(5, 8)));
// The most recent captures stay readable on the regex itself.
assert_eq!(re.group(2), Some(Span::new(5, 8)));
# Ok::<(), repike::BuildError>(())
```

# Example: anchors and the lazy DFA

```
use repike::{Config, Regex};

let mut re = Regex::builder()
    .configure(Config::new().anchor_head(true).anchor_tail(true))
    .build("a(b|c)*d")?;
assert!(re.is_match(b"abcd"));
assert!(!re.is_match(b"xabcd"));

let mut re = Regex::builder()
    .configure(Config::new().dfa(true).bound_mem(true))
    .build("(a|b)*c")?;
assert!(re.is_match(b"abbabc"));
# Ok::<(), repike::BuildError>(())
```

# Crate features

* **logging** (enabled by default): emit compilation summaries and lazy
  DFA cache activity through the `log` crate.
* **perf-literal** (enabled by default): use the `memchr` crate to skip
  ahead to candidate offsets in unanchored searches.
*/

#[macro_use]
mod macros;

pub mod hybrid;
pub mod nfa;
pub mod parse;
pub mod pikevm;
pub mod util;

pub use crate::{
    parse::BuildError,
    pikevm::Captures,
    util::search::{Match, Span},
};

/// Configuration for compiling a [`Regex`].
///
/// Options follow the builder-lite pattern: each setter consumes and
/// returns the configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    anchor_head: bool,
    anchor_tail: bool,
    dfa: bool,
    bound_mem: bool,
    cache_capacity: Option<usize>,
}

impl Config {
    /// A configuration with everything at its default: unanchored
    /// searches, the NFA simulation for boolean matching, and no memory
    /// bound on the lazy DFA.
    pub fn new() -> Config {
        Config::default()
    }

    /// Require matches to start at the beginning of the haystack. This
    /// also drops the implicit `.*?` prefix from the compiled program.
    pub fn anchor_head(mut self, yes: bool) -> Config {
        self.anchor_head = yes;
        self
    }

    /// Require matches to end at the end of the haystack.
    pub fn anchor_tail(mut self, yes: bool) -> Config {
        self.anchor_tail = yes;
        self
    }

    /// Use the lazy DFA instead of the NFA simulation for
    /// [`Regex::is_match`]. Capture resolution always uses the VM.
    pub fn dfa(mut self, yes: bool) -> Config {
        self.dfa = yes;
        self
    }

    /// Bound the lazy DFA cache. When the bound is reached the cache is
    /// evicted wholesale and rebuilt, trading rediscovery work for a hard
    /// memory ceiling.
    pub fn bound_mem(mut self, yes: bool) -> Config {
        self.bound_mem = yes;
        self
    }

    /// The lazy DFA cache capacity, in states. Only relevant together
    /// with [`Config::bound_mem`].
    pub fn cache_capacity(mut self, states: usize) -> Config {
        self.cache_capacity = Some(states);
        self
    }

    /// Return whether head anchoring is enabled.
    pub fn get_anchor_head(&self) -> bool {
        self.anchor_head
    }

    /// Return whether tail anchoring is enabled.
    pub fn get_anchor_tail(&self) -> bool {
        self.anchor_tail
    }

    /// Return whether the lazy DFA is used for boolean searches.
    pub fn get_dfa(&self) -> bool {
        self.dfa
    }

    /// Return whether the lazy DFA cache is bounded.
    pub fn get_bound_mem(&self) -> bool {
        self.bound_mem
    }

    /// Return the configured cache capacity, if any.
    pub fn get_cache_capacity(&self) -> Option<usize> {
        self.cache_capacity
    }
}

/// A builder for a [`Regex`].
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// A builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Apply the given configuration.
    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = config;
        self
    }

    /// Compile the given pattern.
    pub fn build(&self, pattern: &str) -> Result<Regex, BuildError> {
        Regex::with_config(self.config, pattern)
    }
}

/// A compiled regular expression.
///
/// A `Regex` owns everything derived from its pattern: the NFA, the VM
/// program, and the working memory of all three engines, including the
/// lazy DFA's transition cache. Searching therefore takes `&mut self`,
/// and a `Regex` must not be shared between threads without external
/// synchronization; compiling the same pattern once per thread yields
/// fully independent values.
#[derive(Clone, Debug)]
pub struct Regex {
    /// A copy of the source pattern.
    pattern: String,
    config: Config,
    nfa: nfa::NFA,
    program: pikevm::Program,
    sim_cache: nfa::sim::Cache,
    vm_cache: pikevm::Cache,
    dfa_cache: hybrid::dfa::Cache,
    /// The captures of the most recent successful VM search.
    captures: Option<Captures>,
}

impl Regex {
    /// Compile a pattern with the default configuration.
    ///
    /// The only failure mode is a syntactically invalid pattern; the
    /// returned error carries the byte offset of the problem.
    pub fn new(pattern: &str) -> Result<Regex, BuildError> {
        Regex::with_config(Config::new(), pattern)
    }

    /// Return a builder for assembling a regex with a non-default
    /// configuration.
    pub fn builder() -> Builder {
        Builder::new()
    }

    fn with_config(config: Config, pattern: &str) -> Result<Regex, BuildError> {
        let ast = parse::Parser::parse(pattern.as_bytes())?;
        let nfa = nfa::NFA::new(&ast);
        let program = pikevm::Program::new(&ast, config.get_anchor_head());
        debug!(
            "compiled pattern {:?}: {} NFA states, {} instructions, \
             {} capture groups",
            pattern,
            nfa.len(),
            program.len(),
            program.group_len(),
        );
        let mut dfa_config =
            hybrid::dfa::Config::new().bound_mem(config.get_bound_mem());
        if let Some(states) = config.get_cache_capacity() {
            dfa_config = dfa_config.cache_capacity(states);
        }
        Ok(Regex {
            sim_cache: nfa::sim::Cache::new(&nfa),
            vm_cache: pikevm::Cache::new(&program),
            dfa_cache: hybrid::dfa::Cache::new(&nfa, dfa_config),
            pattern: pattern.to_string(),
            config,
            nfa,
            program,
            captures: None,
        })
    }

    /// The source pattern this regex was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The number of capturing groups, including group 0 for the whole
    /// match.
    pub fn group_len(&self) -> usize {
        self.program.group_len()
    }

    /// Whether the haystack matches.
    ///
    /// Runs the lazy DFA when [`Config::dfa`] is set and the NFA
    /// simulation otherwise. Both return exactly the same answers.
    pub fn is_match(&mut self, haystack: &[u8]) -> bool {
        let (head, tail) =
            (self.config.get_anchor_head(), self.config.get_anchor_tail());
        if self.config.get_dfa() {
            hybrid::dfa::is_match(
                &self.nfa,
                &mut self.dfa_cache,
                haystack,
                head,
                tail,
            )
        } else {
            nfa::sim::is_match(
                &self.nfa,
                &mut self.sim_cache,
                haystack,
                head,
                tail,
            )
        }
    }

    /// The leftmost match in the haystack, resolved by the VM under
    /// greedy/non-greedy thread priority.
    ///
    /// On success the capture slots become readable through
    /// [`Regex::group`] until the next search.
    pub fn find(&mut self, haystack: &[u8]) -> Option<Match> {
        self.captures = pikevm::find(
            &self.program,
            &mut self.vm_cache,
            haystack,
            self.config.get_anchor_tail(),
        );
        self.captures.as_ref().and_then(Captures::get_match)
    }

    /// Like [`Regex::find`], but returns all capture groups.
    pub fn captures(&mut self, haystack: &[u8]) -> Option<Captures> {
        self.find(haystack)?;
        self.captures.clone()
    }

    /// The span recorded for group `k` by the most recent successful
    /// [`Regex::find`] or [`Regex::captures`] call. Group 0 is the whole
    /// match; a group inside a branch that did not participate reports
    /// `None`.
    pub fn group(&self, k: usize) -> Option<Span> {
        self.captures.as_ref()?.get_group(k)
    }
}
