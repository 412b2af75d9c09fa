/*!
Parsing of the pattern syntax into an abstract syntax tree.

The grammar is deliberately tiny:

```text
re    := concat ('|' re)?
concat := term*
term  := prim ('*' | '+' | '?')? '?'?
prim  := LITERAL | '.' | '(' re ')'
```

A `LITERAL` is any byte outside the metacharacter set `*?+()|`. The
trailing `?` after a repetition operator flips it from greedy to
non-greedy. A `concat` may be empty, so the empty pattern is valid (it
matches the empty prefix of any haystack), as are empty alternation
branches like the right hand side of `a|`.

The parser is a single forward pass with one byte of lookahead and no
backtracking. All of its state lives in the [`Parser`] value itself.
*/

use core::fmt;

/// The maximum number of capturing groups in one pattern, including the
/// implicit group 0 spanning the whole match.
pub const MAX_GROUPS: usize = 10;

/// The abstract syntax of a pattern.
///
/// Children are boxed to keep the enum small. Patterns are tiny, so the
/// allocations during parsing are of no consequence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ast {
    /// The empty pattern, or an empty alternation branch as in `a|`.
    Empty,
    /// A single literal byte.
    Char(u8),
    /// `.`, which matches any byte.
    Any,
    /// An alternation between two patterns.
    Alt(Box<Ast>, Box<Ast>),
    /// Two patterns, one after the other.
    Concat(Box<Ast>, Box<Ast>),
    /// Zero or more repetitions.
    Star {
        /// The repeated pattern.
        ast: Box<Ast>,
        /// Whether to prefer more repetitions over fewer.
        greedy: bool,
    },
    /// One or more repetitions.
    Plus {
        /// The repeated pattern.
        ast: Box<Ast>,
        /// Whether to prefer more repetitions over fewer.
        greedy: bool,
    },
    /// Zero or one occurrence.
    Quest {
        /// The optional pattern.
        ast: Box<Ast>,
        /// Whether to prefer one occurrence over zero.
        greedy: bool,
    },
    /// A capturing group.
    Paren {
        /// The group number. Groups are numbered by the position of their
        /// opening parenthesis, starting at 1.
        index: usize,
        /// The grouped pattern.
        ast: Box<Ast>,
    },
}

impl Ast {
    /// The number of capturing groups in this pattern, excluding the
    /// implicit group 0.
    pub(crate) fn group_count(&self) -> usize {
        match *self {
            Ast::Empty | Ast::Char(_) | Ast::Any => 0,
            Ast::Alt(ref lhs, ref rhs) | Ast::Concat(ref lhs, ref rhs) => {
                lhs.group_count().max(rhs.group_count())
            }
            Ast::Star { ref ast, .. }
            | Ast::Plus { ref ast, .. }
            | Ast::Quest { ref ast, .. } => ast.group_count(),
            Ast::Paren { index, ref ast } => index.max(ast.group_count()),
        }
    }
}

/// An error that occurred while parsing a pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildError {
    kind: ErrorKind,
    offset: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum ErrorKind {
    /// A metacharacter appeared where a primitive was expected.
    UnexpectedMeta(u8),
    /// A `(` without a matching `)`, or a stray `)`.
    UnbalancedParen,
    /// A repetition operator with nothing to repeat.
    RepetitionMissingTarget,
    /// More than `MAX_GROUPS - 1` capturing groups.
    TooManyGroups,
}

impl BuildError {
    /// The byte offset in the pattern at which this error was detected.
    /// For an unclosed group this is the offset of the `(` itself.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn unexpected_meta(byte: u8, offset: usize) -> BuildError {
        BuildError { kind: ErrorKind::UnexpectedMeta(byte), offset }
    }

    fn unbalanced_paren(offset: usize) -> BuildError {
        BuildError { kind: ErrorKind::UnbalancedParen, offset }
    }

    fn repetition_missing_target(offset: usize) -> BuildError {
        BuildError { kind: ErrorKind::RepetitionMissingTarget, offset }
    }

    fn too_many_groups(offset: usize) -> BuildError {
        BuildError { kind: ErrorKind::TooManyGroups, offset }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::UnexpectedMeta(byte) => write!(
                f,
                "unexpected metacharacter '{}' at offset {}",
                char::from(byte),
                self.offset,
            ),
            ErrorKind::UnbalancedParen => {
                write!(f, "unbalanced parenthesis at offset {}", self.offset)
            }
            ErrorKind::RepetitionMissingTarget => write!(
                f,
                "repetition operator at offset {} has nothing to repeat",
                self.offset,
            ),
            ErrorKind::TooManyGroups => write!(
                f,
                "group at offset {} exceeds the limit of {} capturing groups",
                self.offset,
                MAX_GROUPS - 1,
            ),
        }
    }
}

impl std::error::Error for BuildError {}

/// A recursive descent parser for the pattern syntax.
#[derive(Debug)]
pub struct Parser<'p> {
    /// The pattern bytes.
    pattern: &'p [u8],
    /// The offset of the next byte to consume.
    pos: usize,
    /// How many capturing groups have been opened so far.
    groups: usize,
}

impl<'p> Parser<'p> {
    /// Parse the given pattern into an AST.
    pub fn parse(pattern: &'p [u8]) -> Result<Ast, BuildError> {
        let mut parser = Parser { pattern, pos: 0, groups: 0 };
        let ast = parser.parse_alt()?;
        // parse_alt only stops early on a ')', which at this level has no
        // opening partner.
        if !parser.is_eof() {
            return Err(BuildError::unbalanced_paren(parser.pos));
        }
        Ok(ast)
    }

    fn parse_alt(&mut self) -> Result<Ast, BuildError> {
        let mut ast = self.parse_concat()?;
        while self.peek() == Some(b'|') {
            self.bump();
            let rhs = self.parse_concat()?;
            ast = Ast::Alt(Box::new(ast), Box::new(rhs));
        }
        Ok(ast)
    }

    fn parse_concat(&mut self) -> Result<Ast, BuildError> {
        let mut ast = Ast::Empty;
        loop {
            match self.peek() {
                None | Some(b'|') | Some(b')') => return Ok(ast),
                Some(_) => {}
            }
            let term = self.parse_term()?;
            ast = match ast {
                Ast::Empty => term,
                lhs => Ast::Concat(Box::new(lhs), Box::new(term)),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Ast, BuildError> {
        let prim = self.parse_prim()?;
        let rep = match self.peek() {
            Some(byte @ (b'*' | b'+' | b'?')) => {
                self.bump();
                byte
            }
            _ => return Ok(prim),
        };
        // A second repetition operator directly after this one would land
        // in parse_prim on the next term and fail there, so 'a**' is an
        // error rather than a repeated repetition.
        let greedy = if self.peek() == Some(b'?') {
            self.bump();
            false
        } else {
            true
        };
        let ast = Box::new(prim);
        Ok(match rep {
            b'*' => Ast::Star { ast, greedy },
            b'+' => Ast::Plus { ast, greedy },
            _ => Ast::Quest { ast, greedy },
        })
    }

    fn parse_prim(&mut self) -> Result<Ast, BuildError> {
        let offset = self.pos;
        match self.bump() {
            Some(b'.') => Ok(Ast::Any),
            Some(b'(') => {
                self.groups += 1;
                if self.groups > MAX_GROUPS - 1 {
                    return Err(BuildError::too_many_groups(offset));
                }
                let index = self.groups;
                let inner = self.parse_alt()?;
                match self.bump() {
                    Some(b')') => {
                        Ok(Ast::Paren { index, ast: Box::new(inner) })
                    }
                    _ => Err(BuildError::unbalanced_paren(offset)),
                }
            }
            Some(b'*' | b'+' | b'?') => {
                Err(BuildError::repetition_missing_target(offset))
            }
            // parse_concat stops before '|' and ')', so reaching here with
            // either is impossible, but keep the parser total.
            Some(byte @ (b'|' | b')')) => {
                Err(BuildError::unexpected_meta(byte, offset))
            }
            Some(byte) => Ok(Ast::Char(byte)),
            None => Err(BuildError::unexpected_meta(0, offset)),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.pattern.len()
    }
}
