/// Pattern compilation and matching for route templates
///
/// Pure functional core of the router: a pattern string is compiled once
/// into evaluation branches, and matching a candidate path against the
/// compiled form is a side-effect-free segment walk. Same input → same
/// output, no shared mutable state, safe to call repeatedly.
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::RouterError;
use crate::path::segments;

/// A single matchable unit of a pattern branch
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Static text that must equal the path segment exactly
    Literal(String),
    /// Named parameter capturing one non-empty path segment
    Param(String),
}

/// Parsed pattern item, before optional groups are expanded
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Single(Token),
    /// Optional group `( ... )`: its items may be entirely absent
    Group(Vec<Item>),
}

/// What part of the URL a pattern is tested against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Tested against the pathname
    Path,
    /// `#`-prefixed, tested against the URL fragment
    Hash,
    /// The lone `*`: matches any pathname, reserved as the fallback
    Wildcard,
}

/// A compiled route pattern
///
/// Compilation expands optional groups into evaluation branches: a pattern
/// with `n` groups yields up to `2^n` branches, ordered group-present before
/// group-absent so the most specific interpretation wins.
///
/// # Grammar
///
/// - Literal segments separated by `/`: `/users/settings`
/// - `:name` captures one non-empty segment: `/users/:id`
/// - `( ... )` marks its segments optional: `/foo(/:id)` matches both
///   `/foo` and `/foo/bar`
/// - The lone `*` matches any pathname (fallback pattern)
/// - A leading `#` matches against the fragment: `#section`
///
/// # Examples
///
/// ```
/// use signpost::route::Pattern;
///
/// let pattern = Pattern::compile("/foo(/:id)").unwrap();
///
/// let params = pattern.matches("/foo/bar", "").unwrap();
/// assert_eq!(params.get("id"), Some(&"bar".to_string()));
///
/// // Absent optional group: matches with no bindings at all
/// let params = pattern.matches("/foo", "").unwrap();
/// assert!(params.is_empty());
///
/// assert!(pattern.matches("/other", "").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    kind: PatternKind,
    branches: Vec<Vec<Token>>,
}

impl Pattern {
    /// Compiles a pattern string
    ///
    /// Fails fast with [`RouterError::MalformedPattern`] on unbalanced
    /// optional groups or empty parameter names; a `Route` carrying an
    /// uncompilable pattern can never be registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use signpost::route::Pattern;
    ///
    /// assert!(Pattern::compile("/users/:id").is_ok());
    /// assert!(Pattern::compile("*").is_ok());
    /// assert!(Pattern::compile("#section").is_ok());
    ///
    /// assert!(Pattern::compile("/foo(/:id").is_err()); // Unclosed group
    /// assert!(Pattern::compile("/foo)").is_err()); // Stray )
    /// assert!(Pattern::compile("/:").is_err()); // Empty parameter name
    /// ```
    pub fn compile(raw: &str) -> Result<Self, RouterError> {
        if raw == "*" {
            return Ok(Pattern {
                raw: raw.to_string(),
                kind: PatternKind::Wildcard,
                branches: Vec::new(),
            });
        }

        let (kind, source) = match raw.strip_prefix('#') {
            Some(rest) => (PatternKind::Hash, rest),
            None => (PatternKind::Path, raw),
        };

        let mut chars = source.chars().peekable();
        let items = parse_items(raw, &mut chars, 0)?;

        Ok(Pattern {
            raw: raw.to_string(),
            kind,
            branches: expand(&items),
        })
    }

    /// The original pattern string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// What part of the URL this pattern is tested against
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Whether this is the fallback pattern `*`
    pub fn is_wildcard(&self) -> bool {
        self.kind == PatternKind::Wildcard
    }

    /// Tests the pattern against a pathname and fragment
    ///
    /// Path patterns are walked against the pathname, hash patterns against
    /// the fragment (without its leading `#`), using the same segment
    /// algorithm. The wildcard matches any input with empty params.
    ///
    /// Returns the extracted parameter bindings on success. Parameters in an
    /// absent optional group are omitted from the map, not bound to empty
    /// values.
    pub fn matches(&self, pathname: &str, hash: &str) -> Option<HashMap<String, String>> {
        let target = match self.kind {
            PatternKind::Wildcard => return Some(HashMap::new()),
            PatternKind::Path => pathname,
            PatternKind::Hash => hash,
        };

        let segs = segments(target);

        // First successful branch wins (group-present branches come first)
        self.branches
            .iter()
            .find_map(|branch| match_branch(branch, &segs))
    }
}

/// Recursive-descent parser over the pattern characters
///
/// `/` separates segments, `(`/`)` open and close optional groups, anything
/// else accumulates into the current segment. Errors carry the original
/// pattern string for diagnostics.
fn parse_items(
    raw: &str,
    chars: &mut Peekable<Chars<'_>>,
    depth: usize,
) -> Result<Vec<Item>, RouterError> {
    let mut items = Vec::new();
    let mut buffer = String::new();

    while let Some(c) = chars.next() {
        match c {
            '/' => flush_segment(raw, &mut buffer, &mut items)?,
            '(' => {
                flush_segment(raw, &mut buffer, &mut items)?;
                let inner = parse_items(raw, chars, depth + 1)?;
                if inner.is_empty() {
                    return Err(RouterError::malformed(raw, "empty optional group"));
                }
                items.push(Item::Group(inner));
            }
            ')' => {
                if depth == 0 {
                    return Err(RouterError::malformed(
                        raw,
                        "unbalanced optional group: unexpected `)`",
                    ));
                }
                flush_segment(raw, &mut buffer, &mut items)?;
                return Ok(items);
            }
            _ => buffer.push(c),
        }
    }

    if depth > 0 {
        return Err(RouterError::malformed(
            raw,
            "unbalanced optional group: missing `)`",
        ));
    }

    flush_segment(raw, &mut buffer, &mut items)?;
    Ok(items)
}

/// Turns the accumulated segment text into a token, if any
fn flush_segment(raw: &str, buffer: &mut String, items: &mut Vec<Item>) -> Result<(), RouterError> {
    if buffer.is_empty() {
        return Ok(());
    }

    let token = match buffer.strip_prefix(':') {
        Some("") => return Err(RouterError::malformed(raw, "empty parameter name")),
        Some(name) => Token::Param(name.to_string()),
        None => Token::Literal(buffer.clone()),
    };

    buffer.clear();
    items.push(Item::Single(token));
    Ok(())
}

/// Expands optional groups into flat evaluation branches
///
/// Each group doubles the branch set: once with the group's tokens present,
/// once absent. Present branches are emitted first so the deepest match is
/// attempted before any elision.
fn expand(items: &[Item]) -> Vec<Vec<Token>> {
    let mut branches: Vec<Vec<Token>> = vec![Vec::new()];

    for item in items {
        match item {
            Item::Single(token) => {
                for branch in &mut branches {
                    branch.push(token.clone());
                }
            }
            Item::Group(inner) => {
                let sub_branches = expand(inner);
                let mut next = Vec::new();
                for branch in &branches {
                    for sub in &sub_branches {
                        let mut with_group = branch.clone();
                        with_group.extend(sub.iter().cloned());
                        next.push(with_group);
                    }
                    next.push(branch.clone());
                }
                branches = next;
            }
        }
    }

    branches
}

/// Walks one branch against the path segments
///
/// Strict left-to-right comparison: the branch must consume exactly the
/// segment count (elision is handled by branch expansion, not here).
fn match_branch(tokens: &[Token], segs: &[&str]) -> Option<HashMap<String, String>> {
    if tokens.len() != segs.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (token, seg) in tokens.iter().zip(segs) {
        match token {
            Token::Literal(lit) => {
                if lit != seg {
                    return None;
                }
            }
            Token::Param(name) => {
                params.insert(name.clone(), (*seg).to_string());
            }
        }
    }

    Some(params)
}
