//! Path template compilation.
//!
//! # Responsibilities
//! - Find `<kind:name>` placeholders in a path template
//! - Reject templates that reuse a capture name
//! - Substitute each placeholder with a named capture group restricted to its kind
//! - Compile the result into a regular expression
//!
//! # Design Decisions
//! - Literal text, including `^` and `$` anchors, is passed through untouched
//! - Matching is unanchored unless the template anchors itself
//! - Character classes are ASCII (`[[:alpha:]]`, `[[:digit:]]`, `[[:alnum:]]`)
//! - `any` captures are greedy and unrestricted; adjacent `any` captures are accepted even though
//!   they cannot be told apart at match time

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::routing::error::CompileError;

/// Placeholder syntax: `<kind:name>` with `name` made of ASCII letters.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(str|int|all|any):([[:alpha:]]+)>").expect("placeholder syntax is a valid regex")
});

/// Declared character class of a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// `str`: letters only.
    StringAlpha,
    /// `int`: digits only, converted to an integer on dispatch.
    Integer,
    /// `all`: letters and digits.
    AlphaNumeric,
    /// `any`: anything, greedy.
    Any,
}

impl CaptureKind {
    /// Parse the tag used in template syntax.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "str" => Some(CaptureKind::StringAlpha),
            "int" => Some(CaptureKind::Integer),
            "all" => Some(CaptureKind::AlphaNumeric),
            "any" => Some(CaptureKind::Any),
            _ => None,
        }
    }

    /// The tag used in template syntax.
    pub fn tag(self) -> &'static str {
        match self {
            CaptureKind::StringAlpha => "str",
            CaptureKind::Integer => "int",
            CaptureKind::AlphaNumeric => "all",
            CaptureKind::Any => "any",
        }
    }

    /// Regex fragment matched by a capture of this kind.
    fn class(self) -> &'static str {
        match self {
            CaptureKind::StringAlpha => "[[:alpha:]]+",
            CaptureKind::Integer => "[[:digit:]]+",
            CaptureKind::AlphaNumeric => "[[:alnum:]]+",
            CaptureKind::Any => ".+",
        }
    }

    fn group(self, name: &str) -> String {
        format!("(?P<{}>{})", name, self.class())
    }
}

impl fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A compiled path template.
///
/// Immutable once built. Capture names are unique and kept in the order they appear in the
/// template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    captures: Vec<(String, CaptureKind)>,
}

impl CompiledPattern {
    /// The generated regular expression source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Capture names and kinds in declaration order.
    pub fn captures(&self) -> &[(String, CaptureKind)] {
        &self.captures
    }

    /// Declared kind of a capture.
    pub fn kind_of(&self, name: &str) -> Option<CaptureKind> {
        self.captures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, kind)| *kind)
    }

    /// Returns true if the path matches anywhere the template allows.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.regex.as_str())
    }
}

/// Compile a path template into a [`CompiledPattern`].
///
/// ```
/// use typed_router::routing::compile;
///
/// let pattern = compile("/<all:user>/<str:post>$").unwrap();
/// assert_eq!(pattern.as_str(), "/(?P<user>[[:alnum:]]+)/(?P<post>[[:alpha:]]+)$");
/// assert!(pattern.is_match("/alice/intro"));
/// ```
pub fn compile(template: &str) -> Result<CompiledPattern, CompileError> {
    let mut captures: Vec<(String, CaptureKind)> = Vec::new();

    for caps in PLACEHOLDER.captures_iter(template) {
        let Some(kind) = CaptureKind::from_tag(&caps[1]) else {
            continue;
        };
        let name = &caps[2];
        if captures.iter().any(|(existing, _)| existing == name) {
            return Err(CompileError::DuplicateCapture {
                template: template.to_string(),
                name: name.to_string(),
            });
        }
        captures.push((name.to_string(), kind));
    }

    let source = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
        match CaptureKind::from_tag(&caps[1]) {
            Some(kind) => kind.group(&caps[2]),
            None => caps[0].to_string(),
        }
    });

    let regex = Regex::new(&source).map_err(|source| CompileError::InvalidPattern {
        template: template.to_string(),
        source,
    })?;

    tracing::debug!(template = %template, pattern = %regex.as_str(), "Compiled route template");

    Ok(CompiledPattern { regex, captures })
}
