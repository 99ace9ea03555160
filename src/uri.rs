//! Generic URI parsing.
//!
//! URIs are split into the five components of RFC 3986 (scheme, authority,
//! path, query, fragment) without normalising or decoding any of them, so
//! bare filesystem paths and relative references are accepted as well as
//! absolute URIs. The path component is used verbatim as the local path.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Match, Regex};
use url::Url;

use crate::error::{FileError, Result};

/// The component-splitting expression from RFC 3986, appendix B. It matches
/// every input string.
static URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("URI expression is valid")
});

/// A parsed URI reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Uri {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Split `input` into its components. Never fails.
    pub fn parse(input: &str) -> Self {
        let Some(caps) = URI_RE.captures(input) else {
            return Self {
                path: input.to_string(),
                ..Default::default()
            };
        };
        let part = |i: usize| caps.get(i).map(|m| m.as_str().to_string());

        Self {
            scheme: part(1).map(|s| s.to_ascii_lowercase()),
            authority: part(2),
            path: part(3).unwrap_or_default(),
            query: part(4),
            fragment: part(5),
        }
    }

    /// The scheme, lowercased (e.g. `file`).
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The authority (host, port, userinfo). Empty for `file:///...`.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// The path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// True if the URI addresses the local filesystem: no scheme, or `file`.
    pub fn is_local(&self) -> bool {
        matches!(self.scheme(), None | Some("file"))
    }

    /// The path up to the final separator. Trailing separators are dropped
    /// unless the directory is the root.
    pub fn directory(&self) -> &str {
        split_path(&self.path).0
    }

    /// The path after the final separator. Empty if the path ends with one.
    pub fn filename(&self) -> &str {
        split_path(&self.path).1
    }

    /// Match `pattern` against the filename, anchored at its start only.
    ///
    /// A trailing `$` in the pattern still anchors the end.
    pub fn matches(&self, pattern: &str) -> Result<Option<Match<'_>>> {
        let re = Regex::new(pattern)?;
        Ok(self.matches_regex(&re))
    }

    /// Like [`Uri::matches`], for a compiled [`Regex`]. Flags set through
    /// `RegexBuilder` are kept.
    pub fn matches_regex(&self, re: &Regex) -> Option<Match<'_>> {
        // The leftmost match starts at 0 whenever any match does.
        re.find(self.filename()).filter(|m| m.start() == 0)
    }

    /// Convert into an absolute [`Url`]. Fails for scheme-less references.
    pub fn to_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.to_string())?)
    }
}

impl FromStr for Uri {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::parse(s))
    }
}

impl From<&Url> for Uri {
    fn from(url: &Url) -> Self {
        Self::parse(url.as_str())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{}", authority)?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// Split a path into (directory, filename) at the final `/`.
fn split_path(path: &str) -> (&str, &str) {
    let Some(pos) = path.rfind('/') else {
        return ("", path);
    };
    let (head, tail) = (&path[..=pos], &path[pos + 1..]);
    let trimmed = head.trim_end_matches('/');
    if trimmed.is_empty() {
        (head, tail)
    } else {
        (trimmed, tail)
    }
}
