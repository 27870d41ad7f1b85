//! # Path Resolution
//!
//! Namespace paths are `::`-separated sequences of segments.
//!
//! - Absolute: `::seg1::seg2::...::segN` (the bare `::` is the root)
//! - Relative: `seg1::seg2` or `seg`, resolved against a base path
//!
//! A single `:` is an ordinary character inside a segment, so `:a` and `a:`
//! are valid names. Empty segments are rejected: `a::::b`, `a::` and the empty
//! string all fail with [`PathError::Malformed`].
//!
//! # Matching
//!
//! A subscription pattern is an absolute path. It matches a fired event when
//! it either names the event itself or names the event's namespace (or one of
//! its ancestors). See [`Path::matches_event`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The separator between path segments.
pub const SEPARATOR: &str = "::";

/// Errors raised while parsing or resolving a path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The raw path contains an empty segment or is empty itself.
    #[error("malformed path `{raw}`: {reason}")]
    Malformed {
        /// The offending input.
        raw: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl PathError {
    fn malformed(raw: &str, reason: &'static str) -> Self {
        PathError::Malformed {
            raw: raw.to_owned(),
            reason,
        }
    }
}

/// An ordered sequence of segments, either absolute or relative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    absolute: bool,
    segments: Vec<String>,
}

impl Path {
    /// The root path `::`.
    pub const fn root() -> Self {
        Self {
            absolute: true,
            segments: Vec::new(),
        }
    }

    /// Build an absolute path from already validated segments.
    ///
    /// Fails if any segment is empty.
    pub fn absolute<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::malformed(
                &segments.join(SEPARATOR),
                "empty segment",
            ));
        }
        Ok(Self {
            absolute: true,
            segments,
        })
    }

    /// Parse a raw path string.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::malformed(raw, "path cannot be empty"));
        }

        let (absolute, body) = match raw.strip_prefix(SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        if body.is_empty() {
            return if absolute {
                Ok(Self::root())
            } else {
                Err(PathError::malformed(raw, "path cannot be empty"))
            };
        }

        let mut segments = Vec::new();
        for segment in body.split(SEPARATOR) {
            if segment.is_empty() {
                return Err(PathError::malformed(raw, "empty segment"));
            }
            segments.push(segment.to_owned());
        }

        Ok(Self { absolute, segments })
    }

    /// Resolve `raw` against `base`.
    ///
    /// Absolute input ignores `base`. Relative input is appended to `base`,
    /// which must itself be absolute for the result to be canonical.
    pub fn resolve(base: &Path, raw: &str) -> Result<Self, PathError> {
        let parsed = Self::parse(raw)?;
        if parsed.absolute {
            Ok(parsed)
        } else {
            Ok(base.join(&parsed))
        }
    }

    /// Whether this path starts at the root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    /// The segments of the path.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root and for paths without segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path without its last segment, `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            absolute: self.absolute,
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append the segments of `other` to this path.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self {
            absolute: self.absolute,
            segments,
        }
    }

    /// Append a single segment.
    pub fn child(&self, name: &str) -> Result<Path, PathError> {
        if name.is_empty() {
            return Err(PathError::malformed(name, "empty segment"));
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Ok(Self {
            absolute: self.absolute,
            segments,
        })
    }

    /// Segment-wise prefix test; a path is a prefix of itself.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        self.absolute == other.absolute
            && self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a == b)
    }

    /// Test this path, used as a subscription pattern, against an event
    /// named `event_name` declared in namespace `namespace`.
    ///
    /// Matches when the pattern is exactly the event path, or when it is a
    /// prefix of the namespace path (the namespace or one of its ancestors).
    pub fn matches_event(&self, namespace: &Path, event_name: &str) -> bool {
        if self.is_prefix_of(namespace) {
            return true;
        }
        self.segments.len() == namespace.segments.len() + 1
            && self.name() == Some(event_name)
            && self
                .parent()
                .is_some_and(|parent| parent == *namespace)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str(SEPARATOR)?;
        }
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
