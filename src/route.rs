//! Path templates and the ordered route table that the
//! [`crate::view::Resolver`] evaluates.
//!
//! A template is a sequence of literal segments with at most one capture
//! (`:name`). Matching is exact per segment: literals compare verbatim and a
//! capture takes exactly one segment, whatever its contents.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(&'static str),
    Capture(&'static str),
}

/// A path template such as `/blogs/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses a template. Empty segments are ignored, so `/` is the template
    /// with no segments. Returns `None` if more than one segment is a
    /// capture.
    pub fn parse(template: &'static str) -> Option<Template> {
        let segments: Vec<Segment> = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Capture(name),
                None => Segment::Literal(s),
            })
            .collect();
        let captures = segments
            .iter()
            .filter(|s| matches!(s, Segment::Capture(_)))
            .count();
        match captures {
            0 | 1 => Some(Template { segments }),
            _ => None,
        }
    }

    /// Matches path segments against the template. On success, returns the
    /// captured segment if the template has one.
    pub fn matches<'p>(&self, path: &[&'p str]) -> Option<Match<'p>> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut capture = None;
        for (segment, part) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(_) => capture = Some(*part),
            }
        }
        Some(Match { capture })
    }

    /// Returns the capture's name, if the template has one.
    pub fn capture(&self) -> Option<&'static str> {
        self.segments.iter().find_map(|s| match s {
            Segment::Capture(name) => Some(*name),
            Segment::Literal(_) => None,
        })
    }

    /// Builds a path matching the template, with `value` in the capture.
    pub fn fill(&self, value: &str) -> String {
        if self.segments.is_empty() {
            return ROOT.to_owned();
        }
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(s) => path.push_str(s),
                Segment::Capture(_) => path.push_str(value),
            }
        }
        path
    }

    /// Renders the template as a JavaScript regular expression source that
    /// matches normalized paths (no empty segments, no trailing slash). A
    /// capture matches any single segment. Literal characters other than
    /// ASCII alphanumerics, `-` and `_` are wrapped in a character class, so
    /// the source never contains a backslash.
    pub fn pattern(&self) -> String {
        if self.segments.is_empty() {
            return "^/$".to_owned();
        }
        let mut pattern = String::from("^");
        for segment in &self.segments {
            pattern.push('/');
            match segment {
                Segment::Literal(s) => {
                    for c in s.chars() {
                        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                            pattern.push(c);
                        } else {
                            pattern.push('[');
                            pattern.push(c);
                            pattern.push(']');
                        }
                    }
                }
                Segment::Capture(_) => pattern.push_str("[^/]+"),
            }
        }
        pattern.push('$');
        pattern
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => write!(f, "/{}", s)?,
                Segment::Capture(s) => write!(f, "/:{}", s)?,
            }
        }
        Ok(())
    }
}

/// The result of a successful [`Template::matches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'p> {
    pub capture: Option<&'p str>,
}

/// The kinds of routes the blog knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    List,
    Detail,
}

/// The route table, in priority order. Anything that matches none of these
/// is redirected to [`ROOT`].
pub const ROUTES: [(Route, &str); 3] = [
    (Route::Home, "/"),
    (Route::List, "/blogs"),
    (Route::Detail, "/blogs/:id"),
];

pub const ROOT: &str = "/";

/// Splits a requested path into segments. The query string and fragment are
/// dropped and empty segments are skipped, so `/blogs/`, `//blogs` and
/// `/blogs?page=2` all split to `["blogs"]`. Segments are not percent-decoded.
pub fn segments(path: &str) -> Vec<&str> {
    let end = path.find(|c: char| c == '?' || c == '#').unwrap_or_else(|| path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

/// Returns the path for a post's detail route.
pub fn detail_path(id: impl fmt::Display) -> String {
    format!("/blogs/{}", id)
}
