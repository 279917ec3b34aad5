//! Defines the [`Post`] record and its identifier type, [`PostId`].

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The identifier of a [`Post`]. Identifiers are positive integers assigned
/// when the catalog is authored and are never reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub(crate) u64);

impl PostId {
    /// Builds a [`PostId`] from a raw integer. Returns `None` for zero.
    pub fn new(id: u64) -> Option<PostId> {
        match id {
            0 => None,
            id => Some(PostId(id)),
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PostId {
    type Err = ParseIdError;

    /// Parses a [`PostId`] from its canonical decimal text: ASCII digits only,
    /// no sign, no surrounding whitespace, and no leading zeros. These are
    /// exactly the strings produced by [`PostId`]'s [`fmt::Display`] impl, so
    /// `id.to_string().parse() == Ok(id)` and nothing else parses.
    fn from_str(s: &str) -> Result<PostId, ParseIdError> {
        if s.is_empty() {
            return Err(ParseIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseIdError::InvalidDigit(s.to_owned()));
        }
        if s.starts_with('0') {
            return Err(match s.len() {
                1 => ParseIdError::Zero,
                _ => ParseIdError::LeadingZero(s.to_owned()),
            });
        }
        s.parse::<u64>()
            .map(PostId)
            .map_err(|_| ParseIdError::Overflow(s.to_owned()))
    }
}

/// Represents a problem converting text into a [`PostId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// Returned for the empty string.
    Empty,

    /// Returned when the text contains anything other than ASCII digits
    /// (including signs and whitespace).
    InvalidDigit(String),

    /// Returned for non-canonical text such as `02`.
    LeadingZero(String),

    /// Returned for `0`, which is never a valid identifier.
    Zero,

    /// Returned when the digits don't fit in a `u64`.
    Overflow(String),
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseIdError::Empty => write!(f, "empty post id"),
            ParseIdError::InvalidDigit(s) => {
                write!(f, "post id `{}` is not a decimal number", s)
            }
            ParseIdError::LeadingZero(s) => {
                write!(f, "post id `{}` has a leading zero", s)
            }
            ParseIdError::Zero => write!(f, "post id must be positive"),
            ParseIdError::Overflow(s) => write!(f, "post id `{}` is too large", s),
        }
    }
}

impl std::error::Error for ParseIdError {}

/// An immutable blog entry. All fields other than `id` are display strings;
/// `date` in particular is shown verbatim and only parsed when building the
/// feed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub excerpt: String,

    /// Tags in display order. Duplicates are kept as authored.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Anything that can name a post: numeric identifiers or the text of a path
/// segment. Conversion happens before comparison, so every key ends up in the
/// [`PostId`] domain or matches nothing.
pub trait PostKey {
    fn to_post_id(&self) -> Option<PostId>;
}

impl PostKey for PostId {
    fn to_post_id(&self) -> Option<PostId> {
        Some(*self)
    }
}

impl PostKey for u64 {
    fn to_post_id(&self) -> Option<PostId> {
        PostId::new(*self)
    }
}

impl PostKey for u32 {
    fn to_post_id(&self) -> Option<PostId> {
        PostId::new(u64::from(*self))
    }
}

impl PostKey for i64 {
    fn to_post_id(&self) -> Option<PostId> {
        use std::convert::TryFrom;
        u64::try_from(*self).ok().and_then(PostId::new)
    }
}

impl PostKey for i32 {
    fn to_post_id(&self) -> Option<PostId> {
        i64::from(*self).to_post_id()
    }
}

impl PostKey for str {
    fn to_post_id(&self) -> Option<PostId> {
        self.parse().ok()
    }
}

impl PostKey for String {
    fn to_post_id(&self) -> Option<PostId> {
        self.as_str().to_post_id()
    }
}

impl<K: PostKey + ?Sized> PostKey for &K {
    fn to_post_id(&self) -> Option<PostId> {
        (**self).to_post_id()
    }
}
