//! Support for creating Atom feeds from the post catalog.

use crate::config::Author;
use crate::links::Links;
use crate::post::Post;
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseError, TimeZone, Utc};
use std::fmt;
use std::io::Write;

/// The display format of post dates, e.g. `Oct 1, 2025`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// Bundled configuration for creating a feed.
pub struct FeedConfig<'a> {
    pub title: &'a str,
    pub author: Option<&'a Author>,
    pub links: &'a Links,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s and writes the result to a [`std::io::Write`]. Entries keep the
/// catalog's authoring order.
pub fn write_feed<W: Write>(config: &FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, posts: &[Post]) -> Result<Feed> {
    let home_page = config.links.home()?;
    let entries = feed_entries(config, posts)?;

    // The newest post date, so the feed only changes when the catalog does.
    let updated = match entries.iter().map(|e| e.updated).max() {
        Some(updated) => updated,
        None => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
                .ok_or_else(|| Error::DateOutOfRange("1970-01-01".to_owned()))?;
            utc_midnight(epoch)?
        }
    };

    Ok(Feed {
        title: config.title.to_owned().into(),
        id: home_page.to_string(),
        updated,
        authors: author_to_people(config.author),
        links: vec![Link {
            href: home_page.to_string(),
            rel: "alternate".to_owned(),
            ..Default::default()
        }],
        entries,
        ..Default::default()
    })
}

fn feed_entries(config: &FeedConfig, posts: &[Post]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());

    for post in posts {
        let date = parse_date(&post.date)?;
        let url = config.links.post(post.id)?;

        entries.push(Entry {
            id: url.to_string(),
            title: post.title.clone().into(),
            updated: date,
            published: Some(date),
            authors: vec![Person {
                name: post.author.clone(),
                ..Default::default()
            }],
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                ..Default::default()
            }],
            summary: Some(post.excerpt.clone().into()),
            ..Default::default()
        })
    }
    Ok(entries)
}

/// Parses a post's display date (see [`DATE_FORMAT`]) as midnight UTC.
pub fn parse_date(date: &str) -> Result<DateTime<FixedOffset>> {
    let naive = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|err| {
        Error::DateTimeParse {
            date: date.to_owned(),
            err,
        }
    })?;
    utc_midnight(naive)
}

fn utc_midnight(date: NaiveDate) -> Result<DateTime<FixedOffset>> {
    let midnight =
        NaiveTime::from_hms_opt(0, 0, 0).ok_or_else(|| Error::DateOutOfRange(date.to_string()))?;
    let naive_date_time = NaiveDateTime::new(date, midnight);
    Ok(Utc.from_utc_datetime(&naive_date_time).into())
}

fn author_to_people(author: Option<&Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name.clone(),
            email: author.email.clone(),
            uri: None,
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, URL and
/// date parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a post's date.
    DateTimeParse { date: String, err: ParseError },

    /// Returned when a date or time can't be represented.
    DateOutOfRange(String),

    /// Returned when a post's URL can't be built.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse { date, err } => {
                write!(f, "Parsing post date `{}`: {}", date, err)
            }
            Error::DateOutOfRange(date) => write!(f, "Date `{}` is out of range", date),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse { date: _, err } => Some(err),
            Error::DateOutOfRange(_) => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
