//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the static site: loading the catalog
//! ([`crate::catalog`]), loading the theme ([`crate::theme`]), rendering every
//! route ([`crate::write`]), and generating the Atom feed ([`crate::feed`]).

use crate::catalog::{self, Error as CatalogError};
use crate::config::Config;
use crate::feed::{Error as FeedError, *};
use crate::links::Links;
use crate::render::Renderer;
use crate::store::PostStore;
use crate::theme::{Error as ThemeError, Theme};
use crate::view::Resolver;
use crate::write::{Error as WriteError, Writer, FALLBACK_FILE};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

pub const FEED_FILE: &str = "feed.atom";

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    pub pages: usize,
}

/// Loads the post store named by the configuration: the catalog file if one
/// is configured, otherwise the built-in demo catalog.
pub fn load_store(config: &Config) -> Result<PostStore> {
    match &config.catalog {
        Some(path) => Ok(catalog::from_path(path)?),
        None => Ok(PostStore::seeded()),
    }
}

/// Loads the theme named by the configuration, or the built-in one.
pub fn load_theme(config: &Config) -> Result<Theme> {
    match &config.theme {
        Some(dir) => Ok(Theme::from_directory(dir)?),
        None => Ok(Theme::builtin()?),
    }
}

/// Builds the site from a [`Config`] object. This calls into
/// [`Writer::write_site`] and [`write_feed`] which do the heavy-lifting.
pub fn build_site(config: &Config) -> Result<BuildReport> {
    let store = load_store(config)?;
    let theme = load_theme(config)?;
    let links = Links::new(config.site_root.clone());
    let out = &config.output_directory;

    // Only remove what a previous build wrote, in case the output directory
    // holds anything else.
    rmdir(&out.join("blogs"))?;
    for file in &["index.html", FALLBACK_FILE, FEED_FILE] {
        rmfile(&out.join(file))?;
    }
    std::fs::create_dir_all(out).map_err(|err| Error::Clean {
        path: out.to_owned(),
        err,
    })?;

    let writer = Writer {
        renderer: Renderer {
            theme: &theme,
            links: &links,
            title: &config.title,
        },
        output_directory: out,
    };
    let pages = writer.write_site(&Resolver::new(&store))?;

    write_feed(
        &FeedConfig {
            title: &config.title,
            author: config.author.as_ref(),
            links: &links,
        },
        store.all(),
        File::create(out.join(FEED_FILE))?,
    )?;

    info!(posts = store.len(), pages = pages, output = %out.display(), "site built");
    Ok(BuildReport {
        posts: store.len(),
        pages,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during catalog or theme
/// loading, writing, cleaning output directories, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading the catalog file.
    Catalog(CatalogError),

    /// Returned for errors loading the theme.
    Theme(ThemeError),

    /// Returned for errors rendering or writing pages.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Catalog(err) => err.fmt(f),
            Error::Theme(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning '{}': {}", path.display(), err)
            }
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Catalog(err) => Some(err),
            Error::Theme(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Error {
        Error::Catalog(err)
    }
}

impl From<ThemeError> for Error {
    fn from(err: ThemeError) -> Error {
        Error::Theme(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

fn rmfile(file: &Path) -> Result<()> {
    match std::fs::remove_file(file) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: file.to_owned(),
                err: e,
            }),
        },
    }
}
