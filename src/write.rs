use crate::render::{Error as RenderError, Renderer};
use crate::route;
use crate::view::{Resolution, Resolver};
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// The file static hosts serve for paths with no file of their own. Its
/// contents come from [`Resolver::fallback`]: the not-found view for unknown
/// post ids, and a redirect home for everything else.
pub const FALLBACK_FILE: &str = "404.html";

/// Responsible for resolving every reachable route, rendering it, and
/// writing the HTML to disk.
pub struct Writer<'a> {
    pub renderer: Renderer<'a>,

    /// The directory in which the HTML files are written. A route path
    /// `/blogs/2` is written to `{output_directory}/blogs/2/index.html`.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Renders a single [`Page`] and writes it to disk.
    fn write_page(&self, page: &Page) -> Result<()> {
        let html = self
            .renderer
            .render(&page.resolution)
            .map_err(|err| Error::Render {
                path: page.path.clone(),
                err,
            })?;
        std::fs::write(&page.file_path, html)?;
        info!(path = %page.path, file = %page.file_path.display(), "wrote page");
        Ok(())
    }

    /// Renders the fallback document and writes it to [`FALLBACK_FILE`].
    fn write_fallback(&self, resolver: &Resolver) -> Result<()> {
        let file_path = self.output_directory.join(FALLBACK_FILE);
        let html = self
            .renderer
            .render_fallback(&resolver.fallback())
            .map_err(|err| Error::Render {
                path: format!("/{}", FALLBACK_FILE),
                err,
            })?;
        std::fs::write(&file_path, html)?;
        info!(file = %file_path.display(), "wrote fallback page");
        Ok(())
    }

    /// Writes the home page, the list page, one detail page per post, and the
    /// fallback page. Returns the number of pages written.
    pub fn write_site(&self, resolver: &Resolver) -> Result<usize> {
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        let mut written = 0;
        for page in pages(resolver, self.output_directory) {
            if let Some(dir) = page.file_path.parent() {
                if seen_dirs.insert(dir.to_owned()) {
                    std::fs::create_dir_all(dir)?;
                }
            }
            self.write_page(&page)?;
            written += 1;
        }
        std::fs::create_dir_all(self.output_directory)?;
        self.write_fallback(resolver)?;
        Ok(written + 1)
    }
}

/// An output HTML file: the route path it was resolved from, the resolution
/// to render, and where it goes on disk.
struct Page<'s> {
    path: String,
    resolution: Resolution<'s>,
    file_path: PathBuf,
}

/// Lists every routed page of the site. The paths come from the route table
/// and the catalog; what each one shows is left entirely to the resolver.
fn pages<'s>(resolver: &Resolver<'s>, output_directory: &Path) -> Vec<Page<'s>> {
    let mut paths: Vec<String> = vec![route::ROOT.to_owned(), "/blogs".to_owned()];
    paths.extend(
        resolver
            .store()
            .all()
            .iter()
            .map(|post| route::detail_path(post.id)),
    );

    paths
        .into_iter()
        .map(|path| Page {
            resolution: resolver.resolve(&path),
            file_path: index_file(output_directory, &path),
            path,
        })
        .collect()
}

/// Maps a route path to its `index.html` file beneath `output_directory`.
fn index_file(output_directory: &Path, path: &str) -> PathBuf {
    route::segments(path)
        .into_iter()
        .fold(output_directory.to_owned(), |dir, segment| dir.join(segment))
        .join("index.html")
}

/// The result of a fallible page-writing operation.
type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error rendering the page for a route path.
    Render { path: String, err: RenderError },

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Render { path, err } => write!(f, "Rendering `{}`: {}", path, err),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Render { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}
