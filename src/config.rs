//! Loads the project configuration from a `myblog.yaml` file. The file is
//! found by searching the given directory and then its parents:
//!
//! ```yaml
//! title: My Blog
//! site_root: https://example.org/
//! catalog: posts.yaml      # optional, relative to the project file
//! theme: theme             # optional, relative to the project file
//! author:
//!   name: Me
//!   email: me@example.org
//! ```

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

pub const PROJECT_FILE: &str = "myblog.yaml";

const DEFAULT_TITLE: &str = "MyBlog";
const DEFAULT_SITE_ROOT: &str = "http://localhost:8080/";

/// The author attributed in the Atom feed.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    site_root: Option<Url>,

    #[serde(default)]
    catalog: Option<PathBuf>,

    #[serde(default)]
    theme: Option<PathBuf>,

    #[serde(default)]
    author: Option<Author>,
}

/// The resolved configuration. Paths are absolute (joined onto the
/// directory holding the project file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub title: String,
    pub site_root: Url,

    /// The catalog file. `None` means the built-in demo catalog.
    pub catalog: Option<PathBuf>,

    /// The theme directory. `None` means the built-in theme.
    pub theme: Option<PathBuf>,

    pub author: Option<Author>,

    /// Where `build` writes the site.
    pub output_directory: PathBuf,
}

impl Config {
    /// The configuration used when there is no project file: the built-in
    /// catalog and theme served from `http://localhost:8080/`.
    pub fn default_with_output(output_directory: &Path) -> Result<Config> {
        Ok(Config {
            title: DEFAULT_TITLE.to_owned(),
            site_root: Url::parse(DEFAULT_SITE_ROOT)?,
            catalog: None,
            theme: None,
            author: None,
            output_directory: output_directory.to_owned(),
        })
    }

    /// Searches `dir` and its ancestors for [`PROJECT_FILE`] and loads the
    /// first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let mut current = Some(dir);
        while let Some(dir) = current {
            let path = dir.join(PROJECT_FILE);
            if path.is_file() {
                return Config::from_project_file(&path, output_directory)
                    .map_err(|e| Error::Annotated(path, Box::new(e)));
            }
            current = dir.parent();
        }
        Err(Error::NotFound(dir.to_owned()))
    }

    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().unwrap_or_else(|| Path::new("."));
        let defaults = Config::default_with_output(output_directory)?;
        Ok(Config {
            title: project.title.unwrap_or(defaults.title),
            site_root: project.site_root.unwrap_or(defaults.site_root),
            catalog: project.catalog.map(|p| project_root.join(p)),
            theme: project.theme.map(|p| project_root.join(p)),
            author: project.author,
            output_directory: output_directory.to_owned(),
        })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no project file exists in the directory or any parent.
    NotFound(PathBuf),

    /// Returned when the project file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has the wrong
    /// shape.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a URL can't be parsed.
    UrlParse(url::ParseError),

    /// An error annotated with the project file it came from.
    Annotated(PathBuf, Box<Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound(dir) => write!(
                f,
                "Could not find `{}` in `{}` or any parent directory",
                PROJECT_FILE,
                dir.display()
            ),
            Error::Open { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Annotated(path, err) => {
                write!(f, "Loading configuration `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::NotFound(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::default_with_output(Path::new("/tmp/out")).unwrap();
        assert_eq!("MyBlog", config.title);
        assert_eq!("http://localhost:8080/", config.site_root.as_str());
        assert_eq!(None, config.catalog);
        assert_eq!(None, config.theme);
    }

    #[test]
    fn test_from_directory_searches_parents() {
        let root = tempfile::tempdir().unwrap();
        fs::write(
            root.path().join(PROJECT_FILE),
            "title: Notes\nsite_root: https://example.org/notes/\ncatalog: posts.yaml\n\
             author: {name: Me, email: me@example.org}\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = Config::from_directory(&nested, Path::new("/tmp/out")).unwrap();
        assert_eq!("Notes", config.title);
        assert_eq!("https://example.org/notes/", config.site_root.as_str());
        assert_eq!(Some(root.path().join("posts.yaml")), config.catalog);
        assert_eq!(None, config.theme);
        assert_eq!(
            Some(Author {
                name: "Me".to_owned(),
                email: Some("me@example.org".to_owned()),
            }),
            config.author
        );
        assert_eq!(Path::new("/tmp/out"), config.output_directory);
    }

    #[test]
    fn test_empty_project_file_uses_defaults() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(PROJECT_FILE), "{}\n").unwrap();
        let config = Config::from_directory(root.path(), Path::new("out")).unwrap();
        assert_eq!(
            Config::default_with_output(Path::new("out")).unwrap(),
            config
        );
    }

    #[test]
    fn test_bad_site_root() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join(PROJECT_FILE), "site_root: not a url\n").unwrap();
        match Config::from_directory(root.path(), Path::new("out")) {
            Err(Error::Annotated(path, _)) => assert_eq!(root.path().join(PROJECT_FILE), path),
            other => panic!("expected annotated error, got {:?}", other),
        }
    }
}
