//! The post catalog: the built-in demo posts, plus loading an alternative
//! catalog from a YAML file. Either way the result is handed to
//! [`PostStore::new`] so the id invariants are checked in one place.

use crate::post::{Post, PostId};
use crate::store::{Error as StoreError, PostStore};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Returns the four demo posts in authoring order.
pub(crate) fn seed() -> Vec<Post> {
    fn post(id: u64, title: &str, author: &str, date: &str, excerpt: &str, tags: &[&str]) -> Post {
        Post {
            id: PostId(id),
            title: title.to_owned(),
            author: author.to_owned(),
            date: date.to_owned(),
            excerpt: excerpt.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        }
    }

    vec![
        post(
            1,
            "How to Build a Modern React App",
            "Divyanshi",
            "Oct 1, 2025",
            "Learn how to set up a React project with routing and TailwindCSS.",
            &["React", "Tailwind"],
        ),
        post(
            2,
            "UI Design Basics for Developers",
            "A. Designer",
            "Sep 24, 2025",
            "Simple ways to make your components look better with minimal CSS.",
            &["UI", "Design"],
        ),
        post(
            3,
            "Performance Tips for Frontend",
            "Team Web",
            "Aug 12, 2025",
            "Small optimizations that can make a big difference in your web app.",
            &["Performance"],
        ),
        post(
            4,
            "Using CSS Grid with Tailwind",
            "Layout Guru",
            "Jul 3, 2025",
            "Easily create responsive grids for your blog pages.",
            &["CSS", "Layout"],
        ),
    ]
}

/// Loads a [`PostStore`] from a YAML file containing a sequence of posts:
///
/// ```yaml
/// - id: 1
///   title: Hello, world!
///   author: Me
///   date: Jan 1, 2025
///   excerpt: The first post.
///   tags: [greet]
/// ```
pub fn from_path(path: &Path) -> Result<PostStore> {
    let file = File::open(path).map_err(|err| Error::Open {
        path: path.to_owned(),
        err,
    })?;
    from_reader(file).map_err(|err| Error::Annotated(path.to_owned(), Box::new(err)))
}

/// Loads a [`PostStore`] from any reader yielding the YAML described in
/// [`from_path`].
pub fn from_reader<R: std::io::Read>(r: R) -> Result<PostStore> {
    let posts: Vec<Post> = serde_yaml::from_reader(r)?;
    Ok(PostStore::new(posts)?)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a catalog file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the catalog file can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the catalog isn't valid YAML or doesn't match the
    /// [`Post`] structure.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the posts violate the store's invariants.
    Store(StoreError),

    /// An error annotated with the catalog file it came from.
    Annotated(PathBuf, Box<Error>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => {
                write!(f, "Opening catalog file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Store(err) => err.fmt(f),
            Error::Annotated(path, err) => {
                write!(f, "loading catalog `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::Store(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator when deserializing the catalog.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Error {
        Error::Store(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    const CATALOG: &str = "
- id: 10
  title: Ten
  author: Someone
  date: Mar 3, 2024
  excerpt: Tenth.
  tags: [a, b, a]
- id: 4
  title: Four
  author: Someone Else
  date: Feb 2, 2024
  excerpt: Fourth.
";

    #[test]
    fn test_seed_ids() {
        let ids: Vec<u64> = seed().iter().map(|p| p.id.get()).collect();
        assert_eq!(vec![1, 2, 3, 4], ids);
    }

    #[test]
    fn test_from_reader() {
        let store = from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(2, store.len());
        let ten = store.find_by_id("10").unwrap();
        assert_eq!("Ten", ten.title);
        assert_eq!(vec!["a", "b", "a"], ten.tags);
        assert_eq!("Four", store.all()[1].title);
    }

    #[test]
    fn test_from_reader_duplicate_ids() {
        let doubled = format!("{}{}", CATALOG, CATALOG);
        match from_reader(doubled.as_bytes()) {
            Err(Error::Store(StoreError::DuplicateId(id))) => assert_eq!(10, id.get()),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_reader_bad_yaml() {
        assert!(matches!(
            from_reader("- id: one\n".as_bytes()),
            Err(Error::DeserializeYaml(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let store = from_path(file.path()).unwrap();
        assert_eq!(2, store.len());
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("posts.yaml");
        match from_path(&missing) {
            Err(Error::Open { path, .. }) => assert_eq!(missing, path),
            other => panic!("expected open error, got {:?}", other),
        }
    }
}
