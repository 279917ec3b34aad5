//! Defines the [`PostStore`], the read-only catalog of [`Post`]s that every
//! view is resolved against.

use crate::post::{Post, PostId, PostKey};
use std::collections::HashSet;
use std::fmt;

/// The fixed, ordered collection of all posts. Built once at startup and
/// never mutated; views borrow from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    /// Builds a store from posts in authoring order. Fails if an id is zero
    /// or appears more than once.
    pub fn new(posts: Vec<Post>) -> Result<PostStore> {
        let mut seen: HashSet<PostId> = HashSet::with_capacity(posts.len());
        for post in &posts {
            if post.id.get() == 0 {
                return Err(Error::ZeroId {
                    title: post.title.clone(),
                });
            }
            if !seen.insert(post.id) {
                return Err(Error::DuplicateId(post.id));
            }
        }
        Ok(PostStore { posts })
    }

    /// Builds the store holding the built-in demo catalog.
    pub fn seeded() -> PostStore {
        PostStore {
            posts: crate::catalog::seed(),
        }
    }

    /// Returns the full catalog in authoring order.
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    /// Returns the post whose id equals `key`. Textual keys are converted to
    /// a [`PostId`] first (see [`PostId`]'s `FromStr` impl), so `"2"` and
    /// `2u64` find the same post while `"two"` finds nothing.
    pub fn find_by_id<K: PostKey>(&self, key: K) -> Option<&Post> {
        let id = key.to_post_id()?;
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a catalog that violates the store's id invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when a post has the id `0`.
    ZeroId { title: String },

    /// Returned when two posts share an id.
    DuplicateId(PostId),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ZeroId { title } => {
                write!(f, "post `{}` has id 0; ids must be positive", title)
            }
            Error::DuplicateId(id) => write!(f, "duplicate post id {}", id),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    fn post(id: u64, title: &str) -> Post {
        serde_yaml::from_str(&format!(
            "id: {}\ntitle: {}\nauthor: a\ndate: Jan 1, 2025\nexcerpt: e\n",
            id, title
        ))
        .unwrap()
    }

    #[test]
    fn test_seed_satisfies_invariants() {
        let seeded = PostStore::seeded();
        assert_eq!(Ok(seeded.clone()), PostStore::new(seeded.all().to_vec()));
        assert_eq!(4, seeded.len());
    }

    #[test]
    fn test_find_every_post() {
        let store = PostStore::seeded();
        for p in store.all() {
            assert_eq!(Some(p), store.find_by_id(p.id));
            assert_eq!(Some(p), store.find_by_id(p.id.get()));
            assert_eq!(Some(p), store.find_by_id(p.id.to_string()));
            assert_eq!(Some(p), store.find_by_id(p.id.to_string().as_str()));
        }
    }

    #[test]
    fn test_find_unknown_ids() {
        let store = PostStore::seeded();
        let known: Vec<u64> = store.all().iter().map(|p| p.id.get()).collect();
        for n in (0u64..=1000).filter(|n| !known.contains(n)) {
            assert_eq!(None, store.find_by_id(n), "id {}", n);
        }
        assert_eq!(None, store.find_by_id(-1i64));
        assert_eq!(None, store.find_by_id(u64::MAX));
    }

    #[test]
    fn test_find_textual_ids() {
        let store = PostStore::seeded();
        assert_eq!(store.find_by_id(2u64), store.find_by_id("2"));
        assert!(store.find_by_id("2").is_some());
        for input in &["two", "", "02", " 2", "2/", "+2", "2.0", "0x2"] {
            assert_eq!(None, store.find_by_id(*input), "input: {:?}", input);
        }
    }

    #[test]
    fn test_authoring_order_kept() {
        let store =
            PostStore::new(vec![post(3, "c"), post(1, "a"), post(2, "b")]).unwrap();
        let titles: Vec<&str> = store.all().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(vec!["c", "a", "b"], titles);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let id = PostId::new(1).unwrap();
        assert_eq!(
            Err(Error::DuplicateId(id)),
            PostStore::new(vec![post(1, "a"), post(2, "b"), post(1, "c")])
        );
    }

    #[test]
    fn test_rejects_zero_id() {
        assert_eq!(
            Err(Error::ZeroId {
                title: "z".to_owned()
            }),
            PostStore::new(vec![post(0, "z")])
        );
    }
}
