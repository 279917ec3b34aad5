//! Builds the links the rendering layer needs (`/`, `/blogs`, and
//! `/blogs/{id}`) relative to the configured site root, and maps site URLs
//! back to route paths.

use crate::post::PostId;
use crate::route;
use url::{ParseError, Url};

/// Link builder anchored at the site root. The root may carry a path prefix
/// (e.g. `https://example.org/myblog/`); route paths are joined beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    root: Url,
}

impl Links {
    /// Constructs a new [`Links`]. A trailing slash is added to the root's
    /// path if it's missing; without it [`Url::join`] would treat the last
    /// path segment as a file name and drop it.
    pub fn new(mut root: Url) -> Links {
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Links { root }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Returns the absolute URL for a route path such as `/blogs/2`.
    pub fn url(&self, path: &str) -> Result<Url, ParseError> {
        self.root.join(path.trim_start_matches('/'))
    }

    pub fn home(&self) -> Result<Url, ParseError> {
        self.url(route::ROOT)
    }

    pub fn blogs(&self) -> Result<Url, ParseError> {
        self.url("/blogs")
    }

    pub fn post(&self, id: PostId) -> Result<Url, ParseError> {
        self.url(&route::detail_path(id))
    }

    /// Maps a URL under the site root back to the route path the resolver
    /// expects (`https://example.org/myblog/blogs/2` becomes `/blogs/2`).
    /// The root without its trailing slash (`https://example.org/myblog`)
    /// maps to `/`. Returns `None` for URLs outside the site.
    pub fn route_path(&self, url: &Url) -> Option<String> {
        let mut url = url.clone();
        if url.origin() == self.root.origin() && format!("{}/", url.path()) == self.root.path() {
            url.set_path(self.root.path());
        }
        let relative = self.root.make_relative(&url)?;
        if relative.starts_with("../") || relative.contains("://") {
            return None;
        }
        let path = match relative.find(|c: char| c == '?' || c == '#') {
            Some(end) => &relative[..end],
            None => &relative[..],
        };
        Some(format!("/{}", path))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn links(root: &str) -> Links {
        Links::new(Url::parse(root).unwrap())
    }

    #[test]
    fn test_links_at_host_root() -> Result<(), ParseError> {
        let links = links("https://example.org");
        assert_eq!("https://example.org/", links.home()?.as_str());
        assert_eq!("https://example.org/blogs", links.blogs()?.as_str());
        assert_eq!(
            "https://example.org/blogs/3",
            links.post(PostId::new(3).unwrap())?.as_str()
        );
        Ok(())
    }

    #[test]
    fn test_links_under_prefix() -> Result<(), ParseError> {
        let links = links("https://example.org/myblog");
        assert_eq!("https://example.org/myblog/", links.home()?.as_str());
        assert_eq!("https://example.org/myblog/blogs", links.blogs()?.as_str());
        Ok(())
    }

    #[test]
    fn test_route_path() {
        let links = links("https://example.org/myblog/");
        let path = |url: &str| links.route_path(&Url::parse(url).unwrap());
        assert_eq!(Some("/blogs/2".to_owned()), path("https://example.org/myblog/blogs/2"));
        assert_eq!(Some("/".to_owned()), path("https://example.org/myblog/"));
        assert_eq!(Some("/blogs".to_owned()), path("https://example.org/myblog/blogs?x=1"));
        assert_eq!(None, path("https://example.org/other/blogs"));
        assert_eq!(None, path("https://elsewhere.org/myblog/blogs"));
    }

    #[test]
    fn test_route_path_bare_root() {
        let links = links("https://example.org/myblog");
        let path = |url: &str| links.route_path(&Url::parse(url).unwrap());
        assert_eq!(Some("/".to_owned()), path("https://example.org/myblog"));
        assert_eq!(Some("/".to_owned()), path("https://example.org/myblog?ref=feed"));
        assert_eq!(None, path("https://example.org/myblogs"));
        assert_eq!(None, path("http://example.org/myblog"));
    }

    #[test]
    fn test_route_path_round_trips_links() -> Result<(), ParseError> {
        let links = links("https://example.org/myblog/");
        let id = PostId::new(4).unwrap();
        assert_eq!(Some(route::detail_path(id)), links.route_path(&links.post(id)?));
        Ok(())
    }
}
