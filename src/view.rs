//! Route-driven view selection. The [`Resolver`] maps a requested path to a
//! [`Resolution`]: either a [`ViewState`] to render or a [`Redirect`].
//! Resolution is total; every path, however malformed, ends up in exactly
//! one outcome, and none of them is an error.

use crate::links::Links;
use crate::post::Post;
use crate::route::{self, Route, Template};
use crate::store::PostStore;
use tracing::debug;
use url::Url;

/// A capture value that never names a post, since ids start at 1.
const MISSING_ID: &str = "0";

/// What the rendering layer shows for a navigation. Borrows from the
/// [`PostStore`] it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState<'s> {
    Home,

    /// The whole catalog, in authoring order.
    List(&'s [Post]),

    DetailFound(&'s Post),

    /// A detail path whose id names no post. This is a normal view, not a
    /// failure.
    DetailNotFound,
}

/// How a navigation affects the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
}

/// An instruction to navigate elsewhere instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub mode: HistoryMode,
}

/// The outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'s> {
    View(ViewState<'s>),
    Redirect(Redirect),
}

impl<'s> Resolution<'s> {
    /// Returns the view, if this resolution is one.
    pub fn view(&self) -> Option<ViewState<'s>> {
        match self {
            Resolution::View(view) => Some(*view),
            Resolution::Redirect(_) => None,
        }
    }
}

/// What a static host's fallback document shows for paths that have no file
/// of their own. A built site has a file for every literal route and every
/// existing post, so only capture routes with an unknown value and unmatched
/// paths reach the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback<'s> {
    /// The view shown for paths matching one of [`Fallback::templates`].
    pub view: Option<ViewState<'s>>,

    /// Capture templates whose unknown values resolve to [`Fallback::view`].
    pub templates: Vec<Template>,

    /// Where every other path goes.
    pub redirect: Redirect,
}

/// Resolves paths against an ordered route table (see [`route::ROUTES`]).
/// The first template that matches wins; if none do, the path redirects to
/// [`route::ROOT`], replacing the current history entry.
pub struct Resolver<'s> {
    store: &'s PostStore,
    routes: Vec<(Route, Template)>,
}

impl<'s> Resolver<'s> {
    pub fn new(store: &'s PostStore) -> Resolver<'s> {
        Resolver {
            store,
            routes: route::ROUTES
                .iter()
                .filter_map(|(route, template)| {
                    Template::parse(*template).map(|template| (*route, template))
                })
                .collect(),
        }
    }

    pub fn store(&self) -> &'s PostStore {
        self.store
    }

    /// Resolves a requested path.
    pub fn resolve(&self, path: &str) -> Resolution<'s> {
        let segments = route::segments(path);
        for (route, template) in &self.routes {
            if let Some(m) = template.matches(&segments) {
                debug!(path = %path, template = %template, "route matched");
                return Resolution::View(self.view(*route, m.capture));
            }
        }
        debug!(path = %path, "no route matched; redirecting to {}", route::ROOT);
        Resolution::Redirect(catch_all())
    }

    /// Resolves an absolute URL under the site root described by `links`.
    /// Returns `None` for URLs outside the site.
    pub fn resolve_url(&self, links: &Links, url: &Url) -> Option<Resolution<'s>> {
        links.route_path(url).map(|path| self.resolve(&path))
    }

    /// Describes the fallback document by resolving each capture route with
    /// a value that names no post.
    pub fn fallback(&self) -> Fallback<'s> {
        let mut view: Option<ViewState<'s>> = None;
        let mut templates = Vec::new();
        for (_, template) in &self.routes {
            if template.capture().is_none() {
                continue;
            }
            if let Resolution::View(shown) = self.resolve(&template.fill(MISSING_ID)) {
                if view.map_or(true, |v| v == shown) {
                    view = Some(shown);
                    templates.push(template.clone());
                }
            }
        }
        Fallback {
            view,
            templates,
            redirect: catch_all(),
        }
    }

    fn view(&self, route: Route, capture: Option<&str>) -> ViewState<'s> {
        match route {
            Route::Home => ViewState::Home,
            Route::List => ViewState::List(self.store.all()),
            Route::Detail => match capture.and_then(|id| self.store.find_by_id(id)) {
                Some(post) => ViewState::DetailFound(post),
                None => ViewState::DetailNotFound,
            },
        }
    }
}

fn catch_all() -> Redirect {
    Redirect {
        to: route::ROOT.to_owned(),
        mode: HistoryMode::Replace,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn redirect_home() -> Resolution<'static> {
        Resolution::Redirect(Redirect {
            to: "/".to_owned(),
            mode: HistoryMode::Replace,
        })
    }

    #[test]
    fn test_home() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        assert_eq!(Resolution::View(ViewState::Home), resolver.resolve("/"));
        assert_eq!(Resolution::View(ViewState::Home), resolver.resolve(""));
    }

    #[test]
    fn test_list() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        match resolver.resolve("/blogs") {
            Resolution::View(ViewState::List(posts)) => {
                assert_eq!(store.all(), posts);
                let ids: Vec<u64> = posts.iter().map(|p| p.id.get()).collect();
                assert_eq!(vec![1, 2, 3, 4], ids);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_detail_found() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        match resolver.resolve("/blogs/2") {
            Resolution::View(ViewState::DetailFound(post)) => {
                assert_eq!(2, post.id.get());
                assert_eq!("UI Design Basics for Developers", post.title);
                assert_eq!("A. Designer", post.author);
                assert_eq!("Sep 24, 2025", post.date);
                assert_eq!(
                    "Simple ways to make your components look better with minimal CSS.",
                    post.excerpt
                );
                assert_eq!(vec!["UI", "Design"], post.tags);
            }
            other => panic!("expected detail, got {:?}", other),
        }
    }

    #[test]
    fn test_every_post_has_a_detail_view() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        for post in store.all() {
            assert_eq!(
                Resolution::View(ViewState::DetailFound(post)),
                resolver.resolve(&route::detail_path(post.id))
            );
        }
    }

    #[test]
    fn test_detail_not_found() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        for path in &["/blogs/999", "/blogs/0", "/blogs/abc", "/blogs/02", "/blogs/-1"] {
            assert_eq!(
                Resolution::View(ViewState::DetailNotFound),
                resolver.resolve(path),
                "path: {}",
                path
            );
        }
    }

    #[test]
    fn test_unknown_paths_redirect_home() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        for path in &["/nonsense", "/blogs/2/edit", "/Blogs", "/about/blogs", "/index.html"] {
            assert_eq!(redirect_home(), resolver.resolve(path), "path: {}", path);
        }
    }

    #[test]
    fn test_normalization() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        assert_eq!(resolver.resolve("/blogs"), resolver.resolve("/blogs/"));
        assert_eq!(resolver.resolve("/blogs/3"), resolver.resolve("//blogs//3?x=1#y"));
    }

    #[test]
    fn test_resolve_url() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        let links = Links::new(Url::parse("https://example.org/").unwrap());
        let url = Url::parse("https://example.org/blogs/4?ref=feed").unwrap();
        assert_eq!(Some(resolver.resolve("/blogs/4")), resolver.resolve_url(&links, &url));
    }

    #[test]
    fn test_resolve_url_under_prefix() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        let links = Links::new(Url::parse("https://example.org/myblog").unwrap());
        let resolve = |url: &str| resolver.resolve_url(&links, &Url::parse(url).unwrap());

        assert!(matches!(
            resolve("https://example.org/myblog/blogs/2"),
            Some(Resolution::View(ViewState::DetailFound(p))) if p.id.get() == 2
        ));
        assert_eq!(
            Some(Resolution::View(ViewState::Home)),
            resolve("https://example.org/myblog")
        );
        assert_eq!(Some(redirect_home()), resolve("https://example.org/myblog/nonsense"));
        assert_eq!(None, resolve("https://example.org/blogs/2"));
    }

    #[test]
    fn test_fallback() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        let fallback = resolver.fallback();
        assert_eq!(Some(ViewState::DetailNotFound), fallback.view);
        assert_eq!(vec![Template::parse("/blogs/:id").unwrap()], fallback.templates);
        assert_eq!(redirect_home(), Resolution::Redirect(fallback.redirect));
    }

    #[test]
    fn test_idempotent() {
        let store = PostStore::seeded();
        let resolver = Resolver::new(&store);
        for path in &["/", "/blogs", "/blogs/1", "/blogs/999", "/nonsense"] {
            assert_eq!(resolver.resolve(path), resolver.resolve(path));
        }
    }

    #[test]
    fn test_custom_catalog() {
        let store = crate::catalog::from_reader(
            "- {id: 42, title: Answer, author: D, date: 'Jan 1, 2025', excerpt: E}\n".as_bytes(),
        )
        .unwrap();
        let resolver = Resolver::new(&store);
        assert!(matches!(
            resolver.resolve("/blogs/42"),
            Resolution::View(ViewState::DetailFound(p)) if p.title == "Answer"
        ));
        assert_eq!(
            Resolution::View(ViewState::DetailNotFound),
            resolver.resolve("/blogs/2")
        );
    }
}
