//! The library code for `myblog`, a small blog whose pages are selected by
//! route matching over a fixed catalog of posts. The architecture breaks down
//! into three layers:
//!
//! 1. The catalog ([`crate::catalog`], [`crate::store`]): an immutable,
//!    ordered sequence of [`crate::post::Post`]s with lookup by id.
//! 2. View resolution ([`crate::route`], [`crate::view`]): a pure mapping
//!    from a requested path to a [`crate::view::Resolution`], either one of
//!    the four views (home, list, detail, not-found) or a history-replacing
//!    redirect to `/`. [`crate::history`] drives the resolver the way a
//!    browser's back/forward stack would.
//! 3. Output ([`crate::render`], [`crate::write`], [`crate::build`]): the
//!    rendering collaborator turns resolutions into HTML with gtmpl templates
//!    ([`crate::theme`]), and the builder writes every reachable route, a
//!    fallback redirect page, and an Atom feed ([`crate::feed`]) to disk.
//!
//! Only the resolver makes routing decisions. The renderer switches on the
//! variant it's given, and the builder asks the resolver what each path shows.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod history;
pub mod links;
pub mod post;
pub mod render;
pub mod route;
pub mod store;
pub mod theme;
pub mod value;
pub mod view;
pub mod write;
