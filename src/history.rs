//! A navigation history for driving the [`Resolver`] the way a browser
//! would: each navigation either pushes a new entry or, for redirects,
//! replaces the current one. Back and forward re-resolve the stored path.

use crate::route;
use crate::view::{HistoryMode, Resolution, Resolver, ViewState};
use tracing::{debug, warn};

/// How many redirects a single navigation may follow before giving up and
/// settling on the root view.
const MAX_REDIRECTS: usize = 8;

/// A back/forward stack of visited paths with a cursor on the current entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    /// Starts a history with a single entry.
    pub fn new(start: &str) -> History {
        History {
            entries: vec![start.to_owned()],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Appends an entry after the current one, discarding any forward
    /// entries.
    pub fn push(&mut self, path: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.to_owned());
        self.cursor += 1;
    }

    /// Overwrites the current entry.
    pub fn replace(&mut self, path: &str) {
        self.entries[self.cursor] = path.to_owned();
    }

    fn apply(&mut self, mode: HistoryMode, path: &str) {
        match mode {
            HistoryMode::Push => self.push(path),
            HistoryMode::Replace => self.replace(path),
        }
    }

    /// Moves the cursor one entry back. Returns `false` at the start.
    pub fn back(&mut self) -> bool {
        match self.cursor {
            0 => false,
            _ => {
                self.cursor -= 1;
                true
            }
        }
    }

    /// Moves the cursor one entry forward. Returns `false` at the end.
    pub fn forward(&mut self) -> bool {
        match self.cursor + 1 < self.entries.len() {
            true => {
                self.cursor += 1;
                true
            }
            false => false,
        }
    }
}

/// Applies [`Resolution`]s to a [`History`], following redirects, and hands
/// back the [`ViewState`] to render.
pub struct Navigator<'s> {
    resolver: Resolver<'s>,
    history: History,
}

impl<'s> Navigator<'s> {
    /// Creates a navigator whose history starts at the root path.
    pub fn new(resolver: Resolver<'s>) -> Navigator<'s> {
        Navigator {
            resolver,
            history: History::new(route::ROOT),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Navigates to `path`, pushing it onto the history. If it resolves to a
    /// redirect, the pushed entry is replaced by the redirect target, so the
    /// invalid path never remains in the history.
    pub fn navigate(&mut self, path: &str) -> ViewState<'s> {
        self.history.push(path);
        self.settle()
    }

    /// Steps back and re-resolves that entry. Returns `None` if there is no
    /// earlier entry.
    pub fn back(&mut self) -> Option<ViewState<'s>> {
        match self.history.back() {
            true => Some(self.settle()),
            false => None,
        }
    }

    /// Steps forward and re-resolves that entry. Returns `None` if there is
    /// no later entry.
    pub fn forward(&mut self) -> Option<ViewState<'s>> {
        match self.history.forward() {
            true => Some(self.settle()),
            false => None,
        }
    }

    /// Resolves the current entry, following redirects.
    fn settle(&mut self) -> ViewState<'s> {
        for _ in 0..MAX_REDIRECTS {
            match self.resolver.resolve(self.history.current()) {
                Resolution::View(view) => return view,
                Resolution::Redirect(redirect) => {
                    debug!(
                        from = %self.history.current(),
                        to = %redirect.to,
                        "following redirect"
                    );
                    self.history.apply(redirect.mode, &redirect.to);
                }
            }
        }
        warn!(
            path = %self.history.current(),
            "too many redirects; settling on {}",
            route::ROOT
        );
        self.history.replace(route::ROOT);
        ViewState::Home
    }
}
