//! The rendering collaborator: turns a [`Resolution`] into an HTML document.
//! The [`Renderer`] only switches on the variant it's handed; it never
//! inspects paths or makes routing decisions of its own.

use crate::links::Links;
use crate::theme::Theme;
use crate::value;
use crate::view::{Fallback, Redirect, Resolution, ViewState};
use gtmpl::{Context, Template, Value};
use std::fmt;

pub struct Renderer<'a> {
    pub theme: &'a Theme,
    pub links: &'a Links,

    /// The site title, shown in the navbar and page titles.
    pub title: &'a str,
}

impl Renderer<'_> {
    /// Renders a resolution: a view page, or the redirect page for
    /// [`Resolution::Redirect`].
    pub fn render(&self, resolution: &Resolution) -> Result<String> {
        match resolution {
            Resolution::View(view) => self.render_view(view),
            Resolution::Redirect(redirect) => self.render_redirect(redirect),
        }
    }

    pub fn render_view(&self, view: &ViewState) -> Result<String> {
        self.render_view_with_script(view, String::new())
    }

    /// Renders the document a static host serves for paths with no file of
    /// their own. It shows the fallback view, and a script in its head sends
    /// any path that doesn't match one of the fallback's templates on to the
    /// redirect target.
    pub fn render_fallback(&self, fallback: &Fallback) -> Result<String> {
        let view = match &fallback.view {
            Some(view) => view,
            None => return self.render_redirect(&fallback.redirect),
        };
        let target = self.links.url(&fallback.redirect.to)?;
        let patterns: Vec<String> = fallback
            .templates
            .iter()
            .map(|t| format!("\"{}\"", script_string(&t.pattern())))
            .collect();
        let script = format!(
            "(function(){{var p=location.pathname,r=\"{root}\";\
             if(p.indexOf(r)===0){{p=\"/\"+p.slice(r.length);}}\
             p=p.replace(/\\/+/g,\"/\");\
             if(p.length>1&&p.charAt(p.length-1)===\"/\"){{p=p.slice(0,-1);}}\
             var s=[{patterns}];\
             for(var i=0;i<s.length;i++){{if(new RegExp(s[i]).test(p)){{return;}}}}\
             location.replace(\"{target}\");}})();",
            root = script_string(self.links.root().path()),
            patterns = patterns.join(","),
            target = script_string(target.as_str()),
        );
        self.render_view_with_script(view, script)
    }

    // `head_script` is inserted verbatim into a `<script>` element by the
    // base template; an empty script leaves the element out.
    fn render_view_with_script(&self, view: &ViewState, head_script: String) -> Result<String> {
        let site = value::site(self.title, self.links)?;
        let (template, page_title, extra) = match view {
            ViewState::Home => (&self.theme.home, self.title.to_owned(), vec![]),
            ViewState::List(posts) => (
                &self.theme.blogs,
                format!("Latest Blogs · {}", self.title),
                vec![(
                    "posts",
                    Value::Array(
                        posts
                            .iter()
                            .map(|p| value::post(p, self.links))
                            .collect::<std::result::Result<_, _>>()?,
                    ),
                )],
            ),
            ViewState::DetailFound(post) => (
                &self.theme.post,
                format!("{} · {}", post.title, self.title),
                vec![("post", value::post(post, self.links)?)],
            ),
            ViewState::DetailNotFound => (
                &self.theme.not_found,
                format!("Post not found · {}", self.title),
                vec![],
            ),
        };

        let mut pairs = vec![
            ("site", site),
            ("page_title", value::text(&page_title)),
            ("head_script", Value::String(head_script)),
        ];
        pairs.extend(extra);
        execute(template, value::object(pairs))
    }

    /// Renders a page that sends the browser to the redirect target,
    /// replacing the current history entry rather than adding one.
    pub fn render_redirect(&self, redirect: &Redirect) -> Result<String> {
        let target = self.links.url(&redirect.to)?;
        execute(
            &self.theme.redirect,
            value::object(vec![
                ("target", value::href(&target)),
                ("target_script", Value::String(script_string(target.as_str()))),
            ]),
        )
    }
}

// Escapes text for a double-quoted JavaScript string inside `<script>`.
fn script_string(text: &str) -> String {
    html_escape::encode_script_double_quoted_text(text).into_owned()
}

fn execute(template: &Template, value: Value) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();
    template.execute(&mut out, &Context::from(value)?)?;
    String::from_utf8(out).map_err(|err| Error::Template(err.to_string()))
}

type Result<T> = std::result::Result<T, Error>;

/// Represents an error rendering a page.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned when a link can't be built from the site root.
    UrlParse(url::ParseError),
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::UrlParse(err) => Some(err),
        }
    }
}
