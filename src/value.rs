//! Conversions from the blog's types into gtmpl [`Value`]s. Every display
//! string is HTML-escaped here, before it reaches a template, since gtmpl
//! doesn't escape on its own.

use crate::links::Links;
use crate::post::Post;
use gtmpl::Value;
use std::collections::HashMap;
use url::{ParseError, Url};

/// Builds a [`Value::Object`] from key/value pairs.
pub fn object(pairs: Vec<(&str, Value)>) -> Value {
    let mut m: HashMap<String, Value> = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        m.insert(key.to_owned(), value);
    }
    Value::Object(m)
}

/// Escapes a display string for use as element text.
pub fn text(s: &str) -> Value {
    Value::String(html_escape::encode_text(s).into_owned())
}

/// Escapes a URL for use inside a double-quoted attribute.
pub fn href(url: &Url) -> Value {
    Value::String(html_escape::encode_double_quoted_attribute(url.as_str()).into_owned())
}

/// The site-wide values every page receives under `site`: the site title and
/// the navigation links.
pub fn site(title: &str, links: &Links) -> Result<Value, ParseError> {
    Ok(object(vec![
        ("title", text(title)),
        ("home", href(&links.home()?)),
        ("blogs", href(&links.blogs()?)),
    ]))
}

/// Converts a [`Post`] into a [`Value::Object`] with fields `id`, `title`,
/// `author`, `date`, `excerpt`, `tags` (an array), and `url` (its detail
/// page).
pub fn post(post: &Post, links: &Links) -> Result<Value, ParseError> {
    Ok(object(vec![
        ("id", Value::String(post.id.to_string())),
        ("title", text(&post.title)),
        ("author", text(&post.author)),
        ("date", text(&post.date)),
        ("excerpt", text(&post.excerpt)),
        ("tags", Value::Array(post.tags.iter().map(|t| text(t)).collect())),
        ("url", href(&links.post(post.id)?)),
    ]))
}
