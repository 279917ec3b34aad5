//! Defines the [`Theme`]: one parsed gtmpl template per kind of page. The
//! built-in theme is compiled into the binary; a theme directory can
//! override any of its templates through a `theme.yaml` file:
//!
//! ```yaml
//! base_template: [base.html]
//! post_template: [post.html]
//! ```
//!
//! Each page template is the concatenation of the base template files and
//! the page's own files, so the base files can `define` shared pieces (the
//! navbar, the document head) that the page templates invoke. A custom base
//! must define `head` and `navbar` if any built-in page template is still in
//! use, since those pages invoke both; loading fails otherwise.

use gtmpl::Template;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

const BASE: &str = r#"{{define "head"}}<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{.page_title}}</title>
<style>
body{margin:0;font-family:system-ui,sans-serif;background:#f9fafb;color:#111827}
.navbar{background:#fff;box-shadow:0 1px 2px rgba(0,0,0,.05);position:sticky;top:0}
.navbar .container{max-width:72rem;margin:0 auto;padding:.75rem 1rem;display:flex;justify-content:space-between}
.brand{font-weight:700;color:#2563eb;text-decoration:none}
nav a{margin-left:1rem;color:inherit;text-decoration:none}
main{max-width:72rem;margin:0 auto;padding:1.5rem}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}
.card{background:#fff;border:1px solid #f3f4f6;border-radius:.75rem;overflow:hidden}
.card-image{background:#f3f4f6;height:10rem;display:flex;align-items:center;justify-content:center;color:#6b7280}
.card-body{padding:1.25rem}
.meta{color:#6b7280;font-size:.875rem}
.tag{background:#eff6ff;color:#2563eb;font-size:.75rem;padding:.25rem .5rem;border-radius:.375rem;margin-right:.5rem}
.card-footer{display:flex;justify-content:space-between;align-items:center}
</style>
{{if .head_script}}<script>{{.head_script}}</script>
{{end}}</head>{{end}}{{define "navbar"}}<header class="navbar"><div class="container"><a class="brand" href="{{.home}}">{{.title}}</a><nav><a href="{{.home}}">Home</a><a href="{{.blogs}}">Blogs</a></nav></div></header>{{end}}"#;

const HOME: &str = r#"{{template "head" .}}
<body>
{{template "navbar" .site}}
<main class="home">
<h1>Welcome to {{.site.title}}</h1>
<p>A simple blog with routing.</p>
<a class="button" href="{{.site.blogs}}">Go to Blogs &rarr;</a>
</main>
</body>
</html>
"#;

const BLOGS: &str = r#"{{template "head" .}}
<body>
{{template "navbar" .site}}
<main class="blogs">
<h1>Latest Blogs</h1>
<p>Explore the latest articles from our writers.</p>
<section class="grid">
{{range .posts}}<article class="card">
<div class="card-image">Image</div>
<div class="card-body">
<h3>{{.title}}</h3>
<div class="meta">{{.author}} &middot; {{.date}}</div>
<p>{{.excerpt}}</p>
<div class="card-footer">
<div class="tags">{{range .tags}}<span class="tag">{{.}}</span>{{end}}</div>
<a href="{{.url}}">Read &rarr;</a>
</div>
</div>
</article>
{{end}}</section>
</main>
</body>
</html>
"#;

const POST: &str = r#"{{template "head" .}}
<body>
{{template "navbar" .site}}
<main class="post">
<h1>{{.post.title}}</h1>
<div class="meta">{{.post.author}} &middot; {{.post.date}}</div>
<p>{{.post.excerpt}}</p>
<div class="tags">{{range .post.tags}}<span class="tag">{{.}}</span>{{end}}</div>
<p>This is a demo blog post. You can replace this text with full content from your database or Markdown file.</p>
<a href="{{.site.blogs}}">&larr; Back to blogs</a>
</main>
</body>
</html>
"#;

const NOT_FOUND: &str = r#"{{template "head" .}}
<body>
{{template "navbar" .site}}
<main class="not-found">
<h2>Post not found</h2>
</main>
</body>
</html>
"#;

const REDIRECT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Redirecting&hellip;</title>
<meta http-equiv="refresh" content="0; url={{.target}}">
<script>window.location.replace("{{.target_script}}");</script>
</head>
<body>
<p>Redirecting to <a href="{{.target}}">{{.target}}</a>&hellip;</p>
</body>
</html>
"#;

/// The parsed templates for every kind of page.
pub struct Theme {
    pub home: Template,
    pub blogs: Template,
    pub post: Template,
    pub not_found: Template,
    pub redirect: Template,
}

/// The `theme.yaml` file. Every key lists template files relative to the
/// theme directory; missing keys fall back to the built-in templates.
#[derive(Deserialize)]
struct ThemeFile {
    #[serde(default)]
    base_template: Vec<PathBuf>,
    #[serde(default)]
    home_template: Vec<PathBuf>,
    #[serde(default)]
    blogs_template: Vec<PathBuf>,
    #[serde(default)]
    post_template: Vec<PathBuf>,
    #[serde(default)]
    not_found_template: Vec<PathBuf>,
    #[serde(default)]
    redirect_template: Vec<PathBuf>,
}

impl Theme {
    /// Parses the built-in theme.
    pub fn builtin() -> Result<Theme> {
        Theme::from_sources(&[BASE], &ThemeSources::default())
    }

    /// Loads a theme from `{dir}/theme.yaml`.
    pub fn from_directory(dir: &Path) -> Result<Theme> {
        let path = dir.join("theme.yaml");
        let file = File::open(&path).map_err(|err| Error::OpenTemplateFile {
            path: path.clone(),
            err,
        })?;
        let theme_file: ThemeFile = serde_yaml::from_reader(file)?;

        let read_all = |files: &[PathBuf]| -> Result<Option<String>> {
            match files.is_empty() {
                true => Ok(None),
                false => read_templates(files.iter().map(|f| dir.join(f))).map(Some),
            }
        };

        let base = read_all(&theme_file.base_template)?;
        let sources = ThemeSources {
            home: read_all(&theme_file.home_template)?,
            blogs: read_all(&theme_file.blogs_template)?,
            post: read_all(&theme_file.post_template)?,
            not_found: read_all(&theme_file.not_found_template)?,
            redirect: read_all(&theme_file.redirect_template)?,
        };
        match &base {
            Some(base) => {
                check_base_defines(base, &sources)?;
                Theme::from_sources(&[base.as_str()], &sources)
            }
            None => Theme::from_sources(&[BASE], &sources),
        }
    }

    fn from_sources(base: &[&str], sources: &ThemeSources) -> Result<Theme> {
        let page = |name: &'static str, source: &Option<String>, default: &str| {
            parse_template(name, base, source.as_deref().unwrap_or(default))
        };
        Ok(Theme {
            home: page("home", &sources.home, HOME)?,
            blogs: page("blogs", &sources.blogs, BLOGS)?,
            post: page("post", &sources.post, POST)?,
            not_found: page("not_found", &sources.not_found, NOT_FOUND)?,
            redirect: page("redirect", &sources.redirect, REDIRECT)?,
        })
    }
}

/// Per-page template text read from a theme directory; `None` means "use
/// the built-in template".
#[derive(Default)]
struct ThemeSources {
    home: Option<String>,
    blogs: Option<String>,
    post: Option<String>,
    not_found: Option<String>,
    redirect: Option<String>,
}

/// The templates the built-in page templates (all but the redirect page)
/// invoke from the base.
const BASE_DEFINES: [&str; 2] = ["head", "navbar"];

// Fails if a built-in page template would be parsed with a custom base that
// lacks one of the `define`s it invokes.
fn check_base_defines(base: &str, sources: &ThemeSources) -> Result<()> {
    let builtin_pages = [
        ("home", &sources.home),
        ("blogs", &sources.blogs),
        ("post", &sources.post),
        ("not_found", &sources.not_found),
    ];
    for (page, source) in builtin_pages.iter() {
        if source.is_some() {
            continue;
        }
        for define in BASE_DEFINES.iter() {
            if !defines(base, define) {
                return Err(Error::MissingDefine {
                    page: *page,
                    define: *define,
                });
            }
        }
    }
    Ok(())
}

// Reports whether `source` contains `{{define "name"}}`, allowing the
// whitespace and trim markers gtmpl accepts inside the action.
fn defines(source: &str, name: &str) -> bool {
    source.split("{{").skip(1).any(|action| {
        let action = action.trim_start_matches('-').trim_start();
        match action.strip_prefix("define") {
            Some(rest) => rest
                .trim_start()
                .strip_prefix('"')
                .and_then(|rest| rest.strip_prefix(name))
                .map_or(false, |rest| rest.starts_with('"')),
            None => false,
        }
    })
}

// Loads the template file contents and joins them with a space.
fn read_templates(files: impl Iterator<Item = PathBuf>) -> Result<String> {
    use std::io::Read;
    let mut contents = String::new();
    for path in files {
        File::open(&path)
            .map_err(|err| Error::OpenTemplateFile {
                path: path.clone(),
                err,
            })?
            .read_to_string(&mut contents)
            .map_err(|err| Error::OpenTemplateFile { path, err })?;
        contents.push(' ');
    }
    Ok(contents)
}

// Appends the page source to the base sources and parses the result. The
// base holds only `define`s, so the page source is the main template.
fn parse_template(name: &'static str, base: &[&str], page: &str) -> Result<Template> {
    let mut contents: String = base.concat();
    contents.push_str(page);

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate { name, err })?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading a theme.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening or reading template files
    /// (including `theme.yaml`).
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned when `theme.yaml` isn't valid.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for errors parsing template files.
    ParseTemplate { name: &'static str, err: String },

    /// Returned when a custom base template lacks a `define` that a built-in
    /// page template invokes.
    MissingDefine {
        page: &'static str,
        define: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::ParseTemplate { name, err } => {
                write!(f, "Parsing {} template: {}", name, err)
            }
            Error::MissingDefine { page, define } => write!(
                f,
                "The base template doesn't define `{}`, which the built-in {} template needs",
                define, page
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::MissingDefine { .. } => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_parses() {
        assert!(Theme::builtin().is_ok());
    }

    #[test]
    fn test_from_directory_missing_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        match Theme::from_directory(dir.path()) {
            Err(Error::OpenTemplateFile { path, .. }) => {
                assert_eq!(dir.path().join("theme.yaml"), path)
            }
            Err(other) => panic!("expected open error, got {:?}", other),
            Ok(_) => panic!("expected open error, got a theme"),
        }
    }

    #[test]
    fn test_from_directory_missing_template_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("theme.yaml"), "post_template: [post.html]\n").unwrap();
        match Theme::from_directory(dir.path()) {
            Err(Error::OpenTemplateFile { path, .. }) => {
                assert_eq!(dir.path().join("post.html"), path)
            }
            Err(other) => panic!("expected open error, got {:?}", other),
            Ok(_) => panic!("expected open error, got a theme"),
        }
    }

    #[test]
    fn test_defines() {
        assert!(defines(BASE, "head"));
        assert!(defines(BASE, "navbar"));
        assert!(defines(r#"{{- define  "navbar" -}}x{{end}}"#, "navbar"));
        assert!(!defines(r#"{{define "navbar2"}}x{{end}}"#, "navbar"));
        assert!(!defines(r#"{{template "navbar" .}}"#, "navbar"));
    }

    #[test]
    fn test_custom_base_missing_define() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("theme.yaml"), "base_template: [base.html]\n").unwrap();
        fs::write(dir.path().join("base.html"), r#"{{define "head"}}<head></head>{{end}}"#)
            .unwrap();
        match Theme::from_directory(dir.path()) {
            Err(Error::MissingDefine { page, define }) => {
                assert_eq!("home", page);
                assert_eq!("navbar", define);
            }
            Err(other) => panic!("expected missing define, got {:?}", other),
            Ok(_) => panic!("expected missing define, got a theme"),
        }
    }

    #[test]
    fn test_custom_base_with_own_pages() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("theme.yaml"),
            "base_template: [base.html]\n\
             home_template: [page.html]\n\
             blogs_template: [page.html]\n\
             post_template: [page.html]\n\
             not_found_template: [page.html]\n",
        )
        .unwrap();
        fs::write(dir.path().join("base.html"), r#"{{define "title"}}T{{end}}"#).unwrap();
        fs::write(dir.path().join("page.html"), r#"{{template "title" .}}"#).unwrap();
        assert!(Theme::from_directory(dir.path()).is_ok());
    }

    #[test]
    fn test_from_directory_bad_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("theme.yaml"), "home_template: [home.html]\n").unwrap();
        fs::write(dir.path().join("home.html"), "{{if .site}}unclosed").unwrap();
        match Theme::from_directory(dir.path()) {
            Err(Error::ParseTemplate { name, .. }) => assert_eq!("home", name),
            Err(other) => panic!("expected parse error, got {:?}", other),
            Ok(_) => panic!("expected parse error, got a theme"),
        }
    }
}
