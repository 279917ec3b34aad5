use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use myblog::build::build_site;
use myblog::config::{Config, Error as ConfigError};
use myblog::links::Links;
use myblog::view::{HistoryMode, Resolution, Resolver, ViewState};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let project = Arg::with_name("project")
        .long("project")
        .short("p")
        .takes_value(true)
        .help("Directory to search (with its parents) for myblog.yaml")
        .default_value(".");

    let matches = App::new("myblog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A small blog with route-driven views")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Renders every route of the blog into a static site")
                .arg(project.clone())
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("Output directory")
                        .default_value("_output"),
                ),
        )
        .subcommand(
            SubCommand::with_name("resolve")
                .about("Prints what each path resolves to")
                .arg(project)
                .arg(
                    Arg::with_name("paths")
                        .required(true)
                        .multiple(true)
                        .help("Route paths (e.g. /blogs/2) or URLs under the site root"),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        ("build", Some(matches)) => build(matches),
        ("resolve", Some(matches)) => resolve(matches),
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  caused by: {}", err);
            source = err.source();
        }
        exit(1);
    }
}

type Result<T> = std::result::Result<T, Box<dyn Error>>;

// Loads `myblog.yaml`, falling back to the defaults when there isn't one.
fn load_config(matches: &ArgMatches, output: &Path) -> Result<Config> {
    let project = PathBuf::from(matches.value_of("project").unwrap_or("."));
    let project = project.canonicalize().unwrap_or(project);
    match Config::from_directory(&project, output) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(dir)) => {
            warn!(dir = %dir.display(), "no project file found; using defaults");
            Ok(Config::default_with_output(output)?)
        }
        Err(e) => Err(e.into()),
    }
}

fn build(matches: &ArgMatches) -> Result<()> {
    let output = PathBuf::from(matches.value_of("output").unwrap_or("_output"));
    let config = load_config(matches, &output)?;
    let report = build_site(&config)?;
    info!(posts = report.posts, pages = report.pages, "done");
    println!(
        "Built {} pages for {} posts in {}",
        report.pages,
        report.posts,
        output.display()
    );
    Ok(())
}

fn resolve(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches, Path::new("_output"))?;
    let store = myblog::build::load_store(&config)?;
    let resolver = Resolver::new(&store);
    let links = Links::new(config.site_root.clone());

    for arg in matches.values_of("paths").into_iter().flatten() {
        let resolution = match Url::parse(arg) {
            Ok(url) => match resolver.resolve_url(&links, &url) {
                Some(resolution) => resolution,
                None => {
                    println!("{} => outside {}", arg, links.root());
                    continue;
                }
            },
            Err(_) => resolver.resolve(arg),
        };
        println!("{} => {}", arg, describe(&resolution));
    }
    Ok(())
}

fn describe(resolution: &Resolution) -> String {
    match resolution {
        Resolution::View(ViewState::Home) => "home".to_owned(),
        Resolution::View(ViewState::List(posts)) => format!("list of {} posts", posts.len()),
        Resolution::View(ViewState::DetailFound(post)) => {
            format!("detail #{} {:?}", post.id, post.title)
        }
        Resolution::View(ViewState::DetailNotFound) => "post not found".to_owned(),
        Resolution::Redirect(redirect) => format!(
            "redirect {} ({})",
            redirect.to,
            match redirect.mode {
                HistoryMode::Push => "push",
                HistoryMode::Replace => "replace",
            }
        ),
    }
}
