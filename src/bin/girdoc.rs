//! Command-line interface for girdoc
//!
//! Usage:
//!   girdoc render --repository `<file>` [--config `<file>`] [--sections `<file>`] [--owner `<Ns.Name>`] `<doc-file>`
//!   girdoc tokens `<doc-file>`
//!   girdoc hierarchy --repository `<file>` [--config `<file>`] `<Ns.Type>`
//!
//! Diagnostics go to stderr; set `RUST_LOG=debug` for more.

use std::path::{Path, PathBuf};

use clap::{Arg, ArgMatches, Command};
use girdoc::markup::DocstringScanner;
use girdoc::{DocFormatter, Error, FormatterConfig, Repository, Result, SectionsIndex};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let repository = || {
        Arg::new("repository")
            .long("repository")
            .short('r')
            .help("YAML or JSON description of the namespace and its includes")
            .required(true)
    };
    let config = || {
        Arg::new("config")
            .long("config")
            .short('c')
            .help("YAML or JSON formatter configuration")
    };

    let matches = Command::new("girdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render documentation comment markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render a documentation comment")
                .arg(repository())
                .arg(config())
                .arg(
                    Arg::new("sections")
                        .long("sections")
                        .short('s')
                        .help("YAML or JSON sections ordering"),
                )
                .arg(
                    Arg::new("owner")
                        .long("owner")
                        .short('o')
                        .help("Qualified name of the documented entity, e.g. Gtk.Widget.show"),
                )
                .arg(
                    Arg::new("path")
                        .help("File holding the documentation comment")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the markup tokens of a documentation comment")
                .arg(
                    Arg::new("path")
                        .help("File holding the documentation comment")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("hierarchy")
                .about("Print the class hierarchy of a type")
                .arg(repository())
                .arg(config())
                .arg(
                    Arg::new("type")
                        .help("Qualified type name, e.g. Gtk.Widget")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("render", render_matches)) => handle_render_command(render_matches),
        Some(("tokens", tokens_matches)) => handle_tokens_command(tokens_matches),
        Some(("hierarchy", hierarchy_matches)) => handle_hierarchy_command(hierarchy_matches),
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn path_arg(matches: &ArgMatches, name: &str) -> Option<PathBuf> {
    matches.get_one::<String>(name).map(PathBuf::from)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(matches: &ArgMatches) -> Result<FormatterConfig> {
    match path_arg(matches, "config") {
        Some(path) => FormatterConfig::load(&path),
        None => Ok(FormatterConfig::default()),
    }
}

fn load_repository(matches: &ArgMatches) -> Result<Repository> {
    let path = path_arg(matches, "repository").unwrap_or_default();
    Repository::load(&path)
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches) -> Result<()> {
    let repo = load_repository(matches)?;
    let config = load_config(matches)?;
    let doc = read_file(&path_arg(matches, "path").unwrap_or_default())?;

    let mut formatter = DocFormatter::new(&repo, config)?;
    if let Some(path) = path_arg(matches, "sections") {
        formatter = formatter.with_sections(SectionsIndex::load(&path)?);
    }

    let owner = match matches.get_one::<String>("owner") {
        Some(name) => Some(
            repo.lookup_qualified(name)
                .ok_or_else(|| Error::UnknownEntity(name.clone()))?,
        ),
        None => None,
    };

    println!("{}", formatter.format(owner, Some(&doc)));
    Ok(())
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches) -> Result<()> {
    let doc = read_file(&path_arg(matches, "path").unwrap_or_default())?;
    let scanner = DocstringScanner::new()?;
    for token in scanner.scan(&doc) {
        println!("{:?} {:?}", token.markup, token.text);
    }
    Ok(())
}

/// Handle the hierarchy command
fn handle_hierarchy_command(matches: &ArgMatches) -> Result<()> {
    let repo = load_repository(matches)?;
    let config = load_config(matches)?;
    let name = matches
        .get_one::<String>("type")
        .cloned()
        .unwrap_or_default();
    let entity = repo
        .lookup_qualified(&name)
        .ok_or_else(|| Error::UnknownEntity(name.clone()))?;

    let formatter = DocFormatter::new(&repo, config)?;
    println!("{}", formatter.dump_class_hierarchy(entity));
    Ok(())
}
