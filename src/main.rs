use anyhow::Result;
use clap::{crate_version, App, Arg};
use feedsmith::build::build_feed_file;
use feedsmith::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("feedsmith")
        .version(crate_version!())
        .about("Builds an RSS or Atom feed from a directory of Markdown posts")
        .arg(
            Arg::with_name("project")
                .help("Project directory (or any directory below it)")
                .index(1)
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("_output")
                .help("Output directory"),
        )
        .arg(
            Arg::with_name("sequential")
                .long("sequential")
                .help("Build feed items on a single thread"),
        )
        .get_matches();

    // Both arguments have default values.
    let project = std::fs::canonicalize(matches.value_of("project").unwrap_or("."))?;
    let output = Path::new(matches.value_of("output").unwrap_or("_output"));

    let mut config = Config::from_directory(&project, output)?;
    if matches.is_present("sequential") {
        config.parallel = false;
    }

    build_feed_file(&config)?;
    Ok(())
}
