use clap::{ArgAction, Parser, Subcommand};
use dir_index::{config::ListingConfig, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing::{Level, debug};

#[derive(Parser, Debug)]
#[command(name = "dir-index")]
#[command(about = "Generate static index.html listings for a directory tree")]
#[command(long_about = "\
Generate static index.html listings for a directory tree

Every directory below the root gets an index.html listing its children,
newest first. Directories are dated by their oldest child, aboutme.html is
always listed first, and links are root-relative.

Never listed and never descended into:

  CNAME  node_modules  package.json  package-lock.json  index.html
  .git  .gitignore  .gitmodules  .nojekyll  listing.html

Regenerating a listing keeps the previous index.html timestamps.")]
#[command(version)]
struct Cli {
    /// Root of the tree; listing titles and links are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write index.html into the root and every non-excluded directory below it
    Generate,
    /// Print the listing of a single directory without writing anything
    Scan {
        /// Directory to list (defaults to the root)
        dir: Option<PathBuf>,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the built-in listing configuration as JSON
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_tracing(&cli);
    debug!("Parsed CLI arguments: {cli:?}");

    let config = ListingConfig::default();
    config.validate()?;

    match cli.command {
        Command::Generate => {
            let root = std::fs::canonicalize(&cli.root)?;
            println!("==> Generating listings from {}", root.display());
            let report = generate::generate(&root, &config, output::print_generate_event)?;
            output::print_generate_summary(&report, &root);
        }
        Command::Scan { dir, json } => {
            let root = std::fs::canonicalize(&cli.root)?;
            let dir = match dir {
                Some(dir) => std::fs::canonicalize(dir)?,
                None => root.clone(),
            };
            let listing = scan::list_directory(&dir, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                output::print_scan_output(&listing, &scan_title(&root, &dir));
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Title for `dir`; directories outside the root are shown by full path.
fn scan_title(root: &Path, dir: &Path) -> String {
    if dir.starts_with(root) {
        generate::display_title(root, dir)
    } else {
        dir.display().to_string()
    }
}

fn setup_tracing(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}
