mod config;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use config::MergeConfig;
use pkgmerge_core::{find_manifests, load_sources, merge_sources, render_document, DEFAULT_MANIFEST_FILE};

/// Merge every package.xml found under SOURCE into a single package.xml.
///
/// The merged package takes the greatest version among the sources and
/// lists metadata types and members alphabetically. It is written to
/// STDOUT unless --output is given.
#[derive(Parser, Debug)]
#[command(name = "pkgmerge", version)]
struct Args {
    /// Make the program more verbose (-vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory to write the merged package to
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Name of the manifest files to collect (and of the written file)
    #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
    file_name: String,

    /// Directory tree to collect manifests from
    #[arg(value_name = "SOURCE")]
    source: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = MergeConfig::resolve(&args.source, args.output.as_deref(), &args.file_name)?;

    let paths = find_manifests(&config.source, &config.file_name)?;
    if paths.is_empty() {
        info!(
            "No {} files found in tree rooted at {}",
            config.file_name,
            config.source.display()
        );
        return Ok(());
    }

    let sources = load_sources(&paths);
    let merged = merge_sources(&sources)
        .with_context(|| format!("nothing to merge under {}", config.source.display()))?;
    let rendered = render_document(&merged).context("failed to render merged package")?;

    if let Some(written) = output::emit(&rendered, &config)? {
        info!("{} written to {}", config.file_name, written.display());
    }

    Ok(())
}
