use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use log::debug;

use depfetch::{checksum, ChecksumKind, Manifest, Processor, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "depfetch")]
#[command(about = "Download and unpack the dependencies declared in an XML manifest")]
#[command(disable_version_flag = true)]
struct Args {
    /// Path to the file (Default: "depend.xml")
    #[arg(value_name = "FILE", default_value = "depend.xml")]
    file: String,

    /// Generate MD5 hash of file
    #[arg(short = 'm', long)]
    md5: bool,

    /// Generate SHA1 hash of file
    #[arg(short = 's', long)]
    sha1: bool,

    /// Set path to proxy
    #[arg(short = 'p', long, value_name = "PROXY")]
    proxy: Option<String>,

    /// Cleanup previous downloaded dependencies
    #[arg(long)]
    clean: bool,

    /// Only download the dependencies to the cache
    #[arg(long)]
    download_only: bool,

    /// Removes the cache after extraction
    #[arg(long)]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    println!("Dependency Downloader - version {}\n", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", style("=== ERROR ===").red());
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let path = Path::new(&args.file);

    // checksum generation modes work on the positional file directly
    if args.md5 || args.sha1 {
        if !path.exists() {
            eprintln!("[ERR] Source file not found: {}\n", args.file);
            Args::command().print_help()?;
            return Ok(ExitCode::FAILURE);
        }

        if args.md5 {
            println!("MD5 Checksum for {}:", args.file);
            println!("  {}", checksum::hash_file(ChecksumKind::Md5, path)?);
        }
        if args.sha1 {
            println!("SHA1 Checksum for {}:", args.file);
            println!("  {}", checksum::hash_file(ChecksumKind::Sha1, path)?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !path.exists() {
        eprintln!("[ERR] Dependency file not found: {}\n", args.file);
        Args::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    }

    let proxy = args.proxy.clone().or_else(proxy_from_env);
    debug!("proxy setting: {proxy:?}");

    let manifest = Manifest::load(path)?;
    let processor = Processor::new(proxy.as_deref())?;
    processor
        .run(
            &manifest,
            &RunOptions {
                clean: args.clean,
                download_only: args.download_only,
                clear_cache: args.clear_cache,
            },
        )
        .await?;

    Ok(ExitCode::SUCCESS)
}

/// Default proxy from the environment, `http_proxy` before `HTTP_PROXY`.
fn proxy_from_env() -> Option<String> {
    std::env::var("http_proxy")
        .or_else(|_| std::env::var("HTTP_PROXY"))
        .ok()
        .filter(|value| !value.is_empty())
}
