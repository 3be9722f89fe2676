//! Build command implementation
//!
//! Packages an addon into a zip archive in the working directory. The target
//! may be a local directory (defaulting to the current one) or a VCS URL, in
//! which case the addon itself is checked out through the cache first. On
//! any failure the partially-written archive is removed before the error is
//! reported.

use std::env;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use addon_packer::builder::Builder;
use addon_packer::cache::Cache;
use addon_packer::vcs;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Addon to build: a local directory (default: current directory) or a
    /// VCS URL to check out
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Revision tag to check out when TARGET is a VCS URL
    #[arg(value_name = "TAG")]
    pub tag: Option<String>,

    /// Output archive filename
    #[arg(short, long, value_name = "FILE", default_value = "addon.zip")]
    pub output: PathBuf,

    /// Cache root directory for dependency checkouts
    #[arg(long, value_name = "PATH", env = "ADDON_PACKER_CACHE")]
    pub cache_root: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut cache = Cache::open(args.cache_root.clone());

    let tag = args.tag.as_deref().unwrap_or("");
    let (target_dir, fallback_name) = locate_target(args.target.as_deref(), tag, &mut cache)?;

    let output_name = args
        .output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "addon.zip".to_string());

    let file = File::create(&args.output)
        .with_context(|| format!("unable to create output file {}", args.output.display()))?;

    let result = Builder::new(&target_dir, &fallback_name, &output_name, &mut cache, file)
        .and_then(|builder| {
            let package_as = builder.manifest().package_as.clone();
            builder.build()?;
            Ok(package_as)
        });

    let package_as = match result {
        Ok(package_as) => package_as,
        Err(e) => {
            // A partial archive is invalid output; don't leave one behind.
            let _ = fs::remove_file(&args.output);
            return Err(e.into());
        }
    };

    if !args.quiet {
        println!(
            "Packaged {} into {} in {:.2}s",
            package_as,
            args.output.display(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Resolves the build target to a local directory and a fallback package
/// name.
fn locate_target(
    target: Option<&str>,
    tag: &str,
    cache: &mut Cache,
) -> Result<(PathBuf, String)> {
    match target {
        // No target, or just '.' - use the current working directory.
        None | Some("") | Some(".") => {
            let cwd = env::current_dir().context("unable to determine working directory")?;
            let name = dir_name(&cwd);
            Ok((cwd, name))
        }
        Some(target) if Path::new(target).is_dir() => {
            let dir = PathBuf::from(target);
            let name = dir_name(&dir);
            Ok((dir, name))
        }
        // Anything else is assumed to be a VCS url.
        Some(url) => {
            let dir = vcs::checkout(url, tag, cache)
                .context("unable to check out addon from VCS")?;
            Ok((dir, url_name(url)))
        }
    }
}

/// Package name fallback for a VCS url: the last path segment, minus any
/// `.git` suffix.
fn url_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .trim_end_matches(".git")
        .to_string()
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "addon".to_string())
}
