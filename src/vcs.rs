//! # Working-Copy Checkout
//!
//! Obtains local working copies of declared externals through the checkout
//! cache, using the system `git` and `svn` clients.
//!
//! This uses the system binaries rather than an in-process implementation,
//! which automatically handles:
//! - SSH keys from `~/.ssh/`
//! - Git credential helpers and personal access tokens
//! - Any authentication configured in `~/.gitconfig` / `~/.subversion`
//!
//! Hosts known to serve Subversion get `svn`; everything else gets `git`.
//! A fresh cache directory is populated with a full clone/checkout and, when
//! a tag is pinned, switched to that tag. An existing unpinned directory is
//! updated to the latest upstream revision; a pinned one is already at the
//! right revision and is left alone.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use url::Url;

use crate::cache::Cache;
use crate::error::{Error, Result};

/// Hosts served over Subversion rather than Git.
const SVN_HOSTS: [&str; 1] = ["repos.wowace.com"];

/// Checks out `url` at `tag` into a cache-managed directory and returns it.
///
/// An empty tag tracks the default branch/trunk. The literal tag `latest`
/// is reserved for newest-tag resolution, which is not implemented; it
/// currently takes the same path as an empty tag.
pub fn checkout(url: &str, tag: &str, cache: &mut Cache) -> Result<PathBuf> {
    info!("Checking out {}", url);
    let (dir, fresh) = cache.dir_for(url, tag)?;

    if is_svn_url(url) {
        checkout_svn(url, tag, &dir, fresh)?;
    } else {
        checkout_git(url, tag, &dir, fresh)?;
    }

    Ok(dir)
}

fn checkout_git(url: &str, tag: &str, dir: &Path, fresh: bool) -> Result<()> {
    if fresh {
        run(url, Command::new("git").arg("clone").arg(url).arg(dir))?;
        if let Some(pin) = pinned_tag(tag) {
            run(
                url,
                Command::new("git").current_dir(dir).args(["checkout", pin]),
            )?;
        }
    } else if pinned_tag(tag).is_none() {
        run(
            url,
            Command::new("git").current_dir(dir).args(["pull", "--ff-only"]),
        )?;
    }

    Ok(())
}

fn checkout_svn(url: &str, tag: &str, dir: &Path, fresh: bool) -> Result<()> {
    if fresh {
        run(url, Command::new("svn").arg("checkout").arg(url).arg(dir))?;
        if let Some(pin) = pinned_tag(tag) {
            run(
                url,
                Command::new("svn").current_dir(dir).args(["update", "-r", pin]),
            )?;
        }
    } else if pinned_tag(tag).is_none() {
        run(url, Command::new("svn").current_dir(dir).arg("update"))?;
    }

    Ok(())
}

/// The tag to switch a fresh working copy to, if any.
///
/// `latest` falls through to the trunk behavior until newest-tag resolution
/// exists.
fn pinned_tag(tag: &str) -> Option<&str> {
    if tag.is_empty() || tag == "latest" {
        None
    } else {
        Some(tag)
    }
}

fn is_svn_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| SVN_HOSTS.contains(&host)))
        .unwrap_or(false)
}

/// Runs a VCS command, surfacing a failure's stderr verbatim.
fn run(url: &str, command: &mut Command) -> Result<()> {
    let output = command.output().map_err(|e| Error::Checkout {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(Error::Checkout {
            url: url.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
