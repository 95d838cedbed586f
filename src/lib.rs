// src/lib.rs

pub mod cli;
pub mod collections;
pub mod config;
pub mod errors;
pub mod fs;
pub mod live;
pub mod logging;
pub mod track;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::live::{spawn_watcher, LiveEvent};
use crate::track::paths::join_rel;
use crate::track::{FileTracker, Rule, RuleSet, TrackerContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - rule and callback registration
/// - the initial load (data directory first, then the project root)
/// - (optional) file watcher
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let ctx = TrackerContext {
        source_dir: cfg.default_section().source_dir.clone(),
        data_dir: cfg.default_section().data_dir.clone(),
    };
    let rules = if cfg.default_section().builtin_rules {
        RuleSet::builtin()?
    } else {
        RuleSet::new()
    };

    let mut tracker = FileTracker::with_rules(root.clone(), Arc::clone(&fs), ctx, rules);

    // The tracker is not ready yet, so these only take effect at startup.
    for (name, pattern) in cfg.watch_rules() {
        tracker.watch(name, Rule::Pattern(pattern.clone()))?;
    }
    for (name, pattern) in cfg.ignore_rules() {
        tracker.ignore(name, Rule::Pattern(pattern.clone()))?;
    }

    tracker.on_change(None, |path| {
        info!(path = %path, "file change");
        Ok(())
    });
    tracker.on_delete(None, |path| {
        info!(path = %path, "file delete");
        Ok(())
    });

    tracker.startup()?;

    if args.once {
        let mut tracked: Vec<&str> = tracker.known_paths().collect();
        tracked.sort_unstable();
        for path in tracked {
            println!("{path}");
        }
        return Ok(());
    }

    // Live events + Ctrl-C are serialized onto one channel, so the tracker
    // only ever sees one call at a time.
    let (live_tx, mut live_rx) = mpsc::channel::<LiveEvent>(64);

    let _watcher_handle = spawn_watcher(root.clone(), live_tx.clone())?;

    {
        let tx = live_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(LiveEvent::ShutdownRequested).await;
        });
    }

    watch_loop(&mut tracker, fs.as_ref(), &root, &mut live_rx).await
}

/// Consume live events until shutdown, applying each to the tracker.
async fn watch_loop(
    tracker: &mut FileTracker,
    fs: &dyn FileSystem,
    root: &Path,
    live_rx: &mut mpsc::Receiver<LiveEvent>,
) -> Result<()> {
    while let Some(event) = live_rx.recv().await {
        debug!(?event, "live event");
        match event {
            LiveEvent::PathChanged(rel) => {
                let abs = join_rel(root, &rel);
                if fs.is_dir(&abs) {
                    // New or touched directory: pick up files we don't know
                    // about yet. Deletions are left to file-level events.
                    tracker.find_new(&rel)?;
                } else if tracker.is_tracked(&rel) {
                    tracker.did_change(&rel)?;
                }
            }
            LiveEvent::PathRemoved(rel) => {
                if tracker.exists(&rel) {
                    tracker.did_delete(&rel)?;
                }
            }
            LiveEvent::ShutdownRequested => {
                info!("shutdown requested, stopping watch loop");
                break;
            }
        }
    }

    Ok(())
}

/// Figure out a sensible project root for tracking.
///
/// - If the config path has a non-empty parent (e.g. "site/Sitewatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Sitewatch.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the directory layout and effective rules.
fn print_dry_run(cfg: &ConfigFile) {
    println!("sitewatch dry-run");
    println!("  default.source_dir = {}", cfg.default_section().source_dir);
    println!("  default.data_dir = {}", cfg.default_section().data_dir);
    println!(
        "  default.builtin_rules = {}",
        cfg.default_section().builtin_rules
    );
    println!();

    println!("watch rules ({}):", cfg.watch_rules().len());
    for (name, pattern) in cfg.watch_rules() {
        println!("  - {name}: {}", pattern.as_str());
    }

    println!("ignore rules ({}):", cfg.ignore_rules().len());
    for (name, pattern) in cfg.ignore_rules() {
        println!("  - {name}: {}", pattern.as_str());
    }

    debug!("dry-run complete (no scanning)");
}
