//! CLI route: precondition checks, then one pass or the periodic loop.

use super::output::format_report;
use super::parse::Cli;
use crate::config::MirrorConfig;
use crate::error::SyncError;
use crate::logging::Logger;
use crate::sync::Orchestrator;
use crate::tree::path::{canonical_root, roots_overlap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fold command-line flags over the loaded configuration
pub fn apply_cli_overrides(cli: &Cli, config: &mut MirrorConfig) {
    if let Some(ref source) = cli.source {
        config.roots.source = Some(source.clone());
    }
    if let Some(ref replica) = cli.replica {
        config.roots.replica = Some(replica.clone());
    }
    if let Some(interval) = cli.interval {
        config.sync.interval_secs = interval;
    }
    if cli.follow_symlinks {
        config.sync.follow_symlinks = true;
    }
    if let Some(ref file) = cli.log_file {
        config.logging.file = Some(file.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
    if cli.quiet {
        config.logging.console = false;
    }
}

/// Check roots before the first pass.
///
/// A missing source is fatal. A missing replica is created when `confirm` agrees.
/// Returns canonical roots, which must not overlap.
pub fn prepare_roots<F>(
    source: &Path,
    replica: &Path,
    logger: &dyn Logger,
    confirm: F,
) -> Result<(PathBuf, PathBuf), SyncError>
where
    F: FnOnce(&Path) -> bool,
{
    if !source.exists() {
        logger.critical(&format!(
            "Source folder '{}' does not exist. Please provide a valid path.",
            source.display()
        ));
        return Err(SyncError::SourceMissing(source.to_path_buf()));
    }
    if !source.is_dir() {
        logger.critical(&format!(
            "Source '{}' is not a folder.",
            source.display()
        ));
        return Err(SyncError::NotADirectory(source.to_path_buf()));
    }

    if !replica.exists() {
        logger.warning(&format!(
            "Replica folder '{}' does not exist.",
            replica.display()
        ));
        if !confirm(replica) {
            logger.critical(&format!(
                "Replica folder '{}' does not exist and was not created. Exiting.",
                replica.display()
            ));
            return Err(SyncError::ReplicaDeclined(replica.to_path_buf()));
        }
        if let Err(source) = fs::create_dir_all(replica) {
            logger.critical(&format!(
                "Failed to create replica folder '{}': {}",
                replica.display(),
                source
            ));
            return Err(SyncError::ReplicaCreate {
                path: replica.to_path_buf(),
                source,
            });
        }
        logger.info(&format!("Created replica folder: {}", replica.display()));
    } else if !replica.is_dir() {
        logger.critical(&format!(
            "Replica '{}' is not a folder.",
            replica.display()
        ));
        return Err(SyncError::NotADirectory(replica.to_path_buf()));
    }

    let source_root = canonical_root(source)?;
    let replica_root = canonical_root(replica)?;
    if roots_overlap(&source_root, &replica_root) {
        logger.critical(&format!(
            "Source '{}' and replica '{}' overlap; refusing to mirror a folder into itself.",
            source_root.display(),
            replica_root.display()
        ));
        return Err(SyncError::OverlappingRoots {
            source_root,
            replica_root,
        });
    }

    Ok((source_root, replica_root))
}

/// Ask on the terminal whether to create the replica (default yes).
///
/// Without a terminal the answer is no.
pub fn prompt_create_replica(path: &Path) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Do you want to create the replica folder '{}'?",
            path.display()
        ))
        .default(true)
        .interact()
        .unwrap_or(false)
}

/// Resolved run: roots plus settings
pub struct RunContext {
    config: MirrorConfig,
    once: bool,
    report_format: Option<String>,
    assume_yes: bool,
}

impl RunContext {
    pub fn new(cli: &Cli, config: MirrorConfig) -> Self {
        Self {
            config,
            once: cli.once,
            report_format: cli.report.clone(),
            assume_yes: cli.yes,
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Validate roots, then run one pass (`--once`) or loop until Ctrl-C.
    ///
    /// Returns text to print on stdout, if any.
    pub fn execute(&self, logger: &dyn Logger) -> Result<Option<String>, SyncError> {
        let (source, replica) = self.roots()?;
        let (source, replica) = if self.assume_yes {
            prepare_roots(&source, &replica, logger, |_| true)?
        } else {
            prepare_roots(&source, &replica, logger, prompt_create_replica)?
        };

        let orchestrator = Orchestrator::new(&self.config.sync, logger);

        if self.once {
            let report = orchestrator.run_once(&source, &replica)?;
            return match self.report_format.as_deref() {
                Some(format) => format_report(&report, format).map(Some),
                None => Ok(None),
            };
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(run_periodic(
            &orchestrator,
            &source,
            &replica,
            Duration::from_secs(self.config.sync.interval_secs),
            logger,
        ))?;
        Ok(None)
    }

    fn roots(&self) -> Result<(PathBuf, PathBuf), SyncError> {
        match (&self.config.roots.source, &self.config.roots.replica) {
            (Some(source), Some(replica)) => Ok((source.clone(), replica.clone())),
            _ => Err(SyncError::ConfigError(
                "Source and replica folders are required (arguments or [roots] in config)"
                    .to_string(),
            )),
        }
    }
}

/// Run a pass, sleep for `period`, repeat.
///
/// Ctrl-C received during a pass lets that pass finish, then stops the loop.
async fn run_periodic(
    orchestrator: &Orchestrator<'_>,
    source: &Path,
    replica: &Path,
    period: Duration,
    logger: &dyn Logger,
) -> Result<(), SyncError> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // First poll installs the handler, so a signal during the first pass is caught too
    tokio::select! {
        biased;
        signal = &mut shutdown => return stop(signal, logger),
        _ = std::future::ready(()) => {}
    }

    loop {
        orchestrator.run_once(source, replica)?;

        tokio::select! {
            biased;
            signal = &mut shutdown => return stop(signal, logger),
            _ = tokio::time::sleep(period) => {}
        }
    }
}

fn stop(signal: std::io::Result<()>, logger: &dyn Logger) -> Result<(), SyncError> {
    match signal {
        Ok(()) => logger.info("Shutdown requested; stopping synchronization"),
        Err(e) => logger.warning(&format!("Signal handler failed, stopping: {}", e)),
    }
    Ok(())
}
