// Mux interactor - Orchestrates the remux use case over a batch of files

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::adapters::{LibavSink, LibavSource, LocalFsAdapter};
use crate::config_initialization::MuxConfig;
use crate::domain::model::SourceId;
use crate::engine::{remux, ProgressReporter, RemuxOptions, RemuxStats};
use crate::error::{RemuxError, RemuxResult, Severity};
use crate::ports::{ChoicePrompt, MediaSource};
use crate::streams::{DualSourceCoordinator, OutputStreamMap, SelectionPolicy};
use crate::utils::plural;
use crate::utils::time::format_elapsed;

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files accepted for processing
    pub total: usize,
    /// Files remuxed without error
    pub succeeded: usize,
    /// Inputs skipped before processing
    pub skipped: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total && self.skipped == 0
    }
}

/// Interactor for the mux use case
pub struct MuxInteractor<P: ChoicePrompt> {
    config: MuxConfig,
    policy: SelectionPolicy,
    prompt: P,
}

impl<P: ChoicePrompt> MuxInteractor<P> {
    pub fn new(config: MuxConfig, prompt: P) -> Self {
        let policy = config.selection_policy();
        Self { config, policy, prompt }
    }

    /// Collect inputs and remux them one after another
    pub fn execute(&mut self, inputs: &[PathBuf]) -> RemuxResult<BatchReport> {
        if self.config.manual_subs.is_some() && inputs.len() > 1 {
            return Err(RemuxError::BadArgs {
                message: "--subs can only be used with a single input file".to_string(),
            });
        }

        let output_folder = match &self.config.output_folder {
            Some(folder) => Some(LocalFsAdapter::create_output_folder(folder)?),
            None => None,
        };

        let collected = LocalFsAdapter::collect_inputs(inputs, output_folder.as_deref());
        let mut report = BatchReport {
            total: collected.files.len(),
            skipped: collected.skipped.len(),
            ..Default::default()
        };

        for skip in collected.skipped {
            warn!("{}", skip);
            if self.config.stop_on_first_error {
                return Err(skip);
            }
        }

        let started = Instant::now();
        for (n, file) in collected.files.iter().enumerate() {
            info!("[{}/{}] {}", n + 1, report.total, file.display());

            match self.process_file(file, output_folder.as_deref()) {
                Ok(true) => report.succeeded += 1,
                Ok(false) => {
                    if self.config.stop_on_first_error {
                        return Err(RemuxError::Aborted {
                            path: file.display().to_string(),
                        });
                    }
                }
                Err(e) => {
                    match e.severity() {
                        Severity::Advisory => warn!("{}: {}", file.display(), e),
                        _ => error!("{}: {}", file.display(), e),
                    }
                    if self.config.stop_on_first_error {
                        return Err(e);
                    }
                }
            }
        }

        info!(
            "processed {} of {} {} in {}",
            report.succeeded,
            report.total,
            plural("file", report.total),
            format_elapsed(started.elapsed())
        );
        Ok(report)
    }

    /// Remux one file. `Ok(false)` means the file was attempted but is reported as failed.
    pub fn process_file(&mut self, input: &Path, output_folder: Option<&Path>) -> RemuxResult<bool> {
        let mut primary = LibavSource::open(input)?;

        let mut secondary = match self.secondary_path(input) {
            Some(path) => {
                info!("using subtitles from '{}'", path.display());
                Some(LibavSource::open(&path)?)
            }
            None => None,
        };

        let selection = DualSourceCoordinator::new(&self.policy).coordinate(
            primary.streams(),
            secondary.as_ref().map(|s| s.streams()),
            &mut self.prompt,
        );

        let mut ok = true;
        for &kind in &selection.missing {
            error!("{}", RemuxError::MissingStreams { kind });
            ok = false;
        }

        if selection.is_empty() {
            error!("no streams selected; skipping '{}'", input.display());
            return Ok(false);
        }

        if self.config.dry_run {
            info!("dry run; not writing output");
            return Ok(ok);
        }

        if !selection.uses(SourceId::Secondary) {
            secondary = None;
        }
        let map = OutputStreamMap::new(&selection.ordered());
        let options = RemuxOptions {
            subtitle_delay: if secondary.is_some() { self.config.subtitle_delay } else { 0.0 },
        };

        let target = LocalFsAdapter::output_target(input, output_folder)?;
        LocalFsAdapter::prepare_output(&target, self.config.delete_existing_output)?;

        // staged next to the target; persisted only after the trailer is written
        let started = Instant::now();
        let staged = LocalFsAdapter::staging_file(target.path())?;
        let stats = self.write(&mut primary, secondary.as_mut(), &map, &options, staged.path())?;
        drop(primary);
        drop(secondary);
        LocalFsAdapter::persist(staged, target.path())?;

        info!(
            "wrote '{}' ({} {}) in {}",
            target.path().display(),
            stats.written,
            plural("packet", stats.written as usize),
            format_elapsed(started.elapsed())
        );
        Ok(ok)
    }

    fn write(
        &self,
        primary: &mut LibavSource,
        secondary: Option<&mut LibavSource>,
        map: &OutputStreamMap,
        options: &RemuxOptions,
        path: &Path,
    ) -> RemuxResult<RemuxStats> {
        let mut sink = LibavSink::create(path)?;
        let mut progress = ProgressReporter::new(self.config.show_progress);
        remux(primary, secondary, map, &mut sink, options, &mut progress)
    }

    /// `--subs` wins; otherwise look in the extra subtitles folder
    fn secondary_path(&self, input: &Path) -> Option<PathBuf> {
        if let Some(path) = &self.config.manual_subs {
            return Some(path.clone());
        }
        let folder = self.config.extra_subs_folder.as_deref()?;
        let found = LocalFsAdapter::find_subtitle_source(input, folder);
        if found.is_none() {
            warn!("no subtitle file for '{}' in '{}'", input.display(), folder.display());
        }
        found
    }
}
