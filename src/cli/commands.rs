//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::TerminalPrompt;
use crate::app::{InspectInteractor, MuxInteractor};
use crate::cli::args::{InspectArgs, MuxArgs};
use crate::config_initialization::{initialize_inspect_policy, initialize_mux_config};

/// Execute the mux command. Returns whether every input succeeded.
pub fn mux(config_path: Option<&Path>, args: MuxArgs) -> Result<bool> {
    let config = initialize_mux_config(config_path, &args).context("Failed to load configuration")?;

    if config.output_folder.is_none() && !config.dry_run {
        info!("no output folder given; files will be replaced in place");
    }

    let mut interactor = MuxInteractor::new(config, TerminalPrompt::new());
    let report = interactor.execute(&args.inputs).context("Mux run aborted")?;

    if report.failed() > 0 {
        warn!("{} of {} files failed", report.failed(), report.total);
    }
    Ok(report.all_succeeded())
}

/// Execute the inspect command
pub fn inspect(config_path: Option<&Path>, args: InspectArgs) -> Result<()> {
    let policy =
        initialize_inspect_policy(config_path, &args.selection).context("Failed to load configuration")?;

    let interactor = InspectInteractor::new(policy);
    let report = interactor
        .execute(&args.input, args.subs.as_deref())
        .with_context(|| format!("Failed to inspect '{}'", args.input.display()))?;

    print!("{}", report);
    Ok(())
}
