//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Stream preference flags shared by mux and inspect
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Preferred audio languages, most preferred first (ISO 639-2, e.g. jpn,eng)
    #[arg(long = "audio-lang", value_delimiter = ',', env = "REMUXER_AUDIO_LANGS")]
    pub audio_languages: Vec<String>,

    /// Preferred subtitle languages, most preferred first
    #[arg(long = "sub-lang", value_delimiter = ',', env = "REMUXER_SUB_LANGS")]
    pub subtitle_languages: Vec<String>,

    /// Keep SDH subtitles
    #[arg(long)]
    pub sdh: bool,

    /// Keep signs-and-songs subtitles
    #[arg(long)]
    pub signs: bool,

    /// Keep image-based subtitles (PGS, VobSub)
    #[arg(long)]
    pub image_subs: bool,

    /// Keep every matching stream instead of asking for one
    #[arg(long)]
    pub all_streams: bool,
}

/// Arguments for the mux command
#[derive(Args, Debug)]
pub struct MuxArgs {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Folder for the output files (default: replace inputs in place)
    #[arg(short, long, env = "REMUXER_OUTPUT_FOLDER")]
    pub output_folder: Option<PathBuf>,

    /// Take subtitles from this file instead (single input only)
    #[arg(long)]
    pub subs: Option<PathBuf>,

    /// Folder searched for `<name>.{mks,mkv,ass,srt,ssa}` subtitle files
    #[arg(long, env = "REMUXER_EXTRA_SUBS")]
    pub extra_subs: Option<PathBuf>,

    /// Shift external subtitles by this many seconds
    #[arg(long, allow_hyphen_values = true, env = "REMUXER_SUBTITLE_DELAY")]
    pub subtitle_delay: Option<f64>,

    /// Do not show the progress line
    #[arg(long, env = "REMUXER_NO_PROGRESS")]
    pub no_progress: bool,

    /// Abort the batch on the first failure
    #[arg(long, env = "REMUXER_STOP_ON_ERROR")]
    pub stop_on_error: bool,

    /// Delete output files that already exist
    #[arg(long, env = "REMUXER_DELETE_EXISTING")]
    pub delete_existing: bool,

    /// Select streams but write nothing
    #[arg(long, env = "REMUXER_DRY_RUN")]
    pub dry_run: bool,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input file
    pub input: PathBuf,

    /// External subtitle file to merge
    #[arg(long)]
    pub subs: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,
}
