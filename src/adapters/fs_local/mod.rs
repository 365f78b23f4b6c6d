// Local filesystem adapter - Input collection and output placement

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{RemuxError, RemuxResult};

/// Extensions accepted as primary inputs
const INPUT_EXTENSIONS: &[&str] = &["mkv"];

/// Extensions tried when looking for an external subtitle source
const SUBTITLE_SOURCE_EXTENSIONS: &[&str] = &["mks", "mkv", "ass", "ssa", "srt"];

/// Where the remuxed file ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A new file in the output folder
    Folder(PathBuf),
    /// Replace the input once writing succeeds
    InPlace(PathBuf),
}

impl OutputTarget {
    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::Folder(p) | OutputTarget::InPlace(p) => p,
        }
    }
}

/// Result of scanning the command-line inputs
#[derive(Debug, Default)]
pub struct CollectedInputs {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<RemuxError>,
}

/// Filesystem operations on the local machine
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create the output folder if needed; fails if the path exists but is not a directory
    pub fn create_output_folder(path: &Path) -> RemuxResult<PathBuf> {
        if !path.exists() {
            info!("creating output folder '{}'", path.display());
            fs::create_dir_all(path)?;
        } else if !path.is_dir() {
            return Err(RemuxError::OutputFolder {
                path: path.display().to_string(),
            });
        }
        Ok(fs::canonicalize(path)?)
    }

    /// Expand directories and filter out inputs that cannot be processed
    pub fn collect_inputs(inputs: &[PathBuf], output_folder: Option<&Path>) -> CollectedInputs {
        let output_folder = output_folder.and_then(|p| fs::canonicalize(p).ok());
        let mut collected = CollectedInputs::default();

        let mut skip = |path: &Path, reason: String| {
            collected.skipped.push(RemuxError::InputSkipped {
                path: path.display().to_string(),
                reason,
            });
        };

        let mut candidates = Vec::new();
        for input in inputs {
            if input.is_dir() {
                let mut found: Vec<PathBuf> = WalkDir::new(input)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file() && has_input_extension(e.path()))
                    .map(|e| e.into_path())
                    .collect();
                found.sort();
                debug!("found {} inputs under '{}'", found.len(), input.display());
                candidates.extend(found);
            } else if !input.exists() {
                skip(input, "file does not exist".to_string());
            } else if !has_input_extension(input) {
                let ext = input
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default();
                skip(input, format!("not an mkv file (extension was '{}')", ext));
            } else {
                candidates.push(input.clone());
            }
        }

        for file in candidates {
            if let Some(out) = &output_folder {
                let parent = file
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                if fs::canonicalize(parent).map(|p| &p == out).unwrap_or(false) {
                    skip(&file, "input file is inside the output folder".to_string());
                    continue;
                }
            }
            collected.files.push(file);
        }

        collected
    }

    /// Destination for `input`: inside `output_folder`, or in place
    pub fn output_target(input: &Path, output_folder: Option<&Path>) -> RemuxResult<OutputTarget> {
        match output_folder {
            Some(folder) => {
                let name = input.file_name().ok_or_else(|| RemuxError::BadArgs {
                    message: format!("'{}' has no file name", input.display()),
                })?;
                Ok(OutputTarget::Folder(folder.join(name)))
            }
            None => Ok(OutputTarget::InPlace(input.to_path_buf())),
        }
    }

    /// Remove an existing output when allowed, otherwise refuse to overwrite it
    pub fn prepare_output(target: &OutputTarget, delete_existing: bool) -> RemuxResult<()> {
        let OutputTarget::Folder(path) = target else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        if !delete_existing {
            return Err(RemuxError::OutputExists {
                path: path.display().to_string(),
            });
        }
        info!("deleting existing output '{}'", path.display());
        fs::remove_file(path)?;
        Ok(())
    }

    /// Hidden temporary file next to `target`. It is deleted when dropped unless persisted.
    pub fn staging_file(target: &Path) -> RemuxResult<NamedTempFile> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(tempfile::Builder::new()
            .prefix(".remuxer-")
            .suffix(".mkv")
            .tempfile_in(dir)?)
    }

    /// Move a finished staging file over `target`
    pub fn persist(staged: NamedTempFile, target: &Path) -> RemuxResult<()> {
        staged.persist(target).map_err(|e| RemuxError::Io(e.error))?;
        Ok(())
    }

    /// Look for `<stem>.{mks,mkv,ass,ssa,srt}` in `folder`
    pub fn find_subtitle_source(input: &Path, folder: &Path) -> Option<PathBuf> {
        let stem = input.file_stem()?;
        SUBTITLE_SOURCE_EXTENSIONS
            .iter()
            .map(|ext| folder.join(stem).with_extension(ext))
            .find(|candidate| candidate.is_file())
    }
}

fn has_input_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| INPUT_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_collect_filters_inputs() {
        let dir = TempDir::new().unwrap();
        let good = touch(dir.path(), "episode.mkv");
        let bad = touch(dir.path(), "episode.mp4");
        let missing = dir.path().join("missing.mkv");

        let collected = LocalFsAdapter::collect_inputs(&[good.clone(), bad, missing], None);
        assert_eq!(collected.files, vec![good]);
        assert_eq!(collected.skipped.len(), 2);
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = TempDir::new().unwrap();
        let season = dir.path().join("season1");
        fs::create_dir(&season).unwrap();
        let b = touch(&season, "b.mkv");
        let a = touch(&season, "a.MKV");
        touch(&season, "notes.txt");

        let collected = LocalFsAdapter::collect_inputs(&[dir.path().to_path_buf()], None);
        assert_eq!(collected.files, vec![a, b]);
        assert!(collected.skipped.is_empty());
    }

    #[test]
    fn test_collect_skips_output_folder() {
        let dir = TempDir::new().unwrap();
        let input = touch(dir.path(), "movie.mkv");

        let collected = LocalFsAdapter::collect_inputs(&[input], Some(dir.path()));
        assert!(collected.files.is_empty());
        assert_eq!(collected.skipped.len(), 1);
    }

    #[test]
    fn test_create_output_folder() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");
        let created = LocalFsAdapter::create_output_folder(&out).unwrap();
        assert!(created.is_dir());

        let file = touch(dir.path(), "file");
        assert!(matches!(
            LocalFsAdapter::create_output_folder(&file),
            Err(RemuxError::OutputFolder { .. })
        ));
    }

    #[test]
    fn test_output_target_and_existing_output() {
        let dir = TempDir::new().unwrap();
        let target = LocalFsAdapter::output_target(Path::new("/media/show.mkv"), Some(dir.path())).unwrap();
        assert_eq!(target, OutputTarget::Folder(dir.path().join("show.mkv")));
        assert!(LocalFsAdapter::prepare_output(&target, false).is_ok());

        touch(dir.path(), "show.mkv");
        assert!(matches!(
            LocalFsAdapter::prepare_output(&target, false),
            Err(RemuxError::OutputExists { .. })
        ));
        LocalFsAdapter::prepare_output(&target, true).unwrap();
        assert!(!target.path().exists());

        let in_place = LocalFsAdapter::output_target(Path::new("show.mkv"), None).unwrap();
        assert_eq!(in_place, OutputTarget::InPlace(PathBuf::from("show.mkv")));
    }

    #[test]
    fn test_failed_write_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("show.mkv");

        let staged = LocalFsAdapter::staging_file(&target).unwrap();
        fs::write(staged.path(), b"truncated").unwrap();
        assert_eq!(staged.path().parent(), Some(dir.path()));
        drop(staged);

        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        // a rerun is not blocked by leftovers
        let output = OutputTarget::Folder(target.clone());
        assert!(LocalFsAdapter::prepare_output(&output, false).is_ok());
    }

    #[test]
    fn test_persist_replaces_target() {
        let dir = TempDir::new().unwrap();
        let target = touch(dir.path(), "show.mkv");

        let staged = LocalFsAdapter::staging_file(&target).unwrap();
        fs::write(staged.path(), b"remuxed").unwrap();
        LocalFsAdapter::persist(staged, &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"remuxed");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_find_subtitle_source() {
        let dir = TempDir::new().unwrap();
        assert_eq!(LocalFsAdapter::find_subtitle_source(Path::new("/x/ep01.mkv"), dir.path()), None);

        let srt = touch(dir.path(), "ep01.srt");
        assert_eq!(LocalFsAdapter::find_subtitle_source(Path::new("/x/ep01.mkv"), dir.path()), Some(srt));

        let mks = touch(dir.path(), "ep01.mks");
        assert_eq!(LocalFsAdapter::find_subtitle_source(Path::new("/x/ep01.mkv"), dir.path()), Some(mks));
    }
}
