// Inspect interactor - Orchestrates media file inspection use case

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::adapters::LibavSource;
use crate::domain::model::{MediaKind, SourceId, StreamInfo, StreamRef};
use crate::error::{RemuxError, RemuxResult};
use crate::ports::{ChoiceOption, ChoicePrompt, MediaSource};
use crate::streams::describe::choice_option;
use crate::streams::{list_to_string, ClassifiedStreams, DualSourceCoordinator, SelectionPolicy, StreamClassifier};

/// Stand-in prompt: inspect reports every candidate instead of asking
struct KeepEverything;

impl ChoicePrompt for KeepEverything {
    fn present_choices(&mut self, _kind: MediaKind, options: &[ChoiceOption]) -> Vec<usize> {
        (0..options.len()).collect()
    }
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    policy: SelectionPolicy,
}

impl InspectInteractor {
    pub fn new(mut policy: SelectionPolicy) -> Self {
        policy.one_stream = false;
        Self { policy }
    }

    /// Open `input` (and `subs`) and render the report
    pub fn execute(&self, input: &Path, subs: Option<&Path>) -> RemuxResult<String> {
        for path in std::iter::once(input).chain(subs) {
            if !path.exists() {
                return Err(RemuxError::InputFileNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        let primary = LibavSource::open(input)?;
        let secondary = subs.map(LibavSource::open).transpose()?;
        info!("inspecting '{}'", input.display());

        Ok(self.report(primary.streams(), secondary.as_ref().map(|s| s.streams())))
    }

    /// Every stream with its classification, then the selection mux would make
    pub fn report(&self, primary: &[StreamInfo], secondary: Option<&[StreamInfo]>) -> String {
        let mut out = String::new();
        self.describe_source(&mut out, SourceId::Primary, primary);
        if let Some(secondary) = secondary {
            self.describe_source(&mut out, SourceId::Secondary, secondary);
        }

        let selection = DualSourceCoordinator::new(&self.policy).coordinate(primary, secondary, &mut KeepEverything);
        let _ = writeln!(out, "selection: {}", list_to_string(&selection.ordered()));
        if !selection.missing.is_empty() {
            let _ = writeln!(out, "missing: {}", selection.missing.join(", "));
        }
        out
    }

    fn describe_source(&self, out: &mut String, source: SourceId, streams: &[StreamInfo]) {
        let classifier = StreamClassifier::new(&self.policy.audio_languages, &self.policy.subtitle_languages);
        let classified = classifier.classify(streams);

        let label = match source {
            SourceId::Primary => "primary",
            SourceId::Secondary => "secondary",
        };
        let _ = writeln!(out, "{} source: {} streams", label, streams.len());

        for stream in streams {
            let stream_ref = StreamRef { source, index: stream.index };
            let option = choice_option(stream_ref, stream);
            let _ = writeln!(
                out,
                "  [{}] {} {} - {}",
                stream_ref, stream.kind, option.heading, option.subheading
            );
            for detail in &option.details {
                let _ = writeln!(out, "       {} {}", detail.heading, detail.text);
            }
            let _ = writeln!(out, "       class: {}", self.classification(stream, &classified));
        }
    }

    fn classification(&self, stream: &StreamInfo, classified: &ClassifiedStreams) -> String {
        let filter = &self.policy.filter;
        let title = stream.lowercase_title();

        if classified.passthrough.contains(&stream.index) {
            return "passthrough".to_string();
        }
        if classified.video.contains(&stream.index) {
            return "video".to_string();
        }

        let (kind, language, rejection) = if let Some(lang) = classified.audio.language_of(stream.index) {
            ("audio", lang, filter.reject_audio(&title))
        } else if let Some(lang) = classified.subtitle.language_of(stream.index) {
            ("subtitle", lang, filter.reject_subtitle(&title, &stream.codec))
        } else {
            return "ignored".to_string();
        };

        match rejection {
            Some(reason) => format!("{} ({}), filtered: {}", kind, language, reason.describe()),
            None => format!("{} ({})", kind, language),
        }
    }
}
