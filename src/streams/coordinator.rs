//! Combining a primary source with an optional external subtitle source

use tracing::{info, warn};

use crate::domain::model::{MediaKind, SourceId, StreamInfo, StreamRef};
use crate::ports::ChoicePrompt;
use crate::streams::{list_to_string, Selection, SelectionPolicy, StreamClassifier, StreamSelector};
use crate::utils::plural;

/// Runs classification and selection over one or two sources
pub struct DualSourceCoordinator<'a> {
    policy: &'a SelectionPolicy,
}

impl<'a> DualSourceCoordinator<'a> {
    pub fn new(policy: &'a SelectionPolicy) -> Self {
        Self { policy }
    }

    /// Select streams from `primary`, taking subtitles from `secondary` instead when it has any
    pub fn coordinate(
        &self,
        primary: &[StreamInfo],
        secondary: Option<&[StreamInfo]>,
        prompt: &mut dyn ChoicePrompt,
    ) -> Selection {
        let classifier = StreamClassifier::new(&self.policy.audio_languages, &self.policy.subtitle_languages);
        let selector = StreamSelector::new(self.policy);

        let secondary = secondary.map(|streams| {
            info!("reading subtitles from secondary source");
            (streams, classifier.classify(streams))
        });
        let replace_subtitles = matches!(&secondary, Some((_, classified)) if !classified.subtitle.is_empty());

        let mut classified = classifier.classify(primary);
        if replace_subtitles && !classified.subtitle.is_empty() {
            let ignored = std::mem::take(&mut classified.subtitle).len();
            warn!(
                "ignoring {} {} from primary source",
                ignored,
                plural("subtitle stream", ignored)
            );
        }
        let mut selection = selector.select(SourceId::Primary, primary, &classified, prompt);

        if let Some((streams, classified)) = secondary {
            if replace_subtitles {
                let subs = selector.select_subtitles(&classified.subtitle, streams);
                let subs = selector.narrow(MediaKind::Subtitle, subs, streams, SourceId::Secondary, prompt);
                selection.subtitle = subs.into_iter().map(StreamRef::secondary).collect();
                selection.missing.retain(|kind| *kind != MediaKind::Subtitle.name());
            } else {
                warn!("secondary source has no subtitle streams; keeping primary subtitles");
            }

            // fonts and other attachments from the subtitle source still go along
            selection
                .passthrough
                .extend(classified.passthrough.iter().map(|&index| StreamRef::secondary(index)));
        }

        info!(
            "selected {} {}: {}",
            selection.len(),
            plural("stream", selection.len()),
            list_to_string(&selection.ordered())
        );
        selection
    }
}
