//! Stream selection by language preference and content filters

use tracing::{debug, info, warn};

use crate::domain::model::{MediaKind, SourceId, StreamInfo, StreamRef};
use crate::domain::rules::{Rejection, StreamFilter};
use crate::ports::ChoicePrompt;
use crate::streams::describe::choice_option;
use crate::streams::{Candidate, ClassifiedStreams, LanguageBuckets, Selection};
use crate::utils::plural;

/// Preferences driving the selector
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    /// Ordered preferred audio languages (ISO 639-2)
    pub audio_languages: Vec<String>,
    /// Ordered preferred subtitle languages (ISO 639-2)
    pub subtitle_languages: Vec<String>,
    pub filter: StreamFilter,
    /// Ask the operator when more than one stream of a kind survives
    pub one_stream: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            audio_languages: vec!["eng".to_string()],
            subtitle_languages: vec!["eng".to_string()],
            filter: StreamFilter {
                prefer_sdh: false,
                prefer_signs_and_songs: false,
                prefer_text: true,
            },
            one_stream: true,
        }
    }
}

/// Narrows classified streams down to the output set
pub struct StreamSelector<'a> {
    policy: &'a SelectionPolicy,
}

impl<'a> StreamSelector<'a> {
    pub fn new(policy: &'a SelectionPolicy) -> Self {
        Self { policy }
    }

    /// Select video, audio, subtitle and passthrough streams of one source
    pub fn select(
        &self,
        source: SourceId,
        streams: &[StreamInfo],
        classified: &ClassifiedStreams,
        prompt: &mut dyn ChoicePrompt,
    ) -> Selection {
        let mut missing = Vec::new();

        if classified.video.is_empty() {
            missing.push(MediaKind::Video.name());
        }
        let video = self.narrow(MediaKind::Video, classified.video.clone(), streams, source, prompt);

        if classified.audio.is_empty() {
            missing.push(MediaKind::Audio.name());
        }
        let audio = self.select_audio(&classified.audio);
        let audio = self.narrow(MediaKind::Audio, audio, streams, source, prompt);

        if classified.subtitle.is_empty() {
            missing.push(MediaKind::Subtitle.name());
        }
        let subtitle = self.select_subtitles(&classified.subtitle, streams);
        let subtitle = self.narrow(MediaKind::Subtitle, subtitle, streams, source, prompt);

        let to_refs = |indices: Vec<usize>| -> Vec<StreamRef> {
            indices.into_iter().map(|index| StreamRef { source, index }).collect()
        };

        Selection {
            video: to_refs(video),
            audio: to_refs(audio),
            subtitle: to_refs(subtitle),
            passthrough: to_refs(classified.passthrough.clone()),
            missing,
        }
    }

    /// Audio streams of the first preferred language with any survivor
    pub fn select_audio(&self, buckets: &LanguageBuckets) -> Vec<usize> {
        let filter = self.policy.filter;
        self.select_by_language(MediaKind::Audio, buckets, &self.policy.audio_languages, |c| {
            filter.reject_audio(&c.lowercase_title)
        })
    }

    /// Subtitle streams of the first preferred language with any survivor
    pub fn select_subtitles(&self, buckets: &LanguageBuckets, streams: &[StreamInfo]) -> Vec<usize> {
        let filter = self.policy.filter;
        self.select_by_language(MediaKind::Subtitle, buckets, &self.policy.subtitle_languages, |c| {
            let codec = streams
                .iter()
                .find(|s| s.index == c.index)
                .map(|s| s.codec.as_str())
                .unwrap_or_default();
            filter.reject_subtitle(&c.lowercase_title, codec)
        })
    }

    fn select_by_language<F>(
        &self,
        kind: MediaKind,
        buckets: &LanguageBuckets,
        preferred: &[String],
        reject: F,
    ) -> Vec<usize>
    where
        F: Fn(&Candidate) -> Option<Rejection>,
    {
        let accept = |c: &Candidate| match reject(c) {
            Some(reason) => {
                debug!("{} stream {}: skipped ({})", kind, c.index, reason.describe());
                false
            }
            None => true,
        };

        for lang in preferred {
            let Some(candidates) = buckets.get(lang) else {
                continue;
            };

            let chosen: Vec<usize> = candidates.iter().filter(|&c| accept(c)).map(|c| c.index).collect();
            if !chosen.is_empty() {
                info!("selected {} {} {} for language '{}'", chosen.len(), kind, plural("stream", chosen.len()), lang);
                return chosen;
            }
        }

        if buckets.is_empty() {
            return Vec::new();
        }

        // nothing matched a preferred language: keep everything that survives the filters
        let mut all: Vec<usize> = buckets
            .languages()
            .flat_map(|lang| buckets.get(lang).unwrap_or_default())
            .filter(|&c| accept(c))
            .map(|c| c.index)
            .collect();
        all.sort_unstable();

        match all.len() {
            0 => warn!("no {} streams matched the preferred languages", kind),
            1 => warn!("no preferred {} language found, using the only {} stream", kind, kind),
            n => warn!("no preferred {} language found, selecting all {} {} streams", kind, n, kind),
        }
        all
    }

    /// Apply the one-stream policy to a kind with more than one survivor
    pub(crate) fn narrow(
        &self,
        kind: MediaKind,
        chosen: Vec<usize>,
        streams: &[StreamInfo],
        source: SourceId,
        prompt: &mut dyn ChoicePrompt,
    ) -> Vec<usize> {
        if chosen.len() <= 1 {
            return chosen;
        }
        if !self.policy.one_stream {
            warn!("multiple {} streams found", kind);
            return chosen;
        }

        info!("multiple {} streams:", kind);
        let options: Vec<_> = chosen
            .iter()
            .filter_map(|&index| {
                streams
                    .iter()
                    .find(|s| s.index == index)
                    .map(|s| choice_option(StreamRef { source, index }, s))
            })
            .collect();

        prompt
            .present_choices(kind, &options)
            .into_iter()
            .filter_map(|pos| options.get(pos).map(|o| o.stream.index))
            .collect()
    }
}
