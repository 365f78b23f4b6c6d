//! Stream classification into video, audio, subtitle and passthrough buckets

use tracing::{debug, info, warn};

use crate::domain::model::{MediaKind, StreamInfo};
use crate::domain::rules::{infer_language, is_picture_codec};
use crate::streams::{Candidate, ClassifiedStreams, UNDETERMINED_LANGUAGE};
use crate::utils::plural;

/// Buckets the streams of one container
pub struct StreamClassifier<'a> {
    audio_languages: &'a [String],
    subtitle_languages: &'a [String],
}

impl<'a> StreamClassifier<'a> {
    /// The preferred lists are only used to infer languages from titles
    pub fn new(audio_languages: &'a [String], subtitle_languages: &'a [String]) -> Self {
        Self {
            audio_languages,
            subtitle_languages,
        }
    }

    /// Classify `streams`. Never fails; an empty container yields empty buckets.
    pub fn classify(&self, streams: &[StreamInfo]) -> ClassifiedStreams {
        info!("found {} {}", streams.len(), plural("stream", streams.len()));
        if streams.is_empty() {
            warn!("container has no streams");
        }

        let mut out = ClassifiedStreams::default();
        for stream in streams {
            match stream.kind {
                MediaKind::Video if is_picture_codec(&stream.codec) => {
                    debug!("stream {}: {} picture treated as attachment", stream.index, stream.codec);
                    out.passthrough.push(stream.index);
                }
                MediaKind::Video => out.video.push(stream.index),
                MediaKind::Audio => {
                    let (lang, candidate) = self.candidate(stream, self.audio_languages);
                    out.audio.push(&lang, candidate);
                }
                MediaKind::Subtitle => {
                    let (lang, candidate) = self.candidate(stream, self.subtitle_languages);
                    out.subtitle.push(&lang, candidate);
                }
                MediaKind::Attachment | MediaKind::Data | MediaKind::Unknown => {
                    out.passthrough.push(stream.index);
                }
            }
        }

        debug!(
            video = out.video.len(),
            audio = out.audio.len(),
            subtitle = out.subtitle.len(),
            passthrough = out.passthrough.len(),
            "classified streams"
        );
        out
    }

    fn candidate(&self, stream: &StreamInfo, preferred: &[String]) -> (String, Candidate) {
        let lowercase_title = stream.lowercase_title();
        let language = match stream.language() {
            Some(lang) => lang.to_ascii_lowercase(),
            None => match infer_language(&lowercase_title, preferred) {
                Some(lang) => {
                    debug!("stream {}: inferred language '{}' from title", stream.index, lang);
                    lang
                }
                None => UNDETERMINED_LANGUAGE.to_string(),
            },
        };

        (
            language,
            Candidate {
                index: stream.index,
                lowercase_title,
            },
        )
    }
}
