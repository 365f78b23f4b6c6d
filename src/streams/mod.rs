//! Stream classification, selection and mapping

use crate::domain::model::{SourceId, StreamRef};

pub mod classifier;
pub mod coordinator;
pub mod describe;
pub mod mapper;
pub mod selector;

pub use classifier::StreamClassifier;
pub use coordinator::DualSourceCoordinator;
pub use mapper::OutputStreamMap;
pub use selector::{SelectionPolicy, StreamSelector};

/// Language key used for streams with no tag and no inferred language
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// An audio or subtitle stream waiting for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub lowercase_title: String,
}

/// Candidates grouped by language, languages kept in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageBuckets {
    buckets: Vec<(String, Vec<Candidate>)>,
}

impl LanguageBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, language: &str, candidate: Candidate) {
        match self.buckets.iter_mut().find(|(lang, _)| lang == language) {
            Some((_, list)) => list.push(candidate),
            None => self.buckets.push((language.to_string(), vec![candidate])),
        }
    }

    /// Candidates for `language`, in source order
    pub fn get(&self, language: &str) -> Option<&[Candidate]> {
        self.buckets
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, list)| list.as_slice())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(lang, _)| lang.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Language bucket holding stream `index`
    pub fn language_of(&self, index: usize) -> Option<&str> {
        self.buckets
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.index == index))
            .map(|(lang, _)| lang.as_str())
    }
}

/// Output of the classifier for one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedStreams {
    pub video: Vec<usize>,
    pub audio: LanguageBuckets,
    pub subtitle: LanguageBuckets,
    /// Attachments, cover art, data and unknown streams in source order
    pub passthrough: Vec<usize>,
}

impl ClassifiedStreams {
    pub fn total(&self) -> usize {
        self.video.len() + self.audio.len() + self.subtitle.len() + self.passthrough.len()
    }
}

/// Chosen streams per kind. Output order is video, audio, subtitle, passthrough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub video: Vec<StreamRef>,
    pub audio: Vec<StreamRef>,
    pub subtitle: Vec<StreamRef>,
    pub passthrough: Vec<StreamRef>,
    /// Required kinds that had no candidates at all
    pub missing: Vec<&'static str>,
}

impl Selection {
    /// All selected streams in output order
    pub fn ordered(&self) -> Vec<StreamRef> {
        self.video
            .iter()
            .chain(&self.audio)
            .chain(&self.subtitle)
            .chain(&self.passthrough)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.video.len() + self.audio.len() + self.subtitle.len() + self.passthrough.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any selected stream comes from `source`
    pub fn uses(&self, source: SourceId) -> bool {
        self.ordered().iter().any(|s| s.source == source)
    }
}

/// Render a stream list for log lines, e.g. `0, 1, s2`
pub fn list_to_string(streams: &[StreamRef]) -> String {
    streams
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
