// Domain models - Core types and data structures

use std::collections::BTreeMap;
use std::fmt;

/// Rational time base: one timestamp tick lasts `num / den` seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub num: i32,
    pub den: i32,
}

impl Timebase {
    /// Create a new timebase
    pub fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Microsecond base used as the common comparison domain
    pub fn av_time_base() -> Self {
        Self { num: 1, den: 1_000_000 }
    }

    /// Matroska's native millisecond base
    pub fn millis() -> Self {
        Self { num: 1, den: 1000 }
    }

    /// A zero numerator or denominator makes the base unusable
    pub fn is_valid(&self) -> bool {
        self.num != 0 && self.den != 0
    }

    /// Convert to floating point seconds per tick
    pub fn to_seconds(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Convert a timestamp in this base to seconds
    pub fn ts_to_seconds(&self, ts: i64) -> f64 {
        ts as f64 * self.to_seconds()
    }

    /// Convert seconds to the nearest tick in this base
    pub fn seconds_to_ts(&self, seconds: f64) -> i64 {
        if !self.is_valid() {
            return 0;
        }
        (seconds / self.to_seconds()).round() as i64
    }

    /// Rescale `ts` into `target`, rounding half away from zero and clamping
    /// to the representable range. `i64::MIN` and `i64::MAX` pass through
    /// unchanged, matching libav's `NEAR_INF | PASS_MINMAX` rounding.
    pub fn rescale(&self, ts: i64, target: Timebase) -> i64 {
        if ts == i64::MIN || ts == i64::MAX {
            return ts;
        }
        if *self == target || !self.is_valid() || !target.is_valid() {
            return ts;
        }

        let num = ts as i128 * self.num as i128 * target.den as i128;
        let den = self.den as i128 * target.num as i128;
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };

        let half = den / 2;
        let rounded = if num >= 0 {
            (num + half) / den
        } else {
            (num - half) / den
        };

        rounded.clamp(i64::MIN as i128 + 1, i64::MAX as i128 - 1) as i64
    }
}

impl fmt::Display for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Media kind of an elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
    Attachment,
    Data,
    Unknown,
}

impl MediaKind {
    /// Lowercase name used in log lines and prompts
    pub fn name(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Subtitle => "subtitle",
            MediaKind::Attachment => "attachment",
            MediaKind::Data => "data",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which of the two inputs a stream belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    Primary,
    Secondary,
}

/// Video parameters used when rendering choices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

/// Audio parameters used when rendering choices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioParams {
    pub sample_rate: u32,
    pub channels: u32,
    pub channel_layout: Option<String>,
    pub sample_format: Option<String>,
    pub bits_per_sample: u32,
}

/// Read-only view of one stream in an opened container
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub index: usize,
    pub kind: MediaKind,
    /// Short codec name, e.g. `h264`, `ass`, `mjpeg`
    pub codec: String,
    pub time_base: Timebase,
    pub metadata: BTreeMap<String, String>,
    pub default_disposition: bool,
    /// Duration in seconds, from the stream or else the container
    pub duration: Option<f64>,
    pub bit_rate: Option<u64>,
    pub video: Option<VideoParams>,
    pub audio: Option<AudioParams>,
}

impl StreamInfo {
    /// Create a stream with no metadata or technical parameters
    pub fn new(index: usize, kind: MediaKind, codec: impl Into<String>, time_base: Timebase) -> Self {
        Self {
            index,
            kind,
            codec: codec.into(),
            time_base,
            metadata: BTreeMap::new(),
            default_disposition: false,
            duration: None,
            bit_rate: None,
            video: None,
            audio: None,
        }
    }

    /// Builder-style metadata insert
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// `language` tag, if non-empty
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .get("language")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `title` tag, if non-empty
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Title lowercased for keyword matching; empty when there is no title
    pub fn lowercase_title(&self) -> String {
        self.title().map(str::to_lowercase).unwrap_or_default()
    }
}

/// A stream chosen for output, tagged with its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamRef {
    pub source: SourceId,
    pub index: usize,
}

impl StreamRef {
    pub fn primary(index: usize) -> Self {
        Self { source: SourceId::Primary, index }
    }

    pub fn secondary(index: usize) -> Self {
        Self { source: SourceId::Secondary, index }
    }
}

impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            SourceId::Primary => write!(f, "{}", self.index),
            SourceId::Secondary => write!(f, "s{}", self.index),
        }
    }
}
