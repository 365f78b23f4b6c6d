// Domain rules - Stream filtering and language policies

use tracing::warn;

/// Codec names treated as text subtitle formats
const TEXT_SUBTITLE_CODECS: &[&str] = &["ssa", "ass", "mov_text", "srt", "subrip"];

/// Video codecs that carry still pictures (cover art), not playable video
const PICTURE_CODECS: &[&str] = &["mjpeg", "png"];

/// Natural-language names for ISO 639-2 codes, matched against stream titles
const LANGUAGE_NAMES: &[(&str, &[&str])] = &[
    ("eng", &["english"]),
    ("jpn", &["japanese", "日本語"]),
    ("spa", &["spanish", "español", "espanol", "castellano", "latino"]),
    ("fre", &["french", "français", "francais"]),
    ("fra", &["french", "français", "francais"]),
    ("ger", &["german", "deutsch"]),
    ("deu", &["german", "deutsch"]),
    ("ita", &["italian", "italiano"]),
    ("por", &["portuguese", "português", "portugues", "brazilian"]),
    ("rus", &["russian", "русский"]),
    ("chi", &["chinese", "mandarin", "cantonese", "中文"]),
    ("zho", &["chinese", "mandarin", "cantonese", "中文"]),
    ("kor", &["korean", "한국어"]),
    ("ara", &["arabic"]),
    ("hin", &["hindi"]),
    ("dut", &["dutch", "nederlands"]),
    ("nld", &["dutch", "nederlands"]),
    ("swe", &["swedish", "svenska"]),
    ("nor", &["norwegian", "norsk"]),
    ("dan", &["danish", "dansk"]),
    ("fin", &["finnish", "suomi"]),
    ("pol", &["polish", "polski"]),
    ("tur", &["turkish", "türkçe"]),
    ("tha", &["thai"]),
    ("vie", &["vietnamese"]),
    ("ind", &["indonesian"]),
    ("may", &["malay"]),
    ("heb", &["hebrew"]),
    ("gre", &["greek"]),
    ("cze", &["czech", "čeština"]),
    ("hun", &["hungarian", "magyar"]),
    ("ukr", &["ukrainian"]),
];

/// Why a candidate stream was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Commentary,
    Sdh,
    SignsAndSongs,
    ImageSubtitle,
}

impl Rejection {
    pub fn describe(&self) -> &'static str {
        match self {
            Rejection::Commentary => "commentary track",
            Rejection::Sdh => "SDH subtitles",
            Rejection::SignsAndSongs => "signs/songs subtitles",
            Rejection::ImageSubtitle => "not a text subtitle format",
        }
    }
}

/// Title and codec rules applied to audio and subtitle candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamFilter {
    pub prefer_sdh: bool,
    pub prefer_signs_and_songs: bool,
    pub prefer_text: bool,
}

impl StreamFilter {
    /// Commentary and director tracks are excluded for every kind
    pub fn is_commentary(lowercase_title: &str) -> bool {
        lowercase_title.contains("commentary") || lowercase_title.contains("director")
    }

    /// Audio candidates only face the commentary rule
    pub fn reject_audio(&self, lowercase_title: &str) -> Option<Rejection> {
        Self::is_commentary(lowercase_title).then_some(Rejection::Commentary)
    }

    /// Subtitle candidates face commentary, SDH, signs/songs and text-format rules, in that order
    pub fn reject_subtitle(&self, lowercase_title: &str, codec: &str) -> Option<Rejection> {
        if Self::is_commentary(lowercase_title) {
            return Some(Rejection::Commentary);
        }
        if !self.prefer_sdh && lowercase_title.contains("sdh") {
            return Some(Rejection::Sdh);
        }
        if !self.prefer_signs_and_songs
            && (lowercase_title.contains("signs") || lowercase_title.contains("songs"))
        {
            return Some(Rejection::SignsAndSongs);
        }
        if self.prefer_text && !is_text_subtitle_codec(codec) {
            return Some(Rejection::ImageSubtitle);
        }
        None
    }
}

/// Whether `codec` is a text-based subtitle format
pub fn is_text_subtitle_codec(codec: &str) -> bool {
    TEXT_SUBTITLE_CODECS.contains(&codec.to_ascii_lowercase().as_str())
}

/// Whether a video-typed stream is really an embedded picture
pub fn is_picture_codec(codec: &str) -> bool {
    PICTURE_CODECS.contains(&codec.to_ascii_lowercase().as_str())
}

/// Guess a language for an untagged stream from its title.
///
/// Only the `preferred` codes are tried, in order; the first whose known
/// names occur in the lowercased title wins. A stream in a language that is
/// not preferred therefore stays unidentified.
pub fn infer_language(lowercase_title: &str, preferred: &[String]) -> Option<String> {
    if lowercase_title.is_empty() {
        return None;
    }

    preferred
        .iter()
        .find(|code| {
            LANGUAGE_NAMES
                .iter()
                .filter(|(known, _)| known == code)
                .flat_map(|(_, names)| names.iter())
                .any(|name| lowercase_title.contains(name))
        })
        .cloned()
}

/// Keep only three-letter codes, lowercased, in their original order
pub fn normalize_languages(codes: &[String], setting: &str) -> Vec<String> {
    codes
        .iter()
        .filter_map(|code| {
            let code = code.trim();
            if code.chars().count() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                Some(code.to_ascii_lowercase())
            } else {
                warn!("ignoring invalid language code '{}' in {}; expected a 3-letter code", code, setting);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
