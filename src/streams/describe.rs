//! Human-readable stream summaries for prompts and the inspect command

use crate::domain::model::{MediaKind, StreamInfo, StreamRef};
use crate::ports::{ChoiceDetail, ChoiceOption};
use crate::streams::UNDETERMINED_LANGUAGE;
use crate::utils::format_bit_rate;
use crate::utils::time::format_hms;

/// `(heading, subheading)`, e.g. `("h264", "idx 0, eng, 00:23:40")`
pub fn stream_heading(stream: &StreamInfo) -> (String, String) {
    let lang = stream.language().unwrap_or(UNDETERMINED_LANGUAGE);
    let duration = format_hms(stream.duration.unwrap_or(0.0));
    (
        stream.codec.clone(),
        format!("idx {}, {}, {}", stream.index, lang, duration),
    )
}

/// Resolution line for video and audio streams
pub fn resolution(stream: &StreamInfo) -> Option<String> {
    match stream.kind {
        MediaKind::Video => stream
            .video
            .as_ref()
            .map(|v| format!("{}x{}, {:.2} fps", v.width, v.height, v.frame_rate)),
        MediaKind::Audio => stream.audio.as_ref().map(|a| {
            let mut line = format!(
                "{} Hz, {} ch ({}), {}",
                a.sample_rate,
                a.channels,
                a.channel_layout.as_deref().unwrap_or("unknown"),
                a.sample_format.as_deref().unwrap_or("unknown"),
            );
            if a.bits_per_sample > 0 {
                line.push_str(&format!(" ({}-bit)", a.bits_per_sample));
            }
            line
        }),
        _ => None,
    }
}

/// Build the prompt entry for one stream
pub fn choice_option(stream_ref: StreamRef, stream: &StreamInfo) -> ChoiceOption {
    let (heading, subheading) = stream_heading(stream);

    let mut details = Vec::new();
    if let Some(title) = stream.title() {
        details.push(ChoiceDetail {
            heading: "name:".to_string(),
            text: title.to_string(),
        });
    }
    if let Some(res) = resolution(stream) {
        details.push(ChoiceDetail {
            heading: "res:".to_string(),
            text: res,
        });
    }
    if let Some(rate) = stream.bit_rate.filter(|&b| b > 0) {
        details.push(ChoiceDetail {
            heading: "bit:".to_string(),
            text: format_bit_rate(rate),
        });
    }

    ChoiceOption {
        stream: stream_ref,
        heading,
        subheading,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AudioParams, Timebase, VideoParams};

    #[test]
    fn test_video_option() {
        let mut stream = StreamInfo::new(0, MediaKind::Video, "hevc", Timebase::millis())
            .with_tag("language", "eng")
            .with_tag("title", "Main Feature");
        stream.duration = Some(1425.0);
        stream.bit_rate = Some(8_200_000);
        stream.video = Some(VideoParams {
            width: 1920,
            height: 1080,
            frame_rate: 24000.0 / 1001.0,
        });

        let option = choice_option(StreamRef::primary(0), &stream);
        assert_eq!(option.heading, "hevc");
        assert_eq!(option.subheading, "idx 0, eng, 00:23:45");
        let texts: Vec<&str> = option.details.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["Main Feature", "1920x1080, 23.98 fps", "8.2 Mb/s"]);
    }

    #[test]
    fn test_audio_resolution() {
        let mut stream = StreamInfo::new(1, MediaKind::Audio, "flac", Timebase::millis());
        stream.audio = Some(AudioParams {
            sample_rate: 48000,
            channels: 6,
            channel_layout: Some("5.1(side)".to_string()),
            sample_format: Some("s32".to_string()),
            bits_per_sample: 24,
        });
        assert_eq!(
            resolution(&stream).as_deref(),
            Some("48000 Hz, 6 ch (5.1(side)), s32 (24-bit)")
        );
    }

    #[test]
    fn test_subtitle_has_minimal_details() {
        let stream = StreamInfo::new(3, MediaKind::Subtitle, "ass", Timebase::millis());
        let option = choice_option(StreamRef::secondary(3), &stream);
        assert_eq!(option.subheading, "idx 3, und, 00:00:00");
        assert!(option.details.is_empty());
    }
}
