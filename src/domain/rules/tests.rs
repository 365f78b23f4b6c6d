// Unit tests for stream rules

#[cfg(test)]
mod tests {
    use crate::domain::rules::*;

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_commentary_detection() {
        assert!(StreamFilter::is_commentary("director's commentary"));
        assert!(StreamFilter::is_commentary("commentary with cast"));
        assert!(StreamFilter::is_commentary("director"));
        assert!(!StreamFilter::is_commentary("english 5.1"));
    }

    #[test]
    fn test_audio_filter_only_rejects_commentary() {
        let filter = StreamFilter::default();
        assert_eq!(filter.reject_audio("director's commentary"), Some(Rejection::Commentary));
        assert_eq!(filter.reject_audio("english sdh"), None);
        assert_eq!(filter.reject_audio("signs"), None);
    }

    #[test]
    fn test_sdh_rule() {
        let strict = StreamFilter { prefer_text: true, ..Default::default() };
        assert_eq!(strict.reject_subtitle("english sdh", "subrip"), Some(Rejection::Sdh));

        let lenient = StreamFilter { prefer_sdh: true, prefer_text: true, ..Default::default() };
        assert_eq!(lenient.reject_subtitle("english sdh", "subrip"), None);
    }

    #[test]
    fn test_signs_and_songs_rule() {
        let strict = StreamFilter::default();
        assert_eq!(strict.reject_subtitle("signs & songs", "ass"), Some(Rejection::SignsAndSongs));
        assert_eq!(strict.reject_subtitle("songs only", "ass"), Some(Rejection::SignsAndSongs));

        let lenient = StreamFilter { prefer_signs_and_songs: true, ..Default::default() };
        assert_eq!(lenient.reject_subtitle("signs & songs", "ass"), None);
    }

    #[test]
    fn test_text_subtitle_rule() {
        let text_only = StreamFilter { prefer_text: true, ..Default::default() };
        assert_eq!(text_only.reject_subtitle("", "hdmv_pgs_subtitle"), Some(Rejection::ImageSubtitle));
        assert_eq!(text_only.reject_subtitle("", "ass"), None);
        assert_eq!(text_only.reject_subtitle("", "mov_text"), None);

        let any = StreamFilter::default();
        assert_eq!(any.reject_subtitle("", "hdmv_pgs_subtitle"), None);
    }

    #[test]
    fn test_commentary_wins_over_other_subtitle_rules() {
        let filter = StreamFilter { prefer_sdh: true, prefer_signs_and_songs: true, prefer_text: false };
        assert_eq!(filter.reject_subtitle("commentary sdh", "ass"), Some(Rejection::Commentary));
    }

    #[test]
    fn test_codec_classes() {
        assert!(is_text_subtitle_codec("SubRip"));
        assert!(is_text_subtitle_codec("ssa"));
        assert!(!is_text_subtitle_codec("dvd_subtitle"));
        assert!(is_picture_codec("mjpeg"));
        assert!(is_picture_codec("png"));
        assert!(!is_picture_codec("h264"));
    }

    #[test]
    fn test_infer_language_from_title() {
        let preferred = langs(&["jpn", "eng"]);
        assert_eq!(infer_language("english (full)", &preferred), Some("eng".to_string()));
        assert_eq!(infer_language("japanese 2.0", &preferred), Some("jpn".to_string()));
        assert_eq!(infer_language("", &preferred), None);
    }

    #[test]
    fn test_infer_language_first_preferred_wins() {
        let title = "english / japanese dual";
        assert_eq!(infer_language(title, &langs(&["jpn", "eng"])), Some("jpn".to_string()));
        assert_eq!(infer_language(title, &langs(&["eng", "jpn"])), Some("eng".to_string()));
    }

    #[test]
    fn test_infer_language_ignores_unpreferred() {
        // German is a known name, but only preferred codes are considered
        assert_eq!(infer_language("german stereo", &langs(&["eng"])), None);
    }

    #[test]
    fn test_normalize_languages() {
        let codes = langs(&["ENG", "en", "jpn", "english", " spa "]);
        assert_eq!(normalize_languages(&codes, "audio"), langs(&["eng", "jpn", "spa"]));
    }
}
