// Terminal prompt adapter - Interactive stream choice on stdin/stderr

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::{self, BufRead, IsTerminal, Write};

use tracing::{error, warn};

use crate::domain::model::MediaKind;
use crate::ports::{ChoiceOption, ChoicePrompt};

/// Asks the operator which streams to keep
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal(),
        }
    }

    fn read_line() -> io::Result<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl ChoicePrompt for TerminalPrompt {
    fn present_choices(&mut self, kind: MediaKind, options: &[ChoiceOption]) -> Vec<usize> {
        if !self.interactive {
            warn!(
                "stdin is not a terminal; keeping all {} {} candidates",
                options.len(),
                kind
            );
            return (0..options.len()).collect();
        }

        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\nmultiple {} streams found:\n{}  * selection [eg. 1 2 3, 1-3, 0 for none, a for all]: ",
            kind,
            render_options(options)
        );
        let _ = stderr.flush();

        match Self::read_line() {
            Ok(line) => parse_selection(&line, options.len()),
            Err(e) => {
                error!("failed to read selection: {}", e);
                (0..options.len()).collect()
            }
        }
    }
}

/// Numbered listing of `options` with their detail lines
pub fn render_options(options: &[ChoiceOption]) -> String {
    let width = if options.len() > 9 { 2 } else { 1 };
    let mut out = String::new();

    for (i, option) in options.iter().enumerate() {
        let _ = write!(out, "  [{:0width$}]: {}", i + 1, option.heading, width = width);
        if !option.subheading.is_empty() {
            let _ = write!(out, " - {}", option.subheading);
        }
        out.push('\n');
        for detail in &option.details {
            let _ = writeln!(out, "     * {} {}", detail.heading, detail.text);
        }
    }
    out
}

/// Parse a selection such as `1 3-4`. Empty or `a` means everything, `0` means
/// nothing. Returns sorted 0-based positions.
pub fn parse_selection(input: &str, count: usize) -> Vec<usize> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('a') {
        return (0..count).collect();
    }
    if input.starts_with('0') {
        return Vec::new();
    }

    let mut chosen = BTreeSet::new();
    for token in input.split_whitespace() {
        let range = token
            .split_once('-')
            .and_then(|(a, b)| Some((a.parse::<i64>().ok()?, b.parse::<i64>().ok()?)));

        match range {
            Some((mut lo, mut hi)) => {
                if hi < lo {
                    std::mem::swap(&mut lo, &mut hi);
                }
                if lo < 1 || hi > count as i64 {
                    warn!("truncating invalid range '{}'", token);
                }
                let lo = lo.max(1);
                let hi = hi.min(count as i64);
                chosen.extend((lo..=hi).map(|n| (n - 1) as usize));
            }
            None => match token.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => {
                    chosen.insert(n - 1);
                }
                _ => warn!("ignoring invalid input '{}'", token),
            },
        }
    }

    chosen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StreamRef;
    use crate::ports::ChoiceDetail;

    #[test]
    fn test_all_and_none() {
        assert_eq!(parse_selection("", 3), vec![0, 1, 2]);
        assert_eq!(parse_selection("  \n", 3), vec![0, 1, 2]);
        assert_eq!(parse_selection("a", 3), vec![0, 1, 2]);
        assert_eq!(parse_selection("all", 2), vec![0, 1]);
        assert_eq!(parse_selection("0", 3), Vec::<usize>::new());
    }

    #[test]
    fn test_numbers_and_ranges() {
        assert_eq!(parse_selection("3 1", 4), vec![0, 2]);
        assert_eq!(parse_selection("2-3", 4), vec![1, 2]);
        assert_eq!(parse_selection("3-2", 4), vec![1, 2]);
        assert_eq!(parse_selection("1 1 1-2", 4), vec![0, 1]);
    }

    #[test]
    fn test_invalid_tokens() {
        assert_eq!(parse_selection("7 x 2", 3), vec![1]);
        assert_eq!(parse_selection("2-9", 3), vec![1, 2]);
        assert_eq!(parse_selection("1 0", 3), vec![0]);
    }

    #[test]
    fn test_render_options() {
        let options = vec![ChoiceOption {
            stream: StreamRef::primary(2),
            heading: "aac".to_string(),
            subheading: "idx 2, eng, 00:23:40".to_string(),
            details: vec![ChoiceDetail {
                heading: "name:".to_string(),
                text: "Stereo".to_string(),
            }],
        }];

        let text = render_options(&options);
        assert!(text.contains("[1]: aac - idx 2, eng, 00:23:40"));
        assert!(text.contains("* name: Stereo"));
    }
}
