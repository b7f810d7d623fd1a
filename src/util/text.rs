use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` (on a grapheme boundary) that fits in `max_cells`
pub fn fitting_prefix(s: &str, max_cells: usize) -> &str {
    let mut width = 0;
    let mut end = 0;
    for (i, g) in s.grapheme_indices(true) {
        let gw = UnicodeWidthStr::width(g);
        if width + gw > max_cells {
            break;
        }
        width += gw;
        end = i + g.len();
    }
    &s[..end]
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…`
/// if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let mut result = fitting_prefix(s, max_cells - 1).to_string();
    result.push('\u{2026}');
    result
}

/// Split `text` into runs, flagging the runs covered by `hits`.
///
/// Hits are byte ranges in ascending order; ranges past the end of the text
/// are clipped and ranges not on char boundaries are ignored.
pub fn split_highlights<'a>(text: &'a str, hits: &[Range<usize>]) -> Vec<(&'a str, bool)> {
    let mut runs = Vec::new();
    let mut pos = 0;
    for hit in hits {
        let start = hit.start.max(pos);
        let end = hit.end.min(text.len());
        if start >= end || !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        if start > pos {
            runs.push((&text[pos..start], false));
        }
        runs.push((&text[start..end], true));
        pos = end;
    }
    if pos < text.len() {
        runs.push((&text[pos..], false));
    }
    runs
}

/// Greedy word wrap to `width` cells. Words longer than a line are cut.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while display_width(word) > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let head = fitting_prefix(word, width);
            if head.is_empty() {
                break;
            }
            lines.push(head.to_string());
            word = &word[head.len()..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() {
            display_width(word)
        } else {
            display_width(&line) + 1 + display_width(word)
        };
        if needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("hello world", 8), "hello w\u{2026}");
        assert_eq!(truncate_to_width("hello", 5), "hello");
        assert_eq!(truncate_to_width("hello", 0), "");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
    }

    #[test]
    fn truncate_wide_chars() {
        // Each CJK character is two cells wide
        assert_eq!(truncate_to_width("日本語テキスト", 6), "日本\u{2026}");
        assert_eq!(display_width("日本語"), 6);
    }

    #[test]
    fn highlights_split_into_runs() {
        assert_eq!(
            split_highlights("Design login page", &[7..12]),
            vec![("Design ", false), ("login", true), (" page", false)]
        );
        assert_eq!(
            split_highlights("banana", &[1..3, 3..5]),
            vec![("b", false), ("an", true), ("an", true), ("a", false)]
        );
        assert_eq!(split_highlights("abc", &[]), vec![("abc", false)]);
        assert_eq!(split_highlights("", &[0..2]), Vec::<(&str, bool)>::new());
    }

    #[test]
    fn highlights_clip_out_of_range() {
        assert_eq!(
            split_highlights("abc", &[1..10]),
            vec![("a", false), ("bc", true)]
        );
        // 'é' is two bytes; a range ending inside it is dropped
        assert_eq!(split_highlights("é", &[0..1]), vec![("é", false)]);
    }

    #[test]
    fn wrap() {
        assert_eq!(
            wrap_words("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_words("   ", 5).is_empty());
    }
}
