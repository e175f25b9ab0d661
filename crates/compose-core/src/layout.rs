//! Width-constrained text layout.
//!
//! Greedy word wrapping against a measured font metric. The measure is a
//! trait so the renderer can plug in real glyph advances while tests use a
//! fixed-width stand-in.

/// Measures the rendered pixel width of a text run.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> f32;
}

/// Wrap `text` into lines whose measured width stays within `max_width`.
///
/// Words accumulate onto the current line while the joined candidate still
/// fits; otherwise the line is closed and the word starts the next one. A
/// single word wider than the bound is placed alone on its own line, never
/// split mid-word. Empty input yields no lines.
pub fn wrap_text(text: &str, measure: &dyn TextMeasure, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current.join(" "), word)
        };

        if measure.text_width(&candidate) <= max_width {
            current.push(word);
        } else if current.is_empty() {
            // Overlong word: stands alone.
            lines.push(word.to_string());
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }

    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Every character is `advance` pixels wide.
    struct FixedAdvance {
        advance: f32,
    }

    impl TextMeasure for FixedAdvance {
        fn text_width(&self, text: &str) -> f32 {
            text.chars().count() as f32 * self.advance
        }
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        let measure = FixedAdvance { advance: 10.0 };
        assert!(wrap_text("", &measure, 100.0).is_empty());
        assert!(wrap_text("   ", &measure, 100.0).is_empty());
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let measure = FixedAdvance { advance: 10.0 };
        let lines = wrap_text("hello world", &measure, 200.0);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn test_title_wraps_preserving_word_order() {
        let measure = FixedAdvance { advance: 10.0 };
        // Bound fits roughly three short words per line.
        let lines = wrap_text("A Very Long Title That Needs Wrapping", &measure, 160.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure.text_width(line) <= 160.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), "A Very Long Title That Needs Wrapping");
    }

    #[test]
    fn test_overlong_word_placed_alone() {
        let measure = FixedAdvance { advance: 10.0 };
        let lines = wrap_text("hi supercalifragilistic yo", &measure, 100.0);
        assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
    }

    #[test]
    fn test_overlong_word_at_start() {
        let measure = FixedAdvance { advance: 10.0 };
        let lines = wrap_text("incomprehensibilities ok", &measure, 100.0);
        assert_eq!(lines, vec!["incomprehensibilities", "ok"]);
    }

    proptest! {
        #[test]
        fn prop_every_line_fits_or_is_a_lone_word(
            words in proptest::collection::vec("[a-z]{1,20}", 0..40),
            bound in 30.0f32..300.0,
        ) {
            let measure = FixedAdvance { advance: 10.0 };
            let text = words.join(" ");
            let lines = wrap_text(&text, &measure, bound);

            for line in &lines {
                let fits = measure.text_width(line) <= bound;
                let lone_word = !line.contains(' ');
                prop_assert!(fits || lone_word, "wide multi-word line: {}", line);
            }

            // No words lost or reordered.
            let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
            prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
