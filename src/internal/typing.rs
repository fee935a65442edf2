use std::time::Duration;

/// Delay before the next character is appended.
pub const TYPE_FORWARD_DELAY: Duration = Duration::from_millis(80);
/// Delay before the next character is removed.
pub const TYPE_BACKWARD_DELAY: Duration = Duration::from_millis(50);
/// Hold time on a fully typed word before deletion starts.
pub const TYPE_PAUSE_DELAY: Duration = Duration::from_millis(900);

/// Looping type-and-delete banner for the hero section.
///
/// Each `tick` advances the animation by one step and reports how long to
/// wait before the next one. The cursor position deliberately overshoots by
/// one past the end of a word: the tick that detects completion switches
/// direction without changing the visible text, and the first backward tick
/// then lands back on the full word. The displayed prefix is clamped, so the
/// overshoot never shows.
#[derive(Debug, Clone)]
pub struct TypingBanner {
    words: Vec<String>,
    word_idx: usize,
    char_idx: usize,
    forward: bool,
}

impl TypingBanner {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            word_idx: 0,
            char_idx: 0,
            forward: true,
        }
    }

    /// Whether the banner has anything to animate. A disabled banner is
    /// never ticked.
    pub fn enabled(&self) -> bool {
        !self.words.is_empty()
    }

    /// The currently visible prefix of the active word.
    pub fn text(&self) -> String {
        match self.words.get(self.word_idx) {
            Some(word) => word.chars().take(self.char_idx).collect(),
            None => String::new(),
        }
    }

    /// Advance one animation step and return the delay until the next.
    pub fn tick(&mut self) -> Duration {
        let Some(word) = self.words.get(self.word_idx) else {
            return TYPE_PAUSE_DELAY;
        };
        let len = word.chars().count();

        if self.forward {
            self.char_idx += 1;
            if self.char_idx > len {
                self.forward = false;
                return TYPE_PAUSE_DELAY;
            }
            TYPE_FORWARD_DELAY
        } else {
            self.char_idx = self.char_idx.saturating_sub(1);
            if self.char_idx == 0 {
                self.forward = true;
                self.word_idx = (self.word_idx + 1) % self.words.len();
                TYPE_FORWARD_DELAY
            } else {
                TYPE_BACKWARD_DELAY
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_words() {
        let banner = TypingBanner::new(Vec::new());
        assert!(!banner.enabled());
        assert_eq!(banner.text(), "");
    }

    #[test]
    fn full_cycle_over_two_words() {
        let mut banner = TypingBanner::new(vec!["ab".into(), "c".into()]);

        // (visible text after tick, delay returned by tick)
        let expected = [
            ("a", TYPE_FORWARD_DELAY),
            ("ab", TYPE_FORWARD_DELAY),
            // Completion detected: direction flips, text holds at the
            // full word through the pause.
            ("ab", TYPE_PAUSE_DELAY),
            // First backward tick lands on the overshoot, so nothing
            // visibly changes yet.
            ("ab", TYPE_BACKWARD_DELAY),
            ("a", TYPE_BACKWARD_DELAY),
            // Deletion finished: advance to the next word.
            ("", TYPE_FORWARD_DELAY),
            ("c", TYPE_FORWARD_DELAY),
            ("c", TYPE_PAUSE_DELAY),
            ("c", TYPE_BACKWARD_DELAY),
            ("", TYPE_FORWARD_DELAY),
        ];

        for (i, (text, delay)) in expected.iter().enumerate() {
            let d = banner.tick();
            assert_eq!(banner.text(), *text, "text mismatch at tick {}", i + 1);
            assert_eq!(d, *delay, "delay mismatch at tick {}", i + 1);
        }

        // The cycle wrapped back to the first word.
        let d = banner.tick();
        assert_eq!(banner.text(), "a");
        assert_eq!(d, TYPE_FORWARD_DELAY);
    }

    #[test]
    fn multibyte_words_never_split_characters() {
        let mut banner = TypingBanner::new(vec!["héllo".into()]);

        banner.tick();
        banner.tick();
        assert_eq!(banner.text(), "hé");

        // Run well past a full cycle; clamped slicing must hold on every
        // intermediate state.
        for _ in 0..40 {
            banner.tick();
            let _ = banner.text();
        }
    }

    #[test]
    fn empty_word_in_rotation_does_not_stall() {
        let mut banner = TypingBanner::new(vec!["".into(), "x".into()]);

        // First tick overshoots the empty word straight into the pause.
        assert_eq!(banner.tick(), TYPE_PAUSE_DELAY);
        assert_eq!(banner.text(), "");

        // Backward tick drops to zero and rotates onward.
        assert_eq!(banner.tick(), TYPE_FORWARD_DELAY);
        banner.tick();
        assert_eq!(banner.text(), "x");
    }
}
