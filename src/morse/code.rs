//! Text to Morse transcoding
//!
//! Pure, deterministic mapping between text and dot/dash patterns using
//! the international Morse alphabet (A-Z, 0-9). Characters outside the
//! table are dropped; whitespace becomes a word gap.

use std::fmt;

/// A single element of a Morse pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorseSymbol {
    /// Short pulse
    Dot,
    /// Long pulse
    Dash,
    /// Separates letters within a word
    LetterGap,
    /// Separates words
    WordGap,
}

/// An ordered sequence of Morse symbols produced from text
///
/// The same input text always yields the same pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorsePattern {
    symbols: Vec<MorseSymbol>,
}

impl MorsePattern {
    /// The symbols in playback order
    #[must_use]
    pub fn symbols(&self) -> &[MorseSymbol] {
        &self.symbols
    }

    /// Number of symbols, gaps included
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the pattern is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Count of (dots, dashes), ignoring gaps
    #[must_use]
    pub fn pulse_counts(&self) -> (usize, usize) {
        let dots = self
            .symbols
            .iter()
            .filter(|s| **s == MorseSymbol::Dot)
            .count();
        let dashes = self
            .symbols
            .iter()
            .filter(|s| **s == MorseSymbol::Dash)
            .count();
        (dots, dashes)
    }
}

impl fmt::Display for MorsePattern {
    /// Conventional notation: `.` and `-` for pulses, a space between
    /// letters, ` / ` between words
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            match symbol {
                MorseSymbol::Dot => write!(f, ".")?,
                MorseSymbol::Dash => write!(f, "-")?,
                MorseSymbol::LetterGap => write!(f, " ")?,
                MorseSymbol::WordGap => write!(f, " / ")?,
            }
        }
        Ok(())
    }
}

/// International Morse code for a single character, if mapped
const fn code_for(c: char) -> Option<&'static str> {
    match c {
        'A' => Some(".-"),
        'B' => Some("-..."),
        'C' => Some("-.-."),
        'D' => Some("-.."),
        'E' => Some("."),
        'F' => Some("..-."),
        'G' => Some("--."),
        'H' => Some("...."),
        'I' => Some(".."),
        'J' => Some(".---"),
        'K' => Some("-.-"),
        'L' => Some(".-.."),
        'M' => Some("--"),
        'N' => Some("-."),
        'O' => Some("---"),
        'P' => Some(".--."),
        'Q' => Some("--.-"),
        'R' => Some(".-."),
        'S' => Some("..."),
        'T' => Some("-"),
        'U' => Some("..-"),
        'V' => Some("...-"),
        'W' => Some(".--"),
        'X' => Some("-..-"),
        'Y' => Some("-.--"),
        'Z' => Some("--.."),
        '0' => Some("-----"),
        '1' => Some(".----"),
        '2' => Some("..---"),
        '3' => Some("...--"),
        '4' => Some("....-"),
        '5' => Some("....."),
        '6' => Some("-...."),
        '7' => Some("--..."),
        '8' => Some("---.."),
        '9' => Some("----."),
        _ => None,
    }
}

/// Reverse lookup: code string back to its character
fn char_for(code: &str) -> Option<char> {
    ('A'..='Z')
        .chain('0'..='9')
        .find(|&c| code_for(c) == Some(code))
}

/// Encode text into a Morse pattern
///
/// Case-insensitive. Letters within a word are separated by a
/// [`MorseSymbol::LetterGap`], words by a [`MorseSymbol::WordGap`].
/// Consecutive whitespace collapses into one word gap; characters with
/// no Morse code are dropped without leaving a gap behind.
#[must_use]
pub fn encode(text: &str) -> MorsePattern {
    let mut symbols = Vec::new();
    // Tracks whether a gap must precede the next encoded letter
    let mut pending: Option<MorseSymbol> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            if !symbols.is_empty() {
                pending = Some(MorseSymbol::WordGap);
            }
            continue;
        }

        let Some(code) = code_for(c.to_ascii_uppercase()) else {
            continue;
        };

        if let Some(gap) = pending.take() {
            symbols.push(gap);
        }

        for pulse in code.chars() {
            symbols.push(match pulse {
                '.' => MorseSymbol::Dot,
                _ => MorseSymbol::Dash,
            });
        }

        pending = Some(MorseSymbol::LetterGap);
    }

    MorsePattern { symbols }
}

/// Decode a Morse pattern back to text
///
/// Companion to [`encode`]: `decode(&encode(s))` returns `s` uppercased
/// for any input made of mapped characters and single spaces. Pulse runs
/// that don't form a valid code are skipped.
#[must_use]
pub fn decode(pattern: &MorsePattern) -> String {
    let mut out = String::new();
    let mut run = String::new();

    let flush = |run: &mut String, out: &mut String| {
        if !run.is_empty() {
            if let Some(c) = char_for(run) {
                out.push(c);
            }
            run.clear();
        }
    };

    for symbol in pattern.symbols() {
        match symbol {
            MorseSymbol::Dot => run.push('.'),
            MorseSymbol::Dash => run.push('-'),
            MorseSymbol::LetterGap => flush(&mut run, &mut out),
            MorseSymbol::WordGap => {
                flush(&mut run, &mut out);
                out.push(' ');
            }
        }
    }
    flush(&mut run, &mut out);

    out
}
