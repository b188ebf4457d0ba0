//! Utterance classification

/// A classified voice utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Activate the n-th registered target (1-based)
    Select(usize),
    /// Navigate back in history
    Back,
    /// Navigate forward in history
    Forward,
    /// A vocabulary phrase matched (guided selection flows)
    Phrase(String),
    /// Nothing matched; no action, no error
    Unrecognized,
}

/// Classify a free-form utterance against a registry of `registry_len`
/// numbered targets
///
/// Lowercased and trimmed first. A whole-utterance positive integer
/// inside `[1, registry_len]` selects that target; an out-of-range
/// number is unrecognized rather than an error. Otherwise the substrings
/// "back" and "forward" map to history navigation, in that order.
#[must_use]
pub fn parse_command(transcript: &str, registry_len: usize) -> VoiceCommand {
    let normalized = transcript.trim().to_lowercase();

    if let Ok(n) = normalized.parse::<usize>() {
        if (1..=registry_len).contains(&n) {
            return VoiceCommand::Select(n);
        }
        return VoiceCommand::Unrecognized;
    }

    if normalized.contains("back") {
        return VoiceCommand::Back;
    }
    if normalized.contains("forward") {
        return VoiceCommand::Forward;
    }

    VoiceCommand::Unrecognized
}

/// Match an utterance against a fixed vocabulary of option identifiers
///
/// Returns the first option whose identifier appears in the lowercased
/// utterance. Identifiers are matched both literally ("low-vision") and
/// with their hyphens spoken as spaces ("low vision").
#[must_use]
pub fn match_phrase<'a>(transcript: &str, options: &'a [String]) -> Option<&'a str> {
    let normalized = transcript.trim().to_lowercase();

    options
        .iter()
        .find(|id| {
            let spoken = id.replace('-', " ");
            normalized.contains(id.as_str()) || normalized.contains(&spoken)
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_in_range_selects() {
        assert_eq!(parse_command("2", 5), VoiceCommand::Select(2));
        assert_eq!(parse_command(" 5 ", 5), VoiceCommand::Select(5));
    }

    #[test]
    fn number_out_of_range_is_unrecognized() {
        assert_eq!(parse_command("7", 5), VoiceCommand::Unrecognized);
        assert_eq!(parse_command("0", 5), VoiceCommand::Unrecognized);
    }

    #[test]
    fn navigation_substrings() {
        assert_eq!(parse_command("go BACK please", 5), VoiceCommand::Back);
        assert_eq!(parse_command("and forward", 5), VoiceCommand::Forward);
    }

    #[test]
    fn back_wins_over_forward() {
        // Classification order is numeric, back, forward
        assert_eq!(parse_command("back and forward", 5), VoiceCommand::Back);
    }

    #[test]
    fn gibberish_is_unrecognized() {
        assert_eq!(parse_command("open sesame", 5), VoiceCommand::Unrecognized);
        assert_eq!(parse_command("", 5), VoiceCommand::Unrecognized);
    }

    #[test]
    fn phrase_matches_hyphenated_id_spoken_with_spaces() {
        let options = vec!["low-vision".to_string(), "glaucoma".to_string()];
        assert_eq!(match_phrase("I have low vision", &options), Some("low-vision"));
        assert_eq!(match_phrase("Glaucoma", &options), Some("glaucoma"));
        assert_eq!(match_phrase("astigmatism", &options), None);
    }
}
