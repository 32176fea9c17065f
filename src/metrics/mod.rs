//! Text normalization and error-rate metrics.
//!
//! Edit distance is delegated to strsim; the functions here only choose the
//! granularity (words or characters) and normalize by reference length.

/// Normalize reference text: newlines become spaces, outer whitespace is
/// trimmed.
pub fn normalize_text(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

/// Word error rate: word-level edit distance normalized by the reference
/// word count.
///
/// An empty reference scores 0.0 against an empty hypothesis and 1.0
/// otherwise.
pub fn wer(reference: &str, hypothesis: &str) -> f64 {
    let ref_words: Vec<&str> = reference.split_whitespace().collect();
    let hyp_words: Vec<&str> = hypothesis.split_whitespace().collect();

    if ref_words.is_empty() {
        return if hyp_words.is_empty() { 0.0 } else { 1.0 };
    }

    strsim::generic_levenshtein(&ref_words, &hyp_words) as f64 / ref_words.len() as f64
}

/// Character error rate: char-level edit distance normalized by the
/// reference character count.
pub fn cer(reference: &str, hypothesis: &str) -> f64 {
    let ref_len = reference.chars().count();

    if ref_len == 0 {
        return if hypothesis.is_empty() { 0.0 } else { 1.0 };
    }

    strsim::levenshtein(reference, hypothesis) as f64 / ref_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_replaces_newlines_and_trims() {
        assert_eq!(normalize_text("  hello\nworld \n"), "hello world");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = ["hello\nworld", "  padded  ", "line\n\nbreaks\n", ""];
        for input in inputs {
            let once = normalize_text(input);
            assert_eq!(normalize_text(&once), once);
        }
    }

    #[test]
    fn test_wer_identical_strings() {
        assert_eq!(wer("hello world", "hello world"), 0.0);
    }

    #[test]
    fn test_wer_one_substitution_in_two_words() {
        assert_eq!(wer("hello world", "hello there"), 0.5);
    }

    #[test]
    fn test_wer_insertion() {
        // One inserted word against a two-word reference.
        assert_eq!(wer("hello world", "hello big world"), 0.5);
    }

    #[test]
    fn test_wer_empty_reference() {
        assert_eq!(wer("", ""), 0.0);
        assert_eq!(wer("", "noise"), 1.0);
    }

    #[test]
    fn test_cer_known_distance() {
        // "abc" -> "axc": one substitution over three chars.
        let value = cer("abc", "axc");
        assert!((value - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cer_empty_reference() {
        assert_eq!(cer("", ""), 0.0);
        assert_eq!(cer("", "x"), 1.0);
    }

    #[test]
    fn test_metrics_are_deterministic() {
        let reference = "the quick brown fox";
        let hypothesis = "the quick brown socks";

        assert_eq!(wer(reference, hypothesis), wer(reference, hypothesis));
        assert_eq!(cer(reference, hypothesis), cer(reference, hypothesis));
    }
}
