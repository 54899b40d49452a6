/// Tokens that are never sung on their own.
const SPECIAL_TOKENS: [&str; 14] = ["*", ".", ",", "!", "?", "...", "…", "-", ";", ":", "(", ")", "[", "]"];

fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '*' | '.' | ',' | '!' | '?' | '…' | '-' | ';' | ':' | '(' | ')' | '[' | ']'
    )
}

/// True for transcript words that carry no lyric: empty after trimming, a
/// known punctuation token, or made only of punctuation and whitespace.
pub fn is_special_token(text: &str) -> bool {
    let word = text.trim();
    if word.is_empty() || SPECIAL_TOKENS.contains(&word) {
        return true;
    }
    word.chars().all(|c| c.is_whitespace() || is_punctuation(c))
}
