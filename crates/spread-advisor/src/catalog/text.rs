//! Text normalization shared by catalog indexing and query scoring.

/// Words ignored when measuring partial phrase overlap. "or" stays a content word
/// since it marks a choice; see [`is_connective`].
const STOP_WORDS: &[&str] = &[
    "a", "about", "am", "an", "and", "are", "as", "at", "be", "been", "by", "can", "could", "did",
    "do", "does", "for", "from", "here", "how", "i", "if", "im", "in", "into", "is", "it", "its",
    "just", "me", "mine", "my", "of", "on", "our", "so", "that", "the", "there", "these", "this",
    "those", "to", "us", "was", "we", "were", "what", "whats", "when", "where", "which", "who",
    "why", "will", "with", "would", "you", "your",
];

/// Lowercase, drop apostrophes, turn every other non-alphanumeric character into a
/// space and collapse runs of whitespace.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\'' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_alphanumeric() {
            cleaned.extend(ch.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Content words that only link alternatives. They count toward phrase coverage but
/// never establish a keyword match on their own.
const CONNECTIVES: &[&str] = &["nor", "or"];

pub fn is_connective(token: &str) -> bool {
    CONNECTIVES.contains(&token)
}

/// Word-boundary containment between two already-normalized strings.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let padded_haystack = format!(" {haystack} ");
    let padded_needle = format!(" {needle} ");
    padded_haystack.contains(&padded_needle)
}

/// First sentence of a prose block, terminator included.
pub fn first_sentence(text: &str) -> &str {
    let trimmed = text.trim();
    let mut chars = trimmed.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = match chars.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                return &trimmed[..index + ch.len_utf8()];
            }
        }
    }
    trimmed
}
