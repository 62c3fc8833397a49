use std::collections::HashSet;

/// Canonical comparison form of an ingredient name: trimmed and lowercased.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whitespace-separated words of the normalized name.
pub fn word_set(name: &str) -> HashSet<String> {
    normalize(name)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Red Onion \t"), "red onion");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_word_set_dedups() {
        let words = word_set("Olive  oil OIL");
        assert_eq!(words.len(), 2);
        assert!(words.contains("olive"));
        assert!(words.contains("oil"));
    }
}
