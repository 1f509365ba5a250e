//! Text cleanup.

/// Trims and collapses internal whitespace, including line breaks from PDF cells.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  Temp\n agua   entrada "), "Temp agua entrada");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("Descripción larga", 11), "Descripción");
        assert_eq!(truncate_chars("corto", 60), "corto");
        assert_eq!(truncate_chars("ab cd", 3), "ab");
    }
}
