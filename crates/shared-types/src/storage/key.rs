//! # Composite Keys
//!
//! Tables are laid out as `table \0 kind \0 part \0 part ...`. Owner IDs are
//! frequently URLs, so `:` or `/` cannot be used as separators; NUL never
//! occurs in identifiers.

/// Separator between key components.
pub const SEPARATOR: u8 = 0;

/// Join components into one key.
pub fn compose(parts: &[&str]) -> Vec<u8> {
    let mut key = Vec::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            key.push(SEPARATOR);
        }
        key.extend_from_slice(part.as_bytes());
    }
    key
}

/// Prefix matching every key that starts with exactly these components.
pub fn prefix(parts: &[&str]) -> Vec<u8> {
    let mut key = compose(parts);
    key.push(SEPARATOR);
    key
}

/// Split a key back into its components. Returns `None` on non-UTF-8 data.
pub fn split(key: &[u8]) -> Option<Vec<String>> {
    key.split(|b| *b == SEPARATOR)
        .map(|part| String::from_utf8(part.to_vec()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_and_split() {
        let key = compose(&["tgt_alias", "row", "t1", "https://sp.example.org/a:b"]);
        let parts = split(&key).unwrap();
        assert_eq!(parts, ["tgt_alias", "row", "t1", "https://sp.example.org/a:b"]);
    }

    #[test]
    fn test_prefix_does_not_match_longer_component() {
        let row = compose(&["tgt", "row", "t10"]);
        assert!(!row.starts_with(&prefix(&["tgt", "row", "t1"])));
        assert!(row.starts_with(&prefix(&["tgt", "row"])));
    }
}
