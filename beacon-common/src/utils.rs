/// Truncates a string to at most `max_chars` characters.
///
/// Truncation happens on character boundaries, never in the middle of a code point.
pub fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((index, _)) = s.char_indices().nth(max_chars) {
        s.truncate(index);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello".to_owned(), 3), "hel");
        assert_eq!(truncate_chars("hello".to_owned(), 5), "hello");
        assert_eq!(truncate_chars("hello".to_owned(), 10), "hello");
        assert_eq!(truncate_chars("héllo".to_owned(), 2), "hé");
    }
}
