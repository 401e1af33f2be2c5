use crate::scanner::{CONTEXT_RADIUS, context_window, find_context};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_centered_on_match() {
        let line = format!("{}keyword{}", "x".repeat(200), "y".repeat(200));
        let found = find_context(&line, "keyword").unwrap();

        assert!(found.context.chars().count() <= 50 + "keyword".len() + 50);
        let expected = format!("{}keyword{}", "x".repeat(50), "y".repeat(43));
        assert_eq!(found.context, expected);
    }

    #[test]
    fn test_window_clamped_to_line_start() {
        let line = format!("abc keyword {}", "z".repeat(100));
        let found = find_context(&line, "keyword").unwrap();
        assert!(found.context.starts_with("abc keyword"));
        assert_eq!(found.context.chars().count(), 4 + CONTEXT_RADIUS);
    }

    #[test]
    fn test_window_clamped_to_line_end() {
        let line = format!("{}keyword!", "a".repeat(80));
        let found = find_context(&line, "keyword").unwrap();
        assert_eq!(found.context, format!("{}keyword!", "a".repeat(50)));
    }

    #[test]
    fn test_short_line_returned_whole() {
        assert_eq!(context_window("a keyword b", 2), "a keyword b");
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let line = format!("{}keyword{}", "é".repeat(60), "ü".repeat(60));
        let found = find_context(&line, "keyword").unwrap();
        let expected = format!("{}keyword{}", "é".repeat(50), "ü".repeat(43));
        assert_eq!(found.context, expected);
    }
}
