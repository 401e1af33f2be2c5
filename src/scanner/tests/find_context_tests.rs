use crate::scanner::{ContextMatch, find_context};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_line_wins() {
        let text = "line zero\nline one\nfirst keyword here\nline three\nline four\nsecond keyword here";
        let found = find_context(text, "keyword").unwrap();
        assert_eq!(found.line_index, 2);
        assert_eq!(found.context, "first keyword here");
    }

    #[test]
    fn test_case_insensitive() {
        let text = "<script src=\"https://cdn.FooBar.COM/x.js\"></script>";
        let found = find_context(text, "foobar.com").unwrap();
        assert_eq!(found.line_index, 0);
        assert!(found.context.contains("foobar.com"));

        // Upper-case keyword against lower-case text
        let found = find_context("see foobar.com", "FOOBAR.COM").unwrap();
        assert_eq!(found.context, "see foobar.com");
    }

    #[test]
    fn test_no_match_is_none() {
        assert_eq!(find_context("nothing to see\nhere either", "keyword"), None);
        assert_eq!(find_context("", "keyword"), None);
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        assert_eq!(find_context("some text", ""), None);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let found = find_context("\n\t   <b>Keyword</b>   \n", "keyword").unwrap();
        assert_eq!(
            found,
            ContextMatch {
                line_index: 1,
                context: "<b>keyword</b>".to_string(),
            }
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let found = find_context("first\r\nsecond keyword\r\n", "keyword").unwrap();
        assert_eq!(found.line_index, 1);
        assert_eq!(found.context, "second keyword");
    }

    #[test]
    fn test_deterministic() {
        let text = "a\nb googletagmanager.com c\nd googletagmanager.com";
        let first = find_context(text, "googletagmanager.com");
        let second = find_context(text, "googletagmanager.com");
        assert_eq!(first, second);
    }
}
