#[cfg(test)]
mod tests;

/// Number of characters kept on each side of the match start
pub const CONTEXT_RADIUS: usize = 50;

/// Where a keyword was first found in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMatch {
    /// Zero-based index of the matching line
    pub line_index: usize,

    /// Up to `CONTEXT_RADIUS` characters either side of the match start,
    /// taken from the trimmed, lowercased line
    pub context: String,
}

/// Finds the first line containing `keyword`, ignoring case
///
/// Each line is trimmed and lowercased before searching. Scanning stops at
/// the first matching line. An empty keyword never matches.
pub fn find_context(text: &str, keyword: &str) -> Option<ContextMatch> {
    let needle = keyword.to_lowercase();
    if needle.is_empty() {
        return None;
    }

    text.lines().enumerate().find_map(|(line_index, line)| {
        let line = normalize_line(line);
        let start = line.find(&needle)?;
        Some(ContextMatch {
            line_index,
            context: context_window(&line, start),
        })
    })
}

/// Trims and lowercases a single line
pub fn normalize_line(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Cuts the text around byte offset `match_start`, clamped to the line bounds
///
/// `match_start` must lie on a char boundary of `line`.
pub fn context_window(line: &str, match_start: usize) -> String {
    let head = &line[..match_start];
    let from = head
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map_or(0, |(i, _)| i);

    let tail = &line[match_start..];
    let to = tail
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map_or(line.len(), |(i, _)| match_start + i);

    line[from..to].to_string()
}
