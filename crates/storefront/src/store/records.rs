//! Pipe-delimited record reader shared by the store loaders.

/// A non-empty, non-comment line split on `|`.
#[derive(Debug)]
pub struct Record<'a> {
    /// 1-based line number in the source.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

/// Iterate over records in `source`, skipping blank lines and `#` comments.
///
/// Fields are trimmed.
pub fn records(source: &str) -> impl Iterator<Item = Record<'_>> {
    source.lines().enumerate().filter_map(|(index, raw)| {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(Record {
            line: index + 1,
            fields: trimmed.split('|').map(str::trim).collect(),
        })
    })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let source = "# header\n\na|b\n   \n  c | d |e  \n";
        let parsed: Vec<_> = records(source).collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].line, 3);
        assert_eq!(parsed[0].fields, vec!["a", "b"]);
        assert_eq!(parsed[1].line, 5);
        assert_eq!(parsed[1].fields, vec!["c", "d", "e"]);
    }

    #[test]
    fn test_keeps_empty_fields() {
        let parsed: Vec<_> = records("a||c").collect();
        assert_eq!(parsed[0].fields, vec!["a", "", "c"]);
    }
}
