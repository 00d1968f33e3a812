/// Escapes characters that are unsafe in file names.
///
/// Track identifiers are opaque strings supplied by upstream resolvers;
/// before one becomes part of a cache path, path separators, Windows
/// reserved characters and control characters are replaced so the file
/// always lands inside the downloads directory.
///
/// # Example
///
/// ```
/// use trackfetch::core::utils::escape_filename;
///
/// assert_eq!(escape_filename("abc123"), "abc123");
/// assert_eq!(escape_filename("a/b:c"), "a_b_c");
/// ```
pub fn escape_filename(name: &str) -> String {
    let mut result = String::with_capacity(name.len());

    for c in name.chars() {
        match c {
            '/' | '\\' => result.push('_'),
            ':' | '*' | '?' | '<' | '>' | '|' => result.push('_'),
            '"' => result.push('\''),
            c if c.is_control() => result.push('_'),
            _ => result.push(c),
        }
    }

    // Leading/trailing whitespace and dots are problematic on Windows
    let result = result.trim_matches(|c: char| c.is_whitespace() || c == '.');

    if result.is_empty() {
        "unnamed".to_string()
    } else {
        result.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_filename;

    #[test]
    fn test_escape_filename_passthrough() {
        assert_eq!(escape_filename("dQw4w9WgXcQ"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_escape_filename_separators() {
        assert_eq!(escape_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(escape_filename("a\\b"), "a_b");
    }

    #[test]
    fn test_escape_filename_reserved() {
        assert_eq!(escape_filename("id:name*?"), "id_name__");
        assert_eq!(escape_filename("he said \"hi\""), "he said 'hi'");
    }

    #[test]
    fn test_escape_filename_empty_becomes_unnamed() {
        assert_eq!(escape_filename(""), "unnamed");
        assert_eq!(escape_filename("..."), "unnamed");
    }
}
