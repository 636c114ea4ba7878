/// Maximum length, in characters, of a generated file or directory name
pub const MAX_FILENAME: usize = 255;

const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Turn a show or episode title into a portable file name component.
///
/// Trims the title, deletes reserved characters, replaces tabs and spaces
/// with `_` and truncates to [`MAX_FILENAME`] characters. The result is
/// trimmed once more so that applying the function twice changes nothing.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !RESERVED.contains(c))
        .map(|c| if c == ' ' || c == '\t' { '_' } else { c })
        .take(MAX_FILENAME)
        .collect();

    cleaned.trim().to_string()
}
