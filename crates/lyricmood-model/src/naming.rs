/// File-system-safe name for a song's output files and directories.
///
/// Keeps the title readable (spaces and case survive) and only replaces
/// characters that would break a path on common platforms.
pub fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem.to_string()
    }
}
