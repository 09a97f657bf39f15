use unicode_normalization::UnicodeNormalization;

/// Prepare raw lyrics for sentence segmentation.
///
/// NFC + trailing whitespace cleanup, then [`strip_annotations`], then
/// [`terminate_lines`]. Each lyric line becomes its own sentence.
pub fn normalize_lyrics(raw: &str) -> String {
    let text = normalize_text(raw);
    let text = strip_annotations(&text);
    terminate_lines(&text)
}

/// Normalize Unicode text to NFC form and trim trailing whitespace per line.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();

    nfc.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove lines that are entirely a bracketed annotation, e.g. `[Chorus]`
/// or `[Verse 2: Khalid]`.
pub fn strip_annotations(input: &str) -> String {
    input
        .lines()
        .filter(|line| !is_annotation(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_annotation(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// Append `.` to every line that ends in a word character.
///
/// Lines already ending in punctuation (`.`, `!`, `?`, `,`, quotes, ...)
/// and blank lines are left alone.
pub fn terminate_lines(input: &str) -> String {
    input
        .lines()
        .map(|line| {
            let body = line.trim_end();
            match body.chars().last() {
                Some(c) if c.is_alphanumeric() || c == '_' => {
                    format!("{body}.{}", &line[body.len()..])
                }
                _ => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse multiple consecutive blank lines into a single blank line.
pub fn collapse_blank_lines(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_blank = false;

    for line in input.lines() {
        let is_blank = line.trim().is_empty();
        if is_blank && prev_blank {
            continue;
        }
        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(line);
        prev_blank = is_blank;
    }

    result
}
