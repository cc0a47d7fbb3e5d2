//! Text cleanup applied at render time.

/// Strip trailing whitespace from every line, then trim the whole block.
///
/// Blank lines and leading indentation inside the block are kept.
pub fn trim_multiline(text: &str) -> String {
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Trim every item and drop the ones left empty. Order is kept and
/// duplicates are not removed.
pub fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
