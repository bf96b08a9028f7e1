use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of hyphens, underscores and whitespace inside a tag
    /// - "trip-hazard" -> "trip hazard", "fallen__tree  limb" -> "fallen tree limb"
    static ref TAG_SEPARATORS: Regex = Regex::new(r"[-_\s]+").unwrap();

    /// Characters that would move an object key out of its namespace
    static ref PATH_SEPARATORS: Regex = Regex::new(r"[/\\]").unwrap();
}

/// Display label for a category tag: separators collapsed to one space, upper-cased
pub fn tag_label(tag: &str) -> String {
    TAG_SEPARATORS
        .replace_all(tag, " ")
        .trim()
        .to_uppercase()
}

/// Style-key form of a tag: separators collapsed to `-`, lower-cased
pub fn tag_slug(tag: &str) -> String {
    TAG_SEPARATORS
        .replace_all(tag.trim(), "-")
        .trim_matches('-')
        .to_lowercase()
}

/// Filename as it will appear inside an object key. Everything is kept
/// verbatim except path separators, which become `_`.
pub fn key_safe_filename(filename: &str) -> String {
    let name = PATH_SEPARATORS.replace_all(filename.trim(), "_");
    if name.is_empty() {
        "unnamed".to_string()
    } else {
        name.into_owned()
    }
}
