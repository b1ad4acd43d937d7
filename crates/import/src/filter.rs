use crate::rules::NoteReplacement;

/// True when the description contains any skip pattern. Patterns must be
/// lower-case.
pub fn should_skip(description: &str, skip_patterns: &[String]) -> bool {
    let lower = description.to_lowercase();
    skip_patterns.iter().any(|p| lower.contains(p.as_str()))
}

/// Replace the whole note with the first matching replacement, or return the
/// description unchanged.
pub fn clean_note(description: &str, replacements: &[NoteReplacement]) -> String {
    let lower = description.to_lowercase();
    replacements
        .iter()
        .find(|r| lower.contains(r.pattern.as_str()))
        .map(|r| r.replacement.clone())
        .unwrap_or_else(|| description.to_string())
}
