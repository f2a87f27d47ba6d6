//! Normalized edit-distance similarity between suggestion strings.

/// Default threshold above which two suggestions are considered the same.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Returns `1 - levenshtein(a, b) / max(len(a), len(b))`, counted in chars.
///
/// Two empty strings are identical (similarity 1). The measure is symmetric
/// and always within `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Lowercases and strips all whitespace.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns true when two suggestions should be folded together.
///
/// Matches exactly, after case and whitespace normalization, or when the
/// similarity of the normalized forms reaches `threshold`.
pub fn are_similar(a: &str, b: &str, threshold: f64) -> bool {
    if a == b {
        return true;
    }

    let left = normalize(a);
    let right = normalize(b);
    if left == right {
        return true;
    }

    similarity(&left, &right) >= threshold
}
