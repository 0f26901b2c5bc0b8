//! Cache safety of range bounds

const NOW: &str = "now";

/// Whether a bound's result depends on an unrounded "now"
///
/// This is a textual check. After the first case-insensitive `now`, the
/// bound is safe only if a `/` appears before the next whitespace or the
/// end of the text. Bounds without `now` are always safe.
pub fn is_cache_unsafe(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let Some(index) = lower.find(NOW) else {
        return false;
    };
    for c in lower[index + NOW.len()..].chars() {
        if c == '/' {
            return false;
        }
        if c.is_ascii_whitespace() {
            return true;
        }
    }
    true
}
