/// Suffix appended to elided labels.
pub const ELLIPSIS: &str = "...";

/// Shortens node labels for display. Injected through [`crate::RenderContext`].
pub trait LabelTruncator {
    fn truncate(&self, text: &str, max_len: usize) -> String;
}

/// Keeps labels of up to `max_len` characters; longer ones become `max_len - 3` characters
/// followed by `...`, so the result is exactly `max_len` characters long.
#[derive(Debug, Clone, Copy, Default)]
pub struct EllipsisTruncator;

impl LabelTruncator for EllipsisTruncator {
    fn truncate(&self, text: &str, max_len: usize) -> String {
        if text.chars().count() <= max_len {
            return text.to_string();
        }
        let keep = max_len.saturating_sub(ELLIPSIS.len());
        let mut out: String = text.chars().take(keep).collect();
        out.push_str(ELLIPSIS);
        out
    }
}
