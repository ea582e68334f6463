// Removes reasoning/thinking spans from model output before it reaches
// clients. Spans are delimited by a fixed start/end marker pair and may
// nest; only complete spans are removed.

use std::borrow::Cow;

/// Filter that strips marker-delimited spans from text.
///
/// An opening marker with no matching close is left in place, on the
/// assumption that the delimiters arrived split across deltas and the
/// text is not actually a reasoning span.
#[derive(Debug, Clone)]
pub struct SpanFilter {
    start_marker: String,
    end_marker: String,
}

impl SpanFilter {
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker: end_marker.into(),
        }
    }

    /// Filter for the `<think>...</think>` convention used by
    /// reasoning-capable chat models.
    pub fn thinking() -> Self {
        Self::new("<think>", "</think>")
    }

    /// Strip every complete span from `text`, including nested spans.
    ///
    /// Returns the input unchanged (borrowed) when no start marker is
    /// present, which is the overwhelmingly common case for streamed
    /// deltas.
    pub fn strip<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(&self.start_marker) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find(&self.start_marker) {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + self.start_marker.len()..];
            match self.matching_end(after_open) {
                Some(close) => {
                    rest = &after_open[close + self.end_marker.len()..];
                }
                None => {
                    // Unterminated span: pass the remainder through verbatim.
                    out.push_str(&rest[open..]);
                    return Cow::Owned(out);
                }
            }
        }

        out.push_str(rest);
        Cow::Owned(out)
    }

    /// Find the end marker that closes an already-open span, accounting
    /// for nested start markers. Returns the byte offset of the matching
    /// end marker within `text`.
    fn matching_end(&self, text: &str) -> Option<usize> {
        let mut depth = 1usize;
        let mut pos = 0usize;

        while pos <= text.len() {
            let next_start = text[pos..].find(&self.start_marker).map(|i| i + pos);
            let next_end = text[pos..].find(&self.end_marker).map(|i| i + pos)?;

            match next_start {
                Some(s) if s < next_end => {
                    depth += 1;
                    pos = s + self.start_marker.len();
                }
                _ => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(next_end);
                    }
                    pos = next_end + self.end_marker.len();
                }
            }
        }

        None
    }
}

impl Default for SpanFilter {
    fn default() -> Self {
        Self::thinking()
    }
}

/// Strip `<think>...</think>` spans from `text`.
pub fn strip_thinking(text: &str) -> Cow<'_, str> {
    SpanFilter::thinking().strip(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_is_borrowed() {
        let filter = SpanFilter::thinking();
        let result = filter.strip("plain visible text");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "plain visible text");
    }

    #[test]
    fn test_strips_single_span() {
        let filter = SpanFilter::thinking();
        assert_eq!(
            filter.strip("<think>ignore me</think>visible text"),
            "visible text"
        );
    }

    #[test]
    fn test_strips_multiple_spans() {
        let filter = SpanFilter::thinking();
        assert_eq!(
            filter.strip("a<think>one</think>b<think>two</think>c"),
            "abc"
        );
    }

    #[test]
    fn test_strips_nested_spans() {
        let filter = SpanFilter::thinking();
        assert_eq!(
            filter.strip("before<think>outer<think>inner</think>still outer</think>after"),
            "beforeafter"
        );
    }

    #[test]
    fn test_unterminated_span_passes_through() {
        let filter = SpanFilter::thinking();
        assert_eq!(
            filter.strip("visible<think>truncated reasoning"),
            "visible<think>truncated reasoning"
        );
    }

    #[test]
    fn test_stray_end_marker_passes_through() {
        let filter = SpanFilter::thinking();
        assert_eq!(filter.strip("leftover</think>text"), "leftover</think>text");
    }

    #[test]
    fn test_span_only_delta_becomes_empty() {
        let filter = SpanFilter::thinking();
        assert_eq!(filter.strip("<think>all reasoning</think>"), "");
    }

    #[test]
    fn test_custom_markers() {
        let filter = SpanFilter::new("[reason]", "[/reason]");
        assert_eq!(filter.strip("x[reason]hidden[/reason]y"), "xy");
    }

    #[test]
    fn test_strip_thinking_helper() {
        assert_eq!(strip_thinking("<think>a</think>b"), "b");
    }
}
