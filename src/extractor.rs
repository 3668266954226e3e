use tracing::warn;

/// Tag name of one record block.
pub const RECORD_TAG: &str = "Listing";
/// Tag name of the container element wrapping the full record set.
pub const CONTAINER_TAG: &str = "Listings";

/// How much of the document to show when no records are found.
const PREVIEW_CHARS: usize = 400;

/// Wrapper text surrounding the records; prefix + records + suffix must be a
/// structurally valid document.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapper {
    pub prefix: String,
    pub suffix: String,
}

/// Extract every record block from `document`, in document order, along with
/// the wrapper needed to rebuild a standalone document around any subset.
///
/// Returns [`crate::error::FeedError::NoRecordsFound`] when the document
/// contains no record blocks, after logging a bounded preview of it.
pub fn extract(document: &str) -> Result<(Vec<String>, Wrapper), crate::error::FeedError> {
    let records = scan_records(document, RECORD_TAG);
    if records.is_empty() {
        let preview: String = document.chars().take(PREVIEW_CHARS).collect();
        warn!("no <{}> blocks found; document starts with:\n{}", RECORD_TAG, preview);
        return Err(crate::error::FeedError::NoRecordsFound);
    }

    let wrapper = detect_wrapper(document, CONTAINER_TAG, &records);
    let texts = records.iter().map(|r| document[r.0..r.1].to_string()).collect();
    Ok((texts, wrapper))
}

/// Scan for non-overlapping `<tag ...>...</tag>` spans, case-insensitively,
/// each closed at the nearest matching close tag (no backtracking, so sibling
/// records are captured individually). Returns byte ranges into `document`.
///
/// Nesting of same-named records is not supported: an inner open tag ends at
/// the first close tag, leaving the outer close to be skipped as plain text.
/// The source feed does not nest records, so this is acceptable.
fn scan_records(document: &str, tag: &str) -> Vec<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(start) = find_ci(document, &open, pos) {
        // Reject longer tag names sharing this prefix (e.g. the container).
        let after_open = start + open.len();
        match document.as_bytes().get(after_open) {
            Some(b) if b.is_ascii_alphanumeric() => {
                pos = start + 1;
                continue;
            }
            None => break,
            _ => {}
        }

        let Some((_, end)) = find_close(document, &close, after_open) else {
            break;
        };
        spans.push((start, end));
        pos = end;
    }

    spans
}

/// Find the nearest `</tag>` at or after `from`, skipping longer tag names
/// sharing the prefix. Returns (start of close tag, end past its '>').
fn find_close(document: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(start) = find_ci(document, close, pos) {
        let after = start + close.len();
        match document.as_bytes().get(after) {
            Some(b) if b.is_ascii_alphanumeric() => {
                pos = start + 1;
                continue;
            }
            None => return None,
            _ => {}
        }
        // Close tag runs through its '>' (allows `</Listing >`).
        let gt = document[after..].find('>')?;
        return Some((start, after + gt + 1));
    }
    None
}

/// Locate the container's opening and closing tags and split the document
/// around the records. Falls back to a synthesized container when either tag
/// is missing, preserving the text outside the records so nothing is lost.
fn detect_wrapper(document: &str, tag: &str, records: &[(usize, usize)]) -> Wrapper {
    let open_tag = find_open_tag(document, tag);
    let close_tag = find_close(document, &format!("</{tag}"), 0);

    if let (Some((_, open_end)), Some((close_start, _))) = (open_tag, close_tag) {
        if open_end <= close_start {
            return Wrapper {
                prefix: document[..open_end].to_string(),
                suffix: document[close_start..].to_string(),
            };
        }
    }

    // Container tags absent or inverted: synthesize one. Outer envelope
    // structure is lost, but every reconstructed batch stays well-formed.
    warn!("container <{tag}> tags not found; synthesizing wrapper");
    let first = records.first().map(|r| r.0).unwrap_or(0);
    let last = records.last().map(|r| r.1).unwrap_or(document.len());
    Wrapper {
        prefix: format!("{}<{tag}>", &document[..first]),
        suffix: format!("</{tag}>{}", &document[last..]),
    }
}

/// Find the container opening tag `<tag ...>` and return (start, end-past-'>').
fn find_open_tag(document: &str, tag: &str) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let mut pos = 0;
    while let Some(start) = find_ci(document, &open, pos) {
        let after = start + open.len();
        match document.as_bytes().get(after) {
            Some(b) if b.is_ascii_alphanumeric() => {
                pos = start + 1;
                continue;
            }
            None => return None,
            _ => {}
        }
        let gt = document[after..].find('>')?;
        return Some((start, after + gt + 1));
    }
    None
}

/// Case-insensitive (ASCII) substring search starting at byte offset `from`.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || from + n.len() > h.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
