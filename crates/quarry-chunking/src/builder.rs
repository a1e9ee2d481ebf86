//! Parent/child window assembly.
//!
//! Groups scanner segments into parent-sized windows, then emits
//! overlapping child chunks inside each window. Fenced code segments are
//! atomic: a fence that opens in a chunk closes in the same chunk, even
//! when that makes the chunk exceed its size target.

use quarry_core::config::ChunkingConfig;
use quarry_core::models::{Chunk, ChunkType};
use quarry_core::tokens;
use tracing::debug;

use crate::scanner::{segment, Segment};

/// Builds the two-level chunk hierarchy for one document.
pub struct ChunkBuilder {
    config: ChunkingConfig,
}

impl ChunkBuilder {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Split `text` into parent and child chunks with monotonically
    /// increasing `chunk_index` across the whole document.
    ///
    /// Emission order is document order: each parent immediately followed
    /// by its children.
    pub fn build(&self, document_id: &str, text: &str) -> Vec<Chunk> {
        let segments = segment(text);
        if segments.is_empty() {
            return Vec::new();
        }

        let windows = self.group_windows(&segments);
        let mut chunks = Vec::new();
        let mut index: u32 = 0;

        for window in &windows {
            let parent_content = window
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            let parent_id = uuid::Uuid::new_v4().to_string();

            chunks.push(Chunk {
                id: parent_id.clone(),
                document_id: document_id.to_string(),
                chunk_index: index,
                chunk_type: ChunkType::Parent,
                token_count: tokens::estimate(&parent_content),
                content: parent_content,
                parent_id: None,
                embedding: None,
            });
            index += 1;

            for child_content in self.build_children(window) {
                chunks.push(Chunk {
                    id: uuid::Uuid::new_v4().to_string(),
                    document_id: document_id.to_string(),
                    chunk_index: index,
                    chunk_type: ChunkType::Child,
                    token_count: tokens::estimate(&child_content),
                    content: child_content,
                    parent_id: Some(parent_id.clone()),
                    embedding: None,
                });
                index += 1;
            }
        }

        debug!(
            document_id,
            parents = windows.len(),
            total = chunks.len(),
            "chunked document"
        );
        chunks
    }

    /// Accumulate segments into parent-sized windows.
    ///
    /// Splits happen only between segments, so fence parity holds by
    /// construction. A heading closes a window early once it is half
    /// full, keeping sections together. A single segment larger than the
    /// parent target is kept whole in its own window.
    fn group_windows<'a>(&self, segments: &'a [Segment]) -> Vec<Vec<&'a Segment>> {
        let target = self.config.parent_target_chars;
        let mut windows: Vec<Vec<&Segment>> = Vec::new();
        let mut current: Vec<&Segment> = Vec::new();
        let mut current_chars = 0usize;

        for seg in segments {
            let seg_chars = seg.char_len();
            let would_overflow = current_chars + seg_chars + 2 > target;
            let heading_break = matches!(seg.kind, crate::scanner::SegmentKind::Heading(_))
                && current_chars >= target / 2;

            if !current.is_empty() && (would_overflow || heading_break) {
                windows.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            current_chars += seg_chars + 2;
            current.push(seg);
        }
        if !current.is_empty() {
            windows.push(current);
        }
        windows
    }

    /// Emit overlapping child contents for one parent window.
    ///
    /// Every child is a contiguous slice of the parent content (segments
    /// joined with a blank line), so child spans always fall inside the
    /// parent. Overlap is carried across text splits but never across a
    /// code segment boundary, which would duplicate fence markers.
    fn build_children(&self, window: &[&Segment]) -> Vec<String> {
        let target = self.config.child_target_chars;
        // Cap the overlap well below the target so every split makes
        // progress even on pathological inputs.
        let overlap = self.config.child_overlap_chars.min(target / 3);

        let mut acc = ChildAccumulator::new(target, overlap);
        for seg in window {
            if seg.is_atomic() {
                acc.push_atomic(&seg.text);
            } else {
                acc.push_text(&seg.text);
            }
        }
        acc.finish()
    }
}

/// Accumulates child windows, tracking how far into the buffer the last
/// atomic (code) segment reaches so splits and overlap never touch it.
struct ChildAccumulator {
    target: usize,
    overlap: usize,
    current: String,
    current_chars: usize,
    /// Char offset in `current` after the last atomic segment.
    atomic_end: usize,
    children: Vec<String>,
}

impl ChildAccumulator {
    fn new(target: usize, overlap: usize) -> Self {
        Self {
            target,
            overlap,
            current: String::new(),
            current_chars: 0,
            atomic_end: 0,
            children: Vec::new(),
        }
    }

    fn append(&mut self, text: &str) {
        if !self.current.is_empty() {
            self.current.push_str("\n\n");
            self.current_chars += 2;
        }
        self.current.push_str(text);
        self.current_chars += text.chars().count();
    }

    /// Append an atomic code segment. Flushes first when the segment
    /// would not fit, and flushes after when the buffer is full. No
    /// overlap is carried into or out of a full-code flush.
    fn push_atomic(&mut self, text: &str) {
        let seg_chars = text.chars().count();
        if !self.current.is_empty() && self.current_chars + seg_chars + 2 > self.target {
            self.flush_with_overlap();
        }
        self.append(text);
        self.atomic_end = self.current_chars;
        if self.current_chars >= self.target {
            self.flush_plain();
        }
    }

    /// Append paragraph/heading text, splitting at whitespace whenever
    /// the buffer exceeds the child target.
    fn push_text(&mut self, text: &str) {
        self.append(text);
        while self.current_chars > self.target {
            let split = split_point(&self.current, self.target, self.atomic_end);
            if split >= self.current.len() {
                break;
            }
            let head = self.current[..split].to_string();
            let rest = self.current[split..].to_string();

            let head_chars = head.chars().count();
            let carry_from = head_chars.saturating_sub(self.overlap).max(self.atomic_end);
            let carry = overlap_tail(&head, carry_from);

            self.emit(&head);
            self.current = format!("{carry}{rest}");
            self.current_chars = self.current.chars().count();
            self.atomic_end = 0;
        }
    }

    /// Flush, seeding the next buffer with the overlap tail of the
    /// flushed child (text tail only, never code).
    fn flush_with_overlap(&mut self) {
        let chars = self.current_chars;
        let carry_from = chars.saturating_sub(self.overlap).max(self.atomic_end);
        let carry = overlap_tail(&self.current, carry_from);
        let flushed = std::mem::take(&mut self.current);
        self.emit(&flushed);
        self.current = carry;
        self.current_chars = self.current.chars().count();
        self.atomic_end = 0;
    }

    fn flush_plain(&mut self) {
        let flushed = std::mem::take(&mut self.current);
        self.emit(&flushed);
        self.current_chars = 0;
        self.atomic_end = 0;
    }

    fn emit(&mut self, content: &str) {
        let trimmed = content.trim();
        if !trimmed.is_empty() {
            self.children.push(trimmed.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        let last = std::mem::take(&mut self.current);
        self.emit(&last);
        self.children
    }
}

/// Byte index after `n_chars` characters (or the end of the string).
fn byte_at_char(s: &str, n_chars: usize) -> usize {
    s.char_indices()
        .nth(n_chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Pick a split point near `target_chars`, preferring a whitespace
/// boundary, never earlier than `floor_chars` (the end of the last
/// atomic segment) or half the target.
fn split_point(s: &str, target_chars: usize, floor_chars: usize) -> usize {
    let hard = byte_at_char(s, target_chars);
    if hard >= s.len() {
        return s.len();
    }
    let floor = byte_at_char(s, floor_chars.max(target_chars / 2));
    match s[floor..hard].rfind(char::is_whitespace) {
        Some(rel) => {
            let ws_start = floor + rel;
            let ws_len = s[ws_start..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            ws_start + ws_len
        }
        // No whitespace in range (e.g. CJK text): hard split at the
        // char boundary.
        None => hard,
    }
}

/// Tail of `child` starting at `from_char`, advanced to the next word
/// boundary for a clean overlap start.
fn overlap_tail(child: &str, from_char: usize) -> String {
    let mut start = byte_at_char(child, from_char);
    if start >= child.len() {
        return String::new();
    }
    if let Some(ws) = child[start..].find(char::is_whitespace) {
        start += ws;
    }
    child[start..].trim_start().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::fence_marker_count;
    use quarry_core::config::ChunkingConfig;

    fn small_config() -> ChunkingConfig {
        ChunkingConfig {
            parent_target_chars: 400,
            child_target_chars: 100,
            child_overlap_chars: 30,
            preview_chars: 200,
        }
    }

    fn builder() -> ChunkBuilder {
        ChunkBuilder::new(small_config())
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(builder().build("doc-1", "").is_empty());
    }

    #[test]
    fn indices_are_monotonic() {
        let text = "alpha beta gamma delta. ".repeat(80);
        let chunks = builder().build("doc-1", &text);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
        }
    }

    #[test]
    fn children_reference_their_parent() {
        let text = "word ".repeat(300);
        let chunks = builder().build("doc-1", &text);
        let mut current_parent: Option<&str> = None;
        for chunk in &chunks {
            match chunk.chunk_type {
                ChunkType::Parent => {
                    assert!(chunk.parent_id.is_none());
                    current_parent = Some(&chunk.id);
                }
                _ => {
                    assert_eq!(chunk.parent_id.as_deref(), current_parent);
                }
            }
        }
    }

    #[test]
    fn child_content_falls_inside_parent() {
        let text = format!(
            "# Guide\n\n{}\n\n```bash\nrouter bgp 65000\n neighbor 10.0.0.1\n```\n\n{}",
            "intro text ".repeat(20),
            "closing remarks ".repeat(20),
        );
        let chunks = builder().build("doc-1", &text);
        let mut parent_content: &str = "";
        for chunk in &chunks {
            match chunk.chunk_type {
                ChunkType::Parent => parent_content = &chunk.content,
                _ => assert!(
                    parent_content.contains(chunk.content.as_str()),
                    "child content must be a slice of its parent"
                ),
            }
        }
    }

    #[test]
    fn fences_never_split() {
        let code = format!("```rust\n{}\n```", "let x = 1;\n".repeat(40));
        let text = format!("{}\n\n{}\n\n{}", "before ".repeat(30), code, "after ".repeat(30));
        let chunks = builder().build("doc-1", &text);
        for chunk in &chunks {
            assert_eq!(
                fence_marker_count(&chunk.content) % 2,
                0,
                "odd fence count in chunk {}",
                chunk.chunk_index
            );
        }
    }

    #[test]
    fn giant_code_block_kept_whole() {
        // One code block larger than the parent target.
        let code = format!("```\n{}\n```", "0123456789 ".repeat(100));
        let chunks = builder().build("doc-1", &code);
        let parents: Vec<_> = chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Parent)
            .collect();
        assert_eq!(parents.len(), 1);
        assert_eq!(fence_marker_count(&parents[0].content), 2);
        // The single child carries the whole block too.
        let children: Vec<_> = chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Child)
            .collect();
        assert_eq!(children.len(), 1);
        assert_eq!(fence_marker_count(&children[0].content), 2);
    }

    #[test]
    fn consecutive_children_overlap() {
        let text = "one two three four five six seven eight nine ten ".repeat(30);
        let chunks = builder().build("doc-1", &text);
        let children: Vec<_> = chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Child)
            .collect();
        assert!(children.len() >= 2);
        for pair in children.windows(2) {
            let prev_tail: String = {
                let content = &pair[0].content;
                let start = content.chars().count().saturating_sub(10);
                content.chars().skip(start).collect()
            };
            let tail = prev_tail.trim();
            assert!(
                pair[1].content.contains(tail),
                "expected overlap tail {tail:?} in next child"
            );
        }
    }

    #[test]
    fn headings_start_new_windows_when_half_full() {
        let section = |title: &str| format!("# {title}\n\n{}", "content word ".repeat(20));
        let text = format!("{}\n\n{}", section("First"), section("Second"));
        let chunks = builder().build("doc-1", &text);
        let parents: Vec<_> = chunks
            .iter()
            .filter(|c| c.chunk_type == ChunkType::Parent)
            .collect();
        assert_eq!(parents.len(), 2);
        assert!(parents[0].content.starts_with("# First"));
        assert!(parents[1].content.starts_with("# Second"));
    }
}
