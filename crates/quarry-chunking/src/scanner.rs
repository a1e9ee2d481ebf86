//! Line-level scanner and segmenter.
//!
//! Classifies each line as heading, fence marker, blank, or text, then
//! folds lines into semantic segments: headings, paragraphs, and whole
//! fenced code blocks. Fence parity is tracked here, so downstream window
//! assembly never sees a split point inside an open fence.

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `#`..`######` followed by whitespace.
    Heading(u8),
    /// A code fence marker (``` or ~~~), opening or closing.
    Fence,
    Blank,
    Text,
}

/// Whether a line is a code fence marker.
pub fn is_fence_marker(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("```") || t.starts_with("~~~")
}

/// Classify one line. Fence state is not consulted here; the segmenter
/// owns that.
pub fn classify_line(line: &str) -> LineKind {
    if is_fence_marker(line) {
        return LineKind::Fence;
    }
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) {
        let rest = &trimmed[hashes..];
        if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t') {
            return LineKind::Heading(hashes as u8);
        }
    }
    LineKind::Text
}

/// Kind of a semantic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Heading(u8),
    Paragraph,
    /// A whole fenced block, opening and closing markers included.
    /// Atomic: never split across chunks.
    CodeBlock,
}

/// A semantic unit of the document. The window assembler only ever
/// places whole segments (splitting long paragraphs at whitespace), so a
/// `CodeBlock` always lands in one chunk.
#[derive(Debug, Clone)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    /// Segment length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether splitting inside this segment is permitted.
    pub fn is_atomic(&self) -> bool {
        matches!(self.kind, SegmentKind::CodeBlock)
    }
}

/// Fold raw text into semantic segments.
///
/// An unterminated fence at end of input is flushed as a single code
/// segment so the remainder of the document still lands in one chunk.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Vec<&str> = Vec::new();
    let mut in_fence = false;

    let flush_paragraph = |buf: &mut Vec<&str>, out: &mut Vec<Segment>| {
        if !buf.is_empty() {
            out.push(Segment {
                kind: SegmentKind::Paragraph,
                text: buf.join("\n"),
            });
            buf.clear();
        }
    };

    for line in text.lines() {
        if in_fence {
            code.push(line);
            if is_fence_marker(line) {
                segments.push(Segment {
                    kind: SegmentKind::CodeBlock,
                    text: code.join("\n"),
                });
                code.clear();
                in_fence = false;
            }
            continue;
        }

        match classify_line(line) {
            LineKind::Fence => {
                flush_paragraph(&mut paragraph, &mut segments);
                code.push(line);
                in_fence = true;
            }
            LineKind::Heading(level) => {
                flush_paragraph(&mut paragraph, &mut segments);
                segments.push(Segment {
                    kind: SegmentKind::Heading(level),
                    text: line.to_string(),
                });
            }
            LineKind::Blank => {
                flush_paragraph(&mut paragraph, &mut segments);
            }
            LineKind::Text => {
                paragraph.push(line);
            }
        }
    }

    flush_paragraph(&mut paragraph, &mut segments);
    if !code.is_empty() {
        segments.push(Segment {
            kind: SegmentKind::CodeBlock,
            text: code.join("\n"),
        });
    }

    segments
}

/// Number of fence marker lines in a piece of chunk content. Even parity
/// means every fenced block opened in the chunk also closes in it.
pub fn fence_marker_count(content: &str) -> usize {
    content.lines().filter(|l| is_fence_marker(l)).count()
}
