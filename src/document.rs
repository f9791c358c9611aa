/// Immutable source snapshots and position arithmetic.
///
/// Lines are zero-based; columns count UTF-16 code units, the unit editor
/// hosts use. Tree-sitter reports byte offsets, which are converted here.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// A zero-based (line, column) location. Orders lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const ZERO: Position = Position {
        line: 0,
        character: 0,
    };

    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `pos`.
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// The identifier under the cursor and where it sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub range: Range,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
    line_offsets: Vec<usize>,
}

impl SourceDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_offsets = compute_line_offsets(&text);
        Self {
            path: path.into(),
            text,
            line_offsets,
        }
    }

    /// Snapshot a file from disk.
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert a byte offset into a position. Offsets past the end clamp to
    /// the end of the text; offsets inside a multi-byte char round down.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self
            .line_offsets
            .partition_point(|&o| o <= offset)
            .saturating_sub(1);
        let line_start = self.line_offsets[line];
        let col_utf16: usize = self.text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, col_utf16 as u32)
    }

    /// Convert a position into a byte offset. Columns past the end of the
    /// line clamp to the line end; a line past the end of the text is `None`.
    pub fn position_to_offset(&self, pos: Position) -> Option<usize> {
        let line = pos.line as usize;
        let line_start = *self.line_offsets.get(line)?;
        let line_text = self.line_text(pos.line)?;
        let mut utf16_count = 0u32;
        for (byte_idx, ch) in line_text.char_indices() {
            if utf16_count >= pos.character {
                return Some(line_start + byte_idx);
            }
            utf16_count += ch.len_utf16() as u32;
        }
        Some(line_start + line_text.len())
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        let start = *self.line_offsets.get(line)?;
        let end = self
            .line_offsets
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let raw = &self.text[start..end];
        Some(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// The identifier touching `pos`, if any. A cursor placed right after the
    /// last character of a word still selects that word.
    pub fn word_at(&self, pos: Position) -> Option<WordSpan> {
        let line_text = self.line_text(pos.line)?;
        let line_start = self.line_offsets[pos.line as usize];
        let cursor = self.position_to_offset(pos)? - line_start;

        let before = &line_text[..cursor];
        let after = &line_text[cursor..];

        let start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word_char(*c))
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(cursor);
        let end = cursor
            + after
                .char_indices()
                .find(|(_, c)| !is_word_char(*c))
                .map(|(idx, _)| idx)
                .unwrap_or(after.len());

        if start == end {
            return None;
        }

        Some(WordSpan {
            range: Range::new(
                self.offset_to_position(line_start + start),
                self.offset_to_position(line_start + end),
            ),
            text: line_text[start..end].to_string(),
        })
    }

    /// Range covering the byte span `[start, end)`.
    pub fn byte_range(&self, start: usize, end: usize) -> Range {
        Range::new(self.offset_to_position(start), self.offset_to_position(end))
    }
}

fn compute_line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    offsets.extend(
        text.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i + 1),
    );
    offsets
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
