use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::editing::EditError;

/// Deepest block indentation the model accepts.
pub const MAX_INDENT: u8 = 5;

/// Inline formatting kinds. Closed set; a format either covers a byte range
/// of a line or it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormatType {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
    Highlight,
}

/// The structural kind of a block. List nesting is expressed through the
/// block's indent, not through its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockType {
    Paragraph,
    /// A heading with level 1-6.
    Heading { level: u8 },
    CodeBlock,
    BlockQuote,
    BulletItem,
    NumberedItem,
}

/// A half-open byte range `[start, end)` of one line carrying a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRange {
    /// Inclusive start byte offset into the line's text.
    pub start: usize,
    /// Exclusive end byte offset into the line's text.
    pub end: usize,
    pub format: FormatType,
}

impl FormatRange {
    pub fn new(start: usize, end: usize, format: FormatType) -> Self {
        Self { start, end, format }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `offset` points at a formatted byte of this range.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// One line of a block: text plus the format ranges covering it.
///
/// Invariants: the text holds no `\n` (breaks live *between* lines), and the
/// ranges are kept sorted by `(start, end, format)` with touching or
/// overlapping ranges of the same format coalesced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    text: String,
    formats: Vec<FormatRange>,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "line text must not contain breaks");
        Self {
            text,
            formats: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn formats(&self) -> &[FormatRange] {
        &self.formats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Formats covering the byte at `offset`.
    pub fn formats_at(&self, offset: usize) -> impl Iterator<Item = FormatType> + '_ {
        self.formats
            .iter()
            .filter(move |r| r.contains(offset))
            .map(|r| r.format)
    }

    /// Insert a break-free segment at `offset`, shifting format ranges to
    /// keep them attached to the characters they covered: ranges before the
    /// edit stay, ranges after it shift, a range straddling it grows.
    pub(crate) fn insert(&mut self, offset: usize, segment: &str) {
        debug_assert!(!segment.contains('\n'));
        debug_assert!(self.text.is_char_boundary(offset));
        if segment.is_empty() {
            return;
        }
        let n = segment.len();
        self.text.insert_str(offset, segment);
        for r in &mut self.formats {
            if r.start >= offset {
                r.start += n;
                r.end += n;
            } else if r.end > offset {
                r.end += n;
            }
        }
    }

    /// Truncate to `[0, offset)` and return the remainder as a new line.
    /// A range straddling the cut is split between the two halves.
    pub(crate) fn split_off(&mut self, offset: usize) -> Line {
        debug_assert!(self.text.is_char_boundary(offset));
        let rest = self.text.split_off(offset);
        let mut right = Vec::new();
        let mut left = Vec::new();
        for r in std::mem::take(&mut self.formats) {
            if r.end <= offset {
                left.push(r);
            } else if r.start >= offset {
                right.push(FormatRange::new(r.start - offset, r.end - offset, r.format));
            } else {
                left.push(FormatRange::new(r.start, offset, r.format));
                right.push(FormatRange::new(0, r.end - offset, r.format));
            }
        }
        self.formats = left;
        Line {
            text: rest,
            formats: right,
        }
    }

    /// Append `other`'s text and formats, rejoining ranges that meet at the
    /// seam.
    pub(crate) fn append(&mut self, other: Line) {
        let shift = self.text.len();
        self.text.push_str(&other.text);
        self.formats.extend(
            other
                .formats
                .into_iter()
                .map(|r| FormatRange::new(r.start + shift, r.end + shift, r.format)),
        );
        self.normalize();
    }

    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end);
        let tail = self.split_off(end);
        let _removed = self.split_off(start);
        self.append(tail);
    }

    pub(crate) fn add_format(&mut self, start: usize, end: usize, format: FormatType) {
        if start >= end {
            return;
        }
        self.formats.push(FormatRange::new(start, end, format));
        self.normalize();
    }

    pub(crate) fn remove_format(&mut self, start: usize, end: usize, format: FormatType) {
        if start >= end {
            return;
        }
        let mut kept = Vec::with_capacity(self.formats.len() + 1);
        for r in std::mem::take(&mut self.formats) {
            if r.format != format || r.end <= start || r.start >= end {
                kept.push(r);
                continue;
            }
            if r.start < start {
                kept.push(FormatRange::new(r.start, start, r.format));
            }
            if r.end > end {
                kept.push(FormatRange::new(end, r.end, r.format));
            }
        }
        self.formats = kept;
        self.normalize();
    }

    /// Restore the range invariants: drop empty ranges, coalesce same-format
    /// ranges that touch or overlap, sort by position.
    fn normalize(&mut self) {
        self.formats.retain(|r| !r.is_empty());
        self.formats.sort_by_key(|r| (r.format, r.start, r.end));
        let mut merged: Vec<FormatRange> = Vec::with_capacity(self.formats.len());
        for r in std::mem::take(&mut self.formats) {
            match merged.last_mut() {
                Some(last) if last.format == r.format && r.start <= last.end => {
                    last.end = last.end.max(r.end);
                }
                _ => merged.push(r),
            }
        }
        merged.sort_by_key(|r| (r.start, r.end, r.format));
        self.formats = merged;
    }
}

/// One structural unit of a document: a typed, indentable block holding
/// formatted lines of text plus arbitrary string metadata.
///
/// All offsets are flat byte offsets into the block's content, where the
/// break between two lines counts as one unit. Every mutating operation
/// validates its offsets against the current content and rejects the edit
/// with an [`EditError`] before changing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedBlock {
    block_type: BlockType,
    indent: u8,
    meta: BTreeMap<String, String>,
    /// Never empty; an empty block holds one empty line.
    lines: Vec<Line>,
}

impl FormattedBlock {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            block_type,
            indent: 0,
            meta: BTreeMap::new(),
            lines: vec![Line::empty()],
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockType::Paragraph).with_text(text)
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockType::Heading {
            level: level.clamp(1, 6),
        })
        .with_text(text)
    }

    /// Replace the block's content with `text`, one line per `\n`-separated
    /// segment.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.lines = text.split('\n').map(Line::new).collect();
        self
    }

    /// Builder form of [`FormattedBlock::add_format`]. Panics on a range
    /// outside the current content; intended for constructing known-good
    /// blocks.
    pub fn with_format(mut self, offset: usize, len: usize, format: FormatType) -> Self {
        self.add_format(offset, len, format)
            .expect("builder format range must lie within block content");
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`FormattedBlock::set_indent`]. Panics above
    /// [`MAX_INDENT`].
    pub fn with_indent(mut self, indent: u8) -> Self {
        self.set_indent(indent)
            .expect("builder indent must not exceed MAX_INDENT");
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub fn indent(&self) -> u8 {
        self.indent
    }

    pub fn set_indent(&mut self, indent: u8) -> Result<(), EditError> {
        if indent > MAX_INDENT {
            return Err(EditError::IndentOutOfRange(indent));
        }
        self.indent = indent;
        Ok(())
    }

    pub fn meta(&self) -> &BTreeMap<String, String> {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.meta
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Total content size in position units: the bytes of every line plus
    /// one unit per inter-line break.
    #[must_use]
    pub fn content_size(&self) -> usize {
        let text: usize = self.lines.iter().map(Line::len).sum();
        text + (self.lines.len() - 1)
    }

    /// Flattened plain text of the block, breaks rendered as `\n`.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.content_size());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.text());
        }
        out
    }

    /// Formats covering the content unit at `offset`. Empty for a break
    /// position or an offset at/past the end of content.
    pub fn formats_at(&self, offset: usize) -> Vec<FormatType> {
        let mut pos = 0;
        for line in &self.lines {
            if offset < pos + line.len() {
                let mut formats: Vec<_> = line.formats_at(offset - pos).collect();
                formats.sort_unstable();
                formats.dedup();
                return formats;
            }
            pos += line.len() + 1;
        }
        Vec::new()
    }

    /// Resolve a flat content offset to `(line index, local byte offset)`.
    ///
    /// An offset equal to a line's length resolves to that line's end rather
    /// than to the start of the following line, so `locate(content_size())`
    /// is always valid.
    fn locate(&self, offset: usize) -> Result<(usize, usize), EditError> {
        let size = self.content_size();
        if offset > size {
            return Err(EditError::OffsetOutOfBounds { offset, size });
        }
        let mut pos = 0;
        for (i, line) in self.lines.iter().enumerate() {
            if offset <= pos + line.len() {
                let local = offset - pos;
                if !line.text.is_char_boundary(local) {
                    return Err(EditError::NotCharBoundary(offset));
                }
                return Ok((i, local));
            }
            pos += line.len() + 1;
        }
        unreachable!("offset within content size resolves to a line")
    }

    /// Insert `text` at `offset`. `\n` characters in `text` become line
    /// breaks.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        let (idx, local) = self.locate(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        if !text.contains('\n') {
            self.lines[idx].insert(local, text);
            return Ok(());
        }
        let tail = self.lines[idx].split_off(local);
        let mut segments: Vec<&str> = text.split('\n').collect();
        let last = segments.pop().unwrap_or("");
        let first = segments.first().copied().unwrap_or("");
        self.lines[idx].insert(local, first);
        let mut at = idx + 1;
        for seg in segments.iter().skip(1) {
            self.lines.insert(at, Line::new(*seg));
            at += 1;
        }
        let mut last_line = Line::new(last);
        last_line.append(tail);
        self.lines.insert(at, last_line);
        Ok(())
    }

    /// Remove `len` content units starting at `offset`. Removing a break
    /// joins the adjacent lines.
    pub fn remove(&mut self, offset: usize, len: usize) -> Result<(), EditError> {
        let (end_idx, end_local) = self.locate(offset.saturating_add(len))?;
        let (start_idx, start_local) = self.locate(offset)?;
        if len == 0 {
            return Ok(());
        }
        if start_idx == end_idx {
            self.lines[start_idx].remove_range(start_local, end_local);
        } else {
            let tail = self.lines[end_idx].split_off(end_local);
            let _removed = self.lines[start_idx].split_off(start_local);
            self.lines[start_idx].append(tail);
            self.lines.drain(start_idx + 1..=end_idx);
        }
        Ok(())
    }

    /// Truncate to `[0, offset)` and return a block holding `[offset, end)`.
    /// Both halves keep this block's type, indent and metadata.
    pub fn split(&mut self, offset: usize) -> Result<FormattedBlock, EditError> {
        let (idx, local) = self.locate(offset)?;
        let first = self.lines[idx].split_off(local);
        let mut rest: Vec<Line> = vec![first];
        rest.extend(self.lines.drain(idx + 1..));
        Ok(FormattedBlock {
            block_type: self.block_type,
            indent: self.indent,
            meta: self.meta.clone(),
            lines: rest,
        })
    }

    /// Append `other`'s content to this block, joining `other`'s first line
    /// onto this block's last line. `other`'s indent and metadata are
    /// discarded; its type must match.
    pub fn merge(&mut self, other: FormattedBlock) -> Result<(), EditError> {
        if other.block_type != self.block_type {
            return Err(EditError::TypeMismatch {
                left: self.block_type,
                right: other.block_type,
            });
        }
        self.append_content(other);
        Ok(())
    }

    /// Infallible content join used once preconditions are established.
    pub(crate) fn append_content(&mut self, other: FormattedBlock) {
        let mut lines = other.lines.into_iter();
        if let Some(first) = lines.next()
            && let Some(last) = self.lines.last_mut()
        {
            last.append(first);
        }
        self.lines.extend(lines);
    }

    /// Toggle `format` on over `[offset, offset + len)`. Break positions
    /// inside the range carry no formatting of their own.
    pub fn add_format(&mut self, offset: usize, len: usize, format: FormatType) -> Result<(), EditError> {
        self.each_format_segment(offset, len, |line, start, end| {
            line.add_format(start, end, format);
        })
    }

    /// Toggle `format` off over `[offset, offset + len)`.
    pub fn remove_format(
        &mut self,
        offset: usize,
        len: usize,
        format: FormatType,
    ) -> Result<(), EditError> {
        self.each_format_segment(offset, len, |line, start, end| {
            line.remove_format(start, end, format);
        })
    }

    /// Validate `[offset, offset + len)` and apply `op` to each per-line
    /// segment the range covers.
    fn each_format_segment(
        &mut self,
        offset: usize,
        len: usize,
        mut op: impl FnMut(&mut Line, usize, usize),
    ) -> Result<(), EditError> {
        let end = offset.saturating_add(len);
        self.locate(end)?;
        self.locate(offset)?;
        let mut pos = 0;
        for line in &mut self.lines {
            let line_end = pos + line.len();
            let seg_start = offset.max(pos);
            let seg_end = end.min(line_end);
            if seg_start < seg_end {
                op(line, seg_start - pos, seg_end - pos);
            }
            pos = line_end + 1;
            if pos > end {
                break;
            }
        }
        Ok(())
    }
}
