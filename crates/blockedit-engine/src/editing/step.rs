//! The closed family of edit primitives.
//!
//! Every variant carries only the data needed to perform the edit and, by
//! capturing pre-edit state during `apply`, to invert it. Applying a step
//! is a pure function of the document and the step's fields: it consults no
//! outside state, mutates the document in place, and returns the inverse
//! step paired with the forward position map.
//!
//! Inverse strategy, by family:
//! - intra-block content edits ([`Step::InsertText`], [`Step::DeleteText`],
//!   [`Step::ChangeFormat`], [`Step::ReplaceBlock`]) invert through a
//!   [`Step::ReplaceBlock`] carrying a clone of the pre-edit block — one
//!   rule undoes any intra-block mutation, however complex;
//! - block-list restructuring ([`Step::InsertBlock`], [`Step::DeleteBlock`],
//!   [`Step::SplitBlock`], [`Step::JoinBlocks`], [`Step::MoveBlock`])
//!   inverts through the structurally symmetric counterpart;
//! - scalar field edits ([`Step::SetBlockIndent`], [`Step::SetBlockType`],
//!   [`Step::SetBlockMeta`]) remember the prior value and leave position
//!   space untouched.

use crate::editing::block::{BlockType, FormatType, FormattedBlock};
use crate::editing::document::FormattedText;
use crate::editing::position;
use crate::editing::result::StepResult;
use crate::editing::step_map::{MapRange, StepMap};
use crate::editing::EditError;

/// An invertible, atomic document edit.
///
/// Block indices address [`FormattedText::blocks`]; offsets are flat byte
/// offsets into a block's content (line breaks counting one unit). A step
/// whose indices or offsets do not fit the current document is rejected
/// with an [`EditError`] and leaves the document untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Insert `text` into a block's content. `\n` becomes a line break.
    InsertText {
        block: usize,
        offset: usize,
        text: String,
    },
    /// Remove `len` content units from a block.
    DeleteText {
        block: usize,
        offset: usize,
        len: usize,
    },
    /// Toggle `format` over `[offset, offset + len)` of a block's content.
    ChangeFormat {
        block: usize,
        offset: usize,
        len: usize,
        format: FormatType,
        add: bool,
    },
    /// Swap out the whole block at `index`.
    ReplaceBlock { index: usize, block: FormattedBlock },
    /// Insert a block so it ends up at `index`.
    InsertBlock { index: usize, block: FormattedBlock },
    /// Remove the block at `index`.
    DeleteBlock { index: usize },
    /// Split the block at `index` into `[0, offset)` and `[offset, end)`,
    /// the right half landing at `index + 1`.
    SplitBlock { index: usize, offset: usize },
    /// Merge block `index + 1` into block `index`. Both must share a type.
    JoinBlocks { index: usize },
    /// Remove `count` consecutive blocks at `from` and reinsert them at
    /// `to`, where `to` addresses the list as it stands after the removal.
    MoveBlock {
        from: usize,
        to: usize,
        count: usize,
    },
    SetBlockIndent { index: usize, indent: u8 },
    SetBlockType {
        index: usize,
        block_type: BlockType,
    },
    /// Set (`Some`) or remove (`None`) one metadata entry.
    SetBlockMeta {
        index: usize,
        key: String,
        value: Option<String>,
    },
}

impl Step {
    /// Apply this step to `doc`, mutating it in place.
    ///
    /// On success the document reflects the edit and the returned
    /// [`StepResult`] carries the inverse step and forward map. On error
    /// the document is exactly as it was.
    pub fn apply(&self, doc: &mut FormattedText) -> Result<StepResult, EditError> {
        match self {
            Step::InsertText {
                block,
                offset,
                text,
            } => insert_text(doc, *block, *offset, text),
            Step::DeleteText { block, offset, len } => delete_text(doc, *block, *offset, *len),
            Step::ChangeFormat {
                block,
                offset,
                len,
                format,
                add,
            } => change_format(doc, *block, *offset, *len, *format, *add),
            Step::ReplaceBlock { index, block } => replace_block(doc, *index, block),
            Step::InsertBlock { index, block } => insert_block(doc, *index, block),
            Step::DeleteBlock { index } => delete_block(doc, *index),
            Step::SplitBlock { index, offset } => split_block(doc, *index, *offset),
            Step::JoinBlocks { index } => join_blocks(doc, *index),
            Step::MoveBlock { from, to, count } => move_block(doc, *from, *to, *count),
            Step::SetBlockIndent { index, indent } => set_block_indent(doc, *index, *indent),
            Step::SetBlockType { index, block_type } => set_block_type(doc, *index, *block_type),
            Step::SetBlockMeta { index, key, value } => {
                set_block_meta(doc, *index, key, value.as_deref())
            }
        }
    }
}

fn checked_index(doc: &FormattedText, index: usize) -> Result<(), EditError> {
    let len = doc.block_count();
    if index >= len {
        return Err(EditError::BlockIndexOutOfBounds { index, len });
    }
    Ok(())
}

fn insert_text(
    doc: &mut FormattedText,
    index: usize,
    offset: usize,
    text: &str,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let snapshot = doc.blocks()[index].clone();
    let at = position::content_start(doc, index) + offset;
    doc.block_mut(index).insert(offset, text)?;
    Ok(StepResult {
        inverse: Step::ReplaceBlock {
            index,
            block: snapshot,
        },
        map: StepMap::of(at, 0, text.len()),
    })
}

fn delete_text(
    doc: &mut FormattedText,
    index: usize,
    offset: usize,
    len: usize,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let snapshot = doc.blocks()[index].clone();
    let at = position::content_start(doc, index) + offset;
    doc.block_mut(index).remove(offset, len)?;
    Ok(StepResult {
        inverse: Step::ReplaceBlock {
            index,
            block: snapshot,
        },
        map: StepMap::of(at, len, 0),
    })
}

fn change_format(
    doc: &mut FormattedText,
    index: usize,
    offset: usize,
    len: usize,
    format: FormatType,
    add: bool,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let snapshot = doc.blocks()[index].clone();
    let block = doc.block_mut(index);
    if add {
        block.add_format(offset, len, format)?;
    } else {
        block.remove_format(offset, len, format)?;
    }
    Ok(StepResult {
        inverse: Step::ReplaceBlock {
            index,
            block: snapshot,
        },
        // Formatting never changes position space.
        map: StepMap::EMPTY,
    })
}

fn replace_block(
    doc: &mut FormattedText,
    index: usize,
    block: &FormattedBlock,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let at = position::content_start(doc, index);
    let old_size = doc.blocks()[index].content_size();
    let new_size = block.content_size();
    let old = doc.replace_block(index, block.clone());
    Ok(StepResult {
        inverse: Step::ReplaceBlock { index, block: old },
        map: StepMap::of(at, old_size, new_size),
    })
}

fn insert_block(
    doc: &mut FormattedText,
    index: usize,
    block: &FormattedBlock,
) -> Result<StepResult, EditError> {
    let len = doc.block_count();
    if index > len {
        return Err(EditError::BlockIndexOutOfBounds { index, len });
    }
    let at = position::block_start(doc, index);
    doc.insert_block(index, block.clone());
    Ok(StepResult {
        inverse: Step::DeleteBlock { index },
        map: StepMap::of(at, 0, position::node_size(block)),
    })
}

fn delete_block(doc: &mut FormattedText, index: usize) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let at = position::block_start(doc, index);
    let removed = doc.remove_block(index);
    let size = position::node_size(&removed);
    Ok(StepResult {
        inverse: Step::InsertBlock {
            index,
            block: removed,
        },
        map: StepMap::of(at, size, 0),
    })
}

fn split_block(
    doc: &mut FormattedText,
    index: usize,
    offset: usize,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let at = position::content_start(doc, index) + offset;
    let right = doc.block_mut(index).split(offset)?;
    doc.insert_block(index + 1, right);
    Ok(StepResult {
        inverse: Step::JoinBlocks { index },
        // The split materializes two new boundary tokens.
        map: StepMap::of(at, 0, 2),
    })
}

fn join_blocks(doc: &mut FormattedText, index: usize) -> Result<StepResult, EditError> {
    let len = doc.block_count();
    if len < 2 || index >= len - 1 {
        return Err(EditError::BlockIndexOutOfBounds {
            index: index.saturating_add(1),
            len,
        });
    }
    let left_type = doc.blocks()[index].block_type();
    let right_type = doc.blocks()[index + 1].block_type();
    if left_type != right_type {
        return Err(EditError::TypeMismatch {
            left: left_type,
            right: right_type,
        });
    }
    let left_size = doc.blocks()[index].content_size();
    let at = position::content_start(doc, index) + left_size;
    let right = doc.remove_block(index + 1);
    doc.block_mut(index).append_content(right);
    Ok(StepResult {
        inverse: Step::SplitBlock {
            index,
            offset: left_size,
        },
        // The join erases the two boundary tokens between the blocks.
        map: StepMap::of(at, 2, 0),
    })
}

fn move_block(
    doc: &mut FormattedText,
    from: usize,
    to: usize,
    count: usize,
) -> Result<StepResult, EditError> {
    let len = doc.block_count();
    let end = from.saturating_add(count);
    if end > len || to > len - count {
        return Err(EditError::MoveOutOfBounds {
            from,
            to,
            count,
            len,
        });
    }
    let inverse = Step::MoveBlock {
        from: to,
        to: from,
        count,
    };
    if count == 0 || from == to {
        return Ok(StepResult {
            inverse,
            map: StepMap::EMPTY,
        });
    }
    let from_pos = position::block_start(doc, from);
    let moved_size: usize = doc.blocks()[from..end].iter().map(position::node_size).sum();
    // Where the reinsertion lands, expressed in pre-removal coordinates.
    let old_insert_index = if to >= from { to + count } else { to };
    let insert_pos = position::block_start(doc, old_insert_index);
    let removal = MapRange::new(from_pos, moved_size, 0);
    let insertion = MapRange::new(insert_pos, 0, moved_size);
    let ranges = if insertion.old_start < removal.old_start {
        vec![insertion, removal]
    } else {
        vec![removal, insertion]
    };
    let moved = doc.drain_blocks(from, count);
    doc.splice_blocks(to, moved);
    Ok(StepResult {
        inverse,
        map: StepMap::from_ranges(ranges),
    })
}

fn set_block_indent(
    doc: &mut FormattedText,
    index: usize,
    indent: u8,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let old = doc.blocks()[index].indent();
    doc.block_mut(index).set_indent(indent)?;
    Ok(StepResult {
        inverse: Step::SetBlockIndent { index, indent: old },
        map: StepMap::EMPTY,
    })
}

fn set_block_type(
    doc: &mut FormattedText,
    index: usize,
    block_type: BlockType,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let old = doc.blocks()[index].block_type();
    doc.block_mut(index).set_block_type(block_type);
    Ok(StepResult {
        inverse: Step::SetBlockType {
            index,
            block_type: old,
        },
        map: StepMap::EMPTY,
    })
}

fn set_block_meta(
    doc: &mut FormattedText,
    index: usize,
    key: &str,
    value: Option<&str>,
) -> Result<StepResult, EditError> {
    checked_index(doc, index)?;
    let meta = doc.block_mut(index).meta_mut();
    let old = match value {
        Some(value) => meta.insert(key.to_owned(), value.to_owned()),
        None => meta.remove(key),
    };
    Ok(StepResult {
        inverse: Step::SetBlockMeta {
            index,
            key: key.to_owned(),
            value: old,
        },
        map: StepMap::EMPTY,
    })
}
