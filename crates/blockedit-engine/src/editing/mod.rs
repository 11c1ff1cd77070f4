//! # Document Transform Core
//!
//! A block-structured document ([`FormattedText`]) plus a closed family of
//! invertible, position-mapping edit operations ([`Step`]). This module is
//! the substrate an editor UI calls into to apply edits, compute undo/redo,
//! and keep externally held positions (cursors, selections, pending edits)
//! consistent while the document mutates.
//!
//! ## Architecture
//!
//! - **Single mutation path**: a `FormattedText` is only ever changed by
//!   [`Step::apply`]. The document is exclusively owned by one editing
//!   session; `apply` is synchronous and never suspends.
//! - **Invertible edits**: every `apply` returns a [`StepResult`] pairing
//!   the inverse `Step` (push it on an undo stack; applying it yields the
//!   redo step) with a forward [`StepMap`] describing how position space
//!   changed.
//! - **Snapshot inverses**: steps that mutate *within* a block (text,
//!   formatting, wholesale replace) invert through [`Step::ReplaceBlock`]
//!   carrying a pre-edit clone of the block. Steps that restructure the
//!   block list invert through their structural mirror (delete undoes
//!   insert, join undoes split). Scalar steps remember the prior scalar.
//! - **Validate, then mutate**: a step with out-of-range indices or offsets
//!   fails with an [`EditError`] before touching the document. There is no
//!   partial application.
//!
//! ## Position space
//!
//! Positions are flat byte offsets over the whole document. Each block
//! contributes an opening and a closing boundary token (one unit each)
//! around its content; line breaks inside a block count as one unit. See
//! [`position`] for the coordinate functions and [`StepMap`] for mapping
//! positions across edits.
//!
//! ```
//! use blockedit_engine::editing::{FormattedBlock, FormattedText, Step};
//!
//! let mut doc = FormattedText::from_blocks(vec![
//!     FormattedBlock::paragraph("Hello"),
//!     FormattedBlock::paragraph("World"),
//! ]);
//!
//! let step = Step::InsertText { block: 0, offset: 5, text: "!".into() };
//! let result = step.apply(&mut doc).unwrap();
//! assert_eq!(doc.block(0).unwrap().text(), "Hello!");
//!
//! // Undo is just applying the inverse step.
//! result.inverse.apply(&mut doc).unwrap();
//! assert_eq!(doc.block(0).unwrap().text(), "Hello");
//! ```

pub mod block;
pub mod document;
pub mod position;
pub mod result;
pub mod step;
pub mod step_map;

pub use block::{BlockType, FormatRange, FormatType, FormattedBlock, Line, MAX_INDENT};
pub use document::FormattedText;
pub use result::StepResult;
pub use step::Step;
pub use step_map::{Bias, MapRange, StepMap};

/// Errors rejected edits report before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("block index {index} out of bounds for document of {len} blocks")]
    BlockIndexOutOfBounds { index: usize, len: usize },
    #[error("offset {offset} out of bounds for content of size {size}")]
    OffsetOutOfBounds { offset: usize, size: usize },
    #[error("offset {0} does not fall on a character boundary")]
    NotCharBoundary(usize),
    #[error("cannot merge a {right:?} block into a {left:?} block")]
    TypeMismatch { left: BlockType, right: BlockType },
    #[error("indent {0} exceeds the maximum of {MAX_INDENT}")]
    IndentOutOfRange(u8),
    #[error("cannot move {count} blocks from {from} to {to} in a document of {len} blocks")]
    MoveOutOfBounds {
        from: usize,
        to: usize,
        count: usize,
        len: usize,
    },
}
