//! Flattened document coordinates.
//!
//! Every block contributes two one-unit boundary tokens (open and close)
//! plus its content size to a single flat position space spanning the whole
//! document. Block content therefore begins one unit after the block's
//! start. These functions are pure; an out-of-range index is a programmer
//! error and fails fast.

use crate::editing::block::FormattedBlock;
use crate::editing::document::FormattedText;

/// Size of `block` in position units: its content plus the two boundary
/// tokens.
#[must_use]
pub fn node_size(block: &FormattedBlock) -> usize {
    block.content_size() + 2
}

/// Position of the opening boundary token of the block at `index`.
///
/// Valid for `0 <= index <= block_count`; `index == block_count` yields the
/// position one past the last block (the document end).
#[must_use]
pub fn block_start(doc: &FormattedText, index: usize) -> usize {
    assert!(
        index <= doc.block_count(),
        "block index {index} out of range for {} blocks",
        doc.block_count()
    );
    doc.blocks()[..index].iter().map(node_size).sum()
}

/// Position where the content of the block at `index` begins.
#[must_use]
pub fn content_start(doc: &FormattedText, index: usize) -> usize {
    block_start(doc, index) + 1
}

/// Total size of the document in position units.
#[must_use]
pub fn doc_size(doc: &FormattedText) -> usize {
    block_start(doc, doc.block_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::block::FormattedBlock;

    fn two_block_doc() -> FormattedText {
        FormattedText::from_blocks(vec![
            FormattedBlock::paragraph("Hello"),  // content 5, node 7
            FormattedBlock::paragraph("ab\ncd"), // content 5, node 7
        ])
    }

    #[test]
    fn node_size_is_content_plus_boundary_tokens() {
        let block = FormattedBlock::paragraph("Hello");
        assert_eq!(node_size(&block), 7);
        let multiline = FormattedBlock::paragraph("ab\ncd");
        assert_eq!(multiline.content_size(), 5);
        assert_eq!(node_size(&multiline), 7);
    }

    #[test]
    fn block_start_sums_preceding_nodes() {
        let doc = two_block_doc();
        assert_eq!(block_start(&doc, 0), 0);
        assert_eq!(block_start(&doc, 1), 7);
        assert_eq!(block_start(&doc, 2), 14);
        assert_eq!(doc_size(&doc), 14);
    }

    #[test]
    fn content_starts_one_past_block_start() {
        let doc = two_block_doc();
        assert_eq!(content_start(&doc, 0), 1);
        assert_eq!(content_start(&doc, 1), 8);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn block_start_rejects_out_of_range_index() {
        let doc = two_block_doc();
        block_start(&doc, 3);
    }
}
