use std::fmt;

use serde::{Deserialize, Serialize};

use crate::editing::block::FormattedBlock;

/// The document: an ordered sequence of [`FormattedBlock`]s.
///
/// A `FormattedText` is exclusively owned by one editing session and is only
/// ever mutated through [`crate::editing::Step::apply`]; the public surface
/// is read-only. Collaborator code (renderers, serializers) walks
/// [`FormattedText::blocks`] and the block accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedText {
    blocks: Vec<FormattedBlock>,
}

impl FormattedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_blocks(blocks: Vec<FormattedBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[FormattedBlock] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&FormattedBlock> {
        self.blocks.get(index)
    }

    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flattened plain text, blocks separated by blank lines.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(FormattedBlock::text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> &mut FormattedBlock {
        &mut self.blocks[index]
    }

    pub(crate) fn insert_block(&mut self, index: usize, block: FormattedBlock) {
        self.blocks.insert(index, block);
    }

    pub(crate) fn remove_block(&mut self, index: usize) -> FormattedBlock {
        self.blocks.remove(index)
    }

    pub(crate) fn replace_block(&mut self, index: usize, block: FormattedBlock) -> FormattedBlock {
        std::mem::replace(&mut self.blocks[index], block)
    }

    pub(crate) fn drain_blocks(&mut self, start: usize, count: usize) -> Vec<FormattedBlock> {
        self.blocks.drain(start..start + count).collect()
    }

    pub(crate) fn splice_blocks(&mut self, index: usize, blocks: Vec<FormattedBlock>) {
        self.blocks.splice(index..index, blocks);
    }
}

impl fmt::Display for FormattedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FormattedText ({} blocks):", self.blocks.len())?;
        for (i, block) in self.blocks.iter().enumerate() {
            writeln!(
                f,
                "  [{i}] {:?} indent={}: {:?}",
                block.block_type(),
                block.indent(),
                block.text()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::block::BlockType;
    use pretty_assertions::assert_eq;

    #[test]
    fn accessors_reflect_block_order() {
        let doc = FormattedText::from_blocks(vec![
            FormattedBlock::heading(1, "Title"),
            FormattedBlock::paragraph("Body"),
        ]);
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.block(0).unwrap().block_type(), BlockType::Heading { level: 1 });
        assert_eq!(doc.block(1).unwrap().text(), "Body");
        assert!(doc.block(2).is_none());
    }

    #[test]
    fn text_joins_blocks_with_blank_lines() {
        let doc = FormattedText::from_blocks(vec![
            FormattedBlock::paragraph("one"),
            FormattedBlock::paragraph("two"),
        ]);
        assert_eq!(doc.text(), "one\n\ntwo");
    }

    #[test]
    fn display_lists_blocks() {
        let doc = FormattedText::from_blocks(vec![FormattedBlock::paragraph("hi")]);
        let rendered = doc.to_string();
        assert!(rendered.contains("1 blocks"));
        assert!(rendered.contains("Paragraph"));
        assert!(rendered.contains("\"hi\""));
    }
}
