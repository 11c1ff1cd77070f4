use blockedit_engine::editing::{BlockType, FormatType, FormattedBlock, FormattedText};

/// Build a document with `blocks` alternating paragraphs and list items,
/// each holding a few formatted lines.
pub fn generate_document(blocks: usize) -> FormattedText {
    let mut out = Vec::with_capacity(blocks);
    for i in 0..blocks {
        let block = if i % 4 == 0 {
            FormattedBlock::heading(2, format!("Section {i}"))
        } else if i % 4 == 3 {
            FormattedBlock::new(BlockType::BulletItem)
                .with_text(format!("item {i} with some text"))
                .with_indent((i % 3) as u8)
        } else {
            FormattedBlock::paragraph(format!(
                "Paragraph {i} line one\nline two of paragraph {i}"
            ))
            .with_format(0, 9, FormatType::Bold)
        };
        out.push(block);
    }
    FormattedText::from_blocks(out)
}
