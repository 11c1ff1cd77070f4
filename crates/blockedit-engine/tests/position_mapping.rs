//! Carrying externally held positions across sequences of edits by
//! composing the forward maps each step returns.

use blockedit_engine::editing::position::content_start;
use blockedit_engine::editing::{Bias, FormattedBlock, FormattedText, Step, StepMap};
use pretty_assertions::assert_eq;

fn hello_world() -> FormattedText {
    FormattedText::from_blocks(vec![
        FormattedBlock::paragraph("Hello"),
        FormattedBlock::paragraph("World"),
    ])
}

/// A cursor glued to the start of the "World" block stays on it through a
/// whole editing session, remapped only with the returned maps.
#[test]
fn cursor_follows_its_block_through_edits() {
    let mut doc = hello_world();
    let mut cursor = content_start(&doc, 1);

    let steps = [
        // Grow the first block.
        Step::InsertText {
            block: 0,
            offset: 0,
            text: "Hi ".into(),
        },
        // Split it in two; "World" shifts one block right.
        Step::SplitBlock { index: 0, offset: 2 },
        // Shuffle the first block behind the second.
        Step::MoveBlock {
            from: 0,
            to: 1,
            count: 1,
        },
        // Join the two halves back together.
        Step::JoinBlocks { index: 0 },
        // Shrink the first block.
        Step::DeleteText {
            block: 0,
            offset: 0,
            len: 3,
        },
    ];
    let block_of_world = [1, 2, 2, 1, 1];

    for (step, expected_index) in steps.iter().zip(block_of_world) {
        let result = step.apply(&mut doc).unwrap();
        cursor = result.map.map(cursor, Bias::Left);
        assert_eq!(
            cursor,
            content_start(&doc, expected_index),
            "cursor drifted after {step:?}"
        );
    }
    assert_eq!(doc.block(1).unwrap().text(), "World");
}

#[test]
fn positions_inside_deleted_text_collapse_to_the_edit() {
    let mut doc = hello_world();
    // Position of the second 'l' in "Hello".
    let inside = content_start(&doc, 0) + 3;
    let result = Step::DeleteText {
        block: 0,
        offset: 1,
        len: 4,
    }
    .apply(&mut doc)
    .unwrap();
    // Both biases agree for a pure deletion.
    assert_eq!(result.map.map(inside, Bias::Left), 2);
    assert_eq!(result.map.map(inside, Bias::Right), 2);
}

#[test]
fn bias_picks_a_side_inside_replaced_content() {
    let mut doc = hello_world();
    let inside = content_start(&doc, 0) + 3;
    let result = Step::ReplaceBlock {
        index: 0,
        block: FormattedBlock::paragraph("Hey"),
    }
    .apply(&mut doc)
    .unwrap();
    assert_eq!(result.map, StepMap::of(1, 5, 3));
    assert_eq!(result.map.map(inside, Bias::Left), 1);
    assert_eq!(result.map.map(inside, Bias::Right), 4);
}

#[test]
fn selection_remaps_across_an_insert() {
    let mut doc = hello_world();
    // "World" selected.
    let start = content_start(&doc, 1);
    let selection = start..start + 5;
    let result = Step::InsertText {
        block: 0,
        offset: 5,
        text: " there".into(),
    }
    .apply(&mut doc)
    .unwrap();
    let remapped = result.map.map_range(selection, Bias::Left);
    assert_eq!(remapped, 14..19);
    assert_eq!(remapped.start, content_start(&doc, 1));
}

#[test]
fn scalar_steps_do_not_disturb_positions() {
    let mut doc = hello_world();
    let anywhere = content_start(&doc, 1) + 2;
    for step in [
        Step::SetBlockIndent { index: 0, indent: 2 },
        Step::SetBlockMeta {
            index: 1,
            key: "k".into(),
            value: Some("v".into()),
        },
    ] {
        let result = step.apply(&mut doc).unwrap();
        assert!(result.map.is_identity());
        assert_eq!(result.map.map(anywhere, Bias::Left), anywhere);
    }
}

/// Mapping forward through a step and back through its inverse returns to
/// the starting position, for positions outside the changed span.
#[test]
fn inverse_map_undoes_forward_map_outside_the_edit() {
    let mut doc = hello_world();
    let outside = content_start(&doc, 1) + 3;
    let forward = Step::DeleteText {
        block: 0,
        offset: 1,
        len: 3,
    }
    .apply(&mut doc)
    .unwrap();
    let moved = forward.map.map(outside, Bias::Left);
    assert_eq!(moved, outside - 3);

    let backward = forward.inverse.apply(&mut doc).unwrap();
    assert_eq!(backward.map.map(moved, Bias::Left), outside);
}
