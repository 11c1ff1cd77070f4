use crate::editing::step::Step;
use crate::editing::step_map::StepMap;

/// What applying a [`Step`] hands back: the step that undoes it and the
/// forward position map. Never stored inside the document.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Applied to the mutated document, restores the pre-edit document (and
    /// yields the redo step).
    pub inverse: Step,
    /// How position space changed; use it to re-project cursors, selections
    /// and pending edits forward across this step.
    pub map: StepMap,
}
