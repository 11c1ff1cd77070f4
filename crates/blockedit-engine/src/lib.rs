pub mod editing;


// Re-export key types for easier usage
pub use editing::{
    Bias, BlockType, EditError, FormatRange, FormatType, FormattedBlock, FormattedText, Line,
    MapRange, Step, StepMap, StepResult, MAX_INDENT,
};
