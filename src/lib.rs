pub mod balance;
pub mod config;
pub mod duration;
pub mod ffi;
pub mod ir;
pub mod playback;
pub mod progress;
pub mod segment;
pub mod textutil;
pub mod validation;

pub use balance::{
    merge_documents, merge_presentation, merge_speech, MergeMode, MergeOptions, MixedPattern,
    SlideMode,
};
pub use duration::{DurationEstimator, DurationInput, PauseWeights};
pub use ir::{Lang, MergeResult, MergedSegment, Paragraph, Slide};
pub use segment::{parse_paragraphs, parse_slides};
pub use textutil::count_words;
