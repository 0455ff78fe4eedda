pub mod aggregate;
pub mod check;
pub mod decoder;
pub mod delta;
pub mod evaluator;

pub use decoder::{decode, DecodeError, FrameDecoder};
pub use evaluator::HazardEvaluator;
pub use gif_hazard_common::frame::{Frame, GifSequence};
pub use gif_hazard_common::verdict::{Category, Verdict};
