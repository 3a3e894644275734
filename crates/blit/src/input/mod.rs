pub mod motion;

pub use motion::{MotionAction, MotionEvent, MotionTracker};
