pub mod merge;

pub use merge::{MergeShapeError, merge_deep, merge_shallow, require_object};
