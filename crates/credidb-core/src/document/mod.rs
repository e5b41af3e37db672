mod accessor;
mod path;

pub use accessor::*;
pub use path::*;
