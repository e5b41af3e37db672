mod items;

pub use items::*;
