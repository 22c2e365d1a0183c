pub mod document;
pub mod field;
pub mod history;
pub mod marker;

pub use document::*;
pub use field::*;
pub use history::*;
pub use marker::*;
