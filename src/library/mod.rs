pub mod name;

pub use name::{LibraryName, LIBRARY_MARKER};
