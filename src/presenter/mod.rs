pub mod markdown;

pub use markdown::{render_document, DocumentWriter, DESCRIPTION_PLACEHOLDER};
