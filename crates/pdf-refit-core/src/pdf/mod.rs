//! PDF document handling: loading, page geometry, and composite assembly.

pub mod compose;
pub mod document;
pub mod fit;

pub use compose::{compose, serialize};
pub use document::LoadedDocument;
pub use fit::{PageFit, fit};
