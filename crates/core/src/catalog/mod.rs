//! Audiobook catalog records and narrator normalization.

mod narrators;
mod types;

pub use narrators::{narrators_of, normalize, NormalizedNarrators, NARRATOR_PLACEHOLDER};
pub use types::*;
