//! The rewrite passes, in pipeline order.
//!
//! normalize -> structure -> lexical -> pauses -> cleaner. Each pass
//! assumes the ones before it have run; none of them can fail on text.

mod cleaner;
mod lexical;
pub mod normalize;
mod pauses;
mod structure;

pub use cleaner::SpeechCleaner;
pub use lexical::LexicalExpander;
pub use normalize::normalize_document;
pub use pauses::PauseInjector;
pub use structure::StructuralRewriter;
