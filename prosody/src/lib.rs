//! Rewrites prose into narration-ready text and splits it into chunks for
//! streaming synthesis.
//!
//! The pipeline is a fixed sequence of passes:
//!
//! 1. normalize: markup to flat text, whitespace cleanup
//! 2. structure: headers and lists become spoken announcements
//! 3. lexical: abbreviations, symbols and numbers become words
//! 4. pauses: pause hints at punctuation and paragraph boundaries
//! 5. cleaner: residual markup removed, pause hints resolved
//!
//! The formatted text can then be cut into a [`ChunkPlan`].
//!
//! ```
//! use prosody::{ProsodyConfig, ProsodyFormatter};
//!
//! let formatter = ProsodyFormatter::new(ProsodyConfig::default()).unwrap();
//! let text = formatter.format("50% off & more").unwrap();
//! assert_eq!(text, "50 percent off and more");
//! ```

pub mod annotated;
pub mod chunk;
pub mod config;
pub mod error;
pub mod passes;
pub mod rewrite;
pub mod tables;

pub use annotated::{Annotated, Pause, PauseHint};
pub use chunk::{Chunk, ChunkInfo, ChunkPlan, ChunkSummary};
pub use config::{AbbreviationEntry, ProsodyConfig};
pub use error::{ProsodyError, Result};

use passes::{
    LexicalExpander, PauseInjector, SpeechCleaner, StructuralRewriter, normalize_document,
};
use serde::{Deserialize, Serialize};

/// Readable content handed over by an extraction step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// A compiled pipeline for one configuration.
///
/// Construction validates the configuration and compiles every pattern;
/// afterwards the formatter is immutable and can be shared across threads.
#[derive(Debug)]
pub struct ProsodyFormatter {
    config: ProsodyConfig,
    structure: StructuralRewriter,
    lexical: LexicalExpander,
    pauses: PauseInjector,
    cleaner: SpeechCleaner,
}

impl ProsodyFormatter {
    pub fn new(config: ProsodyConfig) -> Result<Self> {
        config.validate()?;

        let structure = StructuralRewriter::new(&config.bullet_glyphs)?;
        let lexical = LexicalExpander::new(&config.extra_abbreviations)?;
        let pauses = PauseInjector::new(&config.transition_words())?;
        let cleaner = SpeechCleaner::new(config.max_parenthetical_length, config.use_pause_markup)?;

        Ok(Self {
            config,
            structure,
            lexical,
            pauses,
            cleaner,
        })
    }

    pub fn config(&self) -> &ProsodyConfig {
        &self.config
    }

    /// Format a document for speech.
    pub fn format(&self, text: &str) -> Result<String> {
        let doc = self.annotate(text)?;
        Ok(self.cleaner.clean(doc))
    }

    /// Run every pass up to, but not including, the cleaner.
    ///
    /// The result still carries its pause hints unresolved.
    pub fn annotate(&self, text: &str) -> Result<Annotated> {
        if text.trim().is_empty() {
            return Err(ProsodyError::EmptyInput);
        }

        let normalized = normalize_document(text);
        log::debug!("normalize: {} -> {} bytes", text.len(), normalized.len());

        let mut doc = self.structure.rewrite(&normalized);
        self.lexical.expand(&mut doc);
        self.pauses.inject(&mut doc);
        Ok(doc)
    }

    /// Format a document and chunk the result.
    pub fn chunk(&self, text: &str) -> Result<ChunkPlan> {
        let formatted = self.format(text)?;
        Ok(self.chunk_formatted(&formatted))
    }

    /// Chunk text that has already been formatted.
    pub fn chunk_formatted(&self, formatted: &str) -> ChunkPlan {
        ChunkPlan::from_text(
            formatted,
            self.config.target_chars,
            self.config.split_oversized_sentences,
        )
    }

    /// Chunk metadata for a document.
    pub fn summarize(&self, text: &str) -> Result<ChunkSummary> {
        Ok(self.chunk(text)?.summary())
    }

    /// Format the body of extracted content; title and site name are not read.
    pub fn format_extracted(&self, content: &ExtractedContent) -> Result<String> {
        self.format(&content.content)
    }
}

/// Format with the default configuration.
pub fn format_for_speech(text: &str) -> Result<String> {
    ProsodyFormatter::new(ProsodyConfig::default())?.format(text)
}
