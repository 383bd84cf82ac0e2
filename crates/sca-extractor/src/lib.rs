//! SCA Extractor - Entity tagging and attribute extraction
//!
//! Implements the two-stage pass over a conversation transcript:
//! an entity tagger produces labelled spans, and the attribute
//! extractor turns spans plus the raw text into an [`AttributeReport`].

use sca_core::Result;
use serde::{Deserialize, Serialize};

pub use sca_core::AttributeReport;

/// A contiguous region of the transcript labelled by the tagger.
///
/// `start`/`end` are byte offsets into the source text. Spans are
/// ephemeral: they feed one extraction call and are not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

/// Trait for entity taggers.
///
/// The tagger is an external capability: the shipped rule-based
/// implementation can be swapped for a model-backed one (or a
/// deterministic stub in tests) without touching the extractor.
#[async_trait::async_trait]
pub trait EntityTagger: Send + Sync {
    /// Tag entity spans in document order. Any internal failure is
    /// fatal for the current document; there is no retry.
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>>;

    /// Tagger name for logging
    fn name(&self) -> &str;
}

pub mod attributes;
pub mod chart;
pub mod tagger;

pub use attributes::AttributeExtractor;
pub use chart::{ChartSlice, PieChart};
pub use tagger::{create_tagger, RemoteTagger, RuleBasedTagger, SpanLabel};
