//! Extraction strategies.
//!
//! Each strategy is one self-contained technique for reading a recipe out of
//! a parsed [`Page`]. The resolver runs them in the order returned by
//! [`default_strategies`], stopping as soon as the draft holds both
//! ingredients and steps.

pub mod flat_text;
pub mod heading;
pub mod structured;
pub mod template;

use crate::draft::{ExtractionOutcome, RecipeDraft};
use crate::page::Page;

pub use flat_text::{extract_from_text, FlatText};
pub use heading::{extract_by_heading, HeadingSection};
pub use structured::{extract_structured, StructuredData};
pub use template::{extract_by_template, TemplateCatalog};

/// One extraction technique with a uniform signature.
///
/// `draft` is the state accumulated by higher-priority strategies on the same
/// document variant; strategies may consult it but never modify it.
pub trait Strategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Run against `page`. `None` means the strategy found nothing or chose
    /// not to run.
    fn extract(&self, page: &Page, draft: &RecipeDraft) -> Option<ExtractionOutcome>;
}

/// The canonical cascade: structured data, template catalog, heading
/// sections, flat text.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(StructuredData),
        Box::new(TemplateCatalog),
        Box::new(HeadingSection),
        Box::new(FlatText),
    ]
}
