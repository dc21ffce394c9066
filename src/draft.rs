//! The in-progress recipe accumulator and per-strategy outcomes.

use std::collections::HashSet;

use crate::normalize::{dedupe, non_empty};

/// Result of one strategy invocation, consumed immediately by the merge step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Ingredient lines, in document order.
    pub ingredients: Vec<String>,
    /// Method steps, in document order.
    pub steps: Vec<String>,
    /// Recipe title.
    pub title: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Main image URL.
    pub image: Option<String>,
    /// Yield / servings, free text.
    pub servings: Option<String>,
    /// Timing, free text.
    pub time: Option<String>,
    /// Total time in whole minutes, when the timing could be parsed.
    pub total_minutes: Option<u32>,
    /// Publisher-supplied keywords.
    pub keywords: Vec<String>,
}

impl ExtractionOutcome {
    /// Outcome carrying only ingredient and step lists.
    #[must_use]
    pub fn lists(ingredients: Vec<String>, steps: Vec<String>) -> Self {
        Self { ingredients, steps, ..Self::default() }
    }

    /// True when neither list nor any scalar field carries content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
            && self.steps.is_empty()
            && self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.servings.is_none()
            && self.time.is_none()
            && self.total_minutes.is_none()
    }
}

/// A deduplicated, insertion-ordered list of normalized strings.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    /// Append items not seen before; returns how many were added.
    pub fn extend<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for item in dedupe(items) {
            if self.seen.insert(item.clone()) {
                self.items.push(item);
                added += 1;
            }
        }
        added
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Mutable accumulator filled by the strategy cascade for one request.
///
/// Scalar fields follow "first non-empty wins". List fields only grow:
/// items are appended when unseen and never reordered or removed, except by
/// [`RecipeDraft::absorb`] when a later variant is strictly better.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub ingredients: OrderedSet,
    pub steps: OrderedSet,
    pub servings: Option<String>,
    pub time: Option<String>,
    pub total_minutes: Option<u32>,
    pub keywords: OrderedSet,
}

fn fill(slot: &mut Option<String>, candidate: Option<&str>) {
    if slot.is_none() {
        *slot = candidate.and_then(non_empty);
    }
}

impl RecipeDraft {
    /// Merge one strategy outcome using the monotonic-append rule.
    pub fn merge(&mut self, outcome: &ExtractionOutcome) {
        fill(&mut self.title, outcome.title.as_deref());
        fill(&mut self.description, outcome.description.as_deref());
        fill(&mut self.image, outcome.image.as_deref());
        fill(&mut self.servings, outcome.servings.as_deref());
        fill(&mut self.time, outcome.time.as_deref());
        self.total_minutes = self.total_minutes.or(outcome.total_minutes);
        self.ingredients.extend(&outcome.ingredients);
        self.steps.extend(&outcome.steps);
        self.keywords.extend(&outcome.keywords);
    }

    /// Merge a whole draft produced from a later retrieval variant.
    ///
    /// When this draft is incomplete and `later` has both lists, the lists are
    /// taken from `later` wholesale; otherwise unseen items are appended.
    /// Returns `true` when the lists were replaced.
    pub fn absorb(&mut self, later: RecipeDraft) -> bool {
        let replaced = !self.is_complete() && later.is_complete();

        fill(&mut self.title, later.title.as_deref());
        fill(&mut self.description, later.description.as_deref());
        fill(&mut self.image, later.image.as_deref());
        fill(&mut self.servings, later.servings.as_deref());
        fill(&mut self.time, later.time.as_deref());
        self.total_minutes = self.total_minutes.or(later.total_minutes);
        self.keywords.extend(later.keywords.as_slice());

        if replaced {
            self.adopt_lists(later.ingredients, later.steps);
        } else {
            self.ingredients.extend(later.ingredients.as_slice());
            self.steps.extend(later.steps.as_slice());
        }
        replaced
    }

    fn adopt_lists(&mut self, ingredients: OrderedSet, steps: OrderedSet) {
        self.ingredients = ingredients;
        self.steps = steps;
    }

    /// Both ingredients and steps are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.ingredients.is_empty() && !self.steps.is_empty()
    }

    /// Neither ingredients nor steps are present.
    #[must_use]
    pub fn has_no_lists(&self) -> bool {
        self.ingredients.is_empty() && self.steps.is_empty()
    }
}
