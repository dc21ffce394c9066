//! Storage collaborator interface for accepted recipes.
//!
//! The resolver never persists anything itself; callers hand finished
//! [`Recipe`] records to a [`RecipeStore`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::Result;
use crate::result::Recipe;

/// Key/value storage of recipes by id plus the list of all ids.
pub trait RecipeStore: Send + Sync {
    /// Store `recipe` under its id, replacing any previous record.
    fn save(&self, recipe: &Recipe) -> Result<()>;

    /// Record with the given id.
    fn get(&self, id: &str) -> Option<Recipe>;

    /// All stored ids, newest first.
    fn ids(&self) -> Vec<String>;

    /// Remove a record; returns whether it existed.
    fn delete(&self, id: &str) -> bool;
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, Recipe>,
    order: Vec<String>,
}

/// In-process [`RecipeStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecipeStore for MemoryStore {
    fn save(&self, recipe: &Recipe) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.records.insert(recipe.id.clone(), recipe.clone()).is_none() {
            inner.order.insert(0, recipe.id.clone());
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Option<Recipe> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .get(id)
            .cloned()
    }

    fn ids(&self) -> Vec<String> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).order.clone()
    }

    fn delete(&self, id: &str) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let existed = inner.records.remove(id).is_some();
        if existed {
            inner.order.retain(|known| known != id);
        }
        existed
    }
}
