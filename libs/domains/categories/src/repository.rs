use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult, UniqueConstraint};
use crate::models::{Category, CategoryFilter};

/// Category persistence. Implementations must enforce unique `slug` and
/// unique `(parentId, name)` and report violations as
/// [`CategoryError::DuplicateKey`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>>;

    async fn slug_exists(&self, slug: &str) -> CategoryResult<bool>;

    /// Sibling lookup; `parent_id = None` searches the roots
    async fn find_by_parent_and_name(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> CategoryResult<Option<Category>>;

    /// When a row violates both constraints the reported one is
    /// implementation-defined: the in-memory store checks `(parentId, name)`
    /// before `slug`, MongoDB reports whichever index fires first. Both map
    /// to `409 Conflict`.
    async fn insert(&self, category: Category) -> CategoryResult<Category>;

    /// Ordered by sortOrder, then createdAt
    async fn list(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>>;
}

/// In-memory implementation of CategoryRepository (for development/testing)
///
/// Uniqueness is checked under the same write lock as the insert.
#[derive(Clone, Default)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> CategoryResult<bool> {
        let categories = self.categories.read().await;
        Ok(categories.values().any(|c| c.slug == slug))
    }

    async fn find_by_parent_and_name(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> CategoryResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories
            .values()
            .find(|c| c.parent_id == parent_id && c.name == name)
            .cloned())
    }

    async fn insert(&self, category: Category) -> CategoryResult<Category> {
        let mut categories = self.categories.write().await;

        if categories
            .values()
            .any(|c| c.parent_id == category.parent_id && c.name == category.name)
        {
            return Err(CategoryError::DuplicateKey(UniqueConstraint::ParentName));
        }
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(CategoryError::DuplicateKey(UniqueConstraint::Slug));
        }

        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut matching: Vec<Category> = categories
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(matching)
    }
}
