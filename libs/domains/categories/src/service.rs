//! Category Service - hierarchy rules for creating and listing categories

use axum_helpers::field_errors;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CategoryError, CategoryResult, UniqueConstraint};
use crate::models::{Category, CategoryFilter, CreateCategory, MAX_LEVEL, PublicCategory};
use crate::repository::CategoryRepository;
use crate::slug::{candidate, slugify};

pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// First free slug in `base`, `base-1`, `base-2`, ...
    ///
    /// Best effort only: a concurrent insert can still take it, which the
    /// store reports as a duplicate key.
    async fn next_free_slug(&self, base: &str) -> CategoryResult<String> {
        let mut n = 0;
        loop {
            let slug = candidate(base, n);
            if !self.repository.slug_exists(&slug).await? {
                return Ok(slug);
            }
            n += 1;
        }
    }

    /// Level and path for a new category under `parent_id`.
    async fn placement(&self, parent_id: Option<Uuid>, slug: &str) -> CategoryResult<(i32, String)> {
        let Some(parent_id) = parent_id else {
            return Ok((0, slug.to_string()));
        };

        let parent = self
            .repository
            .find_by_id(parent_id)
            .await?
            .ok_or(CategoryError::ParentNotFound)?;

        if !parent.is_active {
            return Err(CategoryError::ParentInactive);
        }

        let level = parent.level + 1;
        if level > MAX_LEVEL {
            return Err(CategoryError::MaxLevelExceeded);
        }

        Ok((level, format!("{}/{}", parent.path, slug)))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(
        &self,
        actor_id: Uuid,
        input: CreateCategory,
    ) -> CategoryResult<Category> {
        let input = input.normalized();
        input
            .validate()
            .map_err(|e| CategoryError::InvalidInput(field_errors(&e)))?;

        let slug = self.next_free_slug(&slugify(&input.name)).await?;
        let (level, path) = self.placement(input.parent_id, &slug).await?;

        if self
            .repository
            .find_by_parent_and_name(input.parent_id, &input.name)
            .await?
            .is_some()
        {
            return Err(CategoryError::DuplicateName);
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: input.name,
            slug,
            parent_id: input.parent_id,
            level,
            path,
            description: input.description,
            is_active: input.is_active.unwrap_or(true),
            sort_order: input.sort_order.unwrap_or(0),
            created_by: actor_id,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.insert(category).await.map_err(|e| match e {
            CategoryError::DuplicateKey(UniqueConstraint::Slug) => CategoryError::DuplicateSlug,
            CategoryError::DuplicateKey(UniqueConstraint::ParentName) => {
                CategoryError::DuplicateName
            }
            other => other,
        })?;

        tracing::info!(
            category_id = %created.id,
            slug = %created.slug,
            level = created.level,
            created_by = %actor_id,
            "Category created"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>> {
        self.repository.list(filter).await
    }

    /// Active categories under `parent_id` (roots when `None`)
    #[instrument(skip(self))]
    pub async fn list_public_categories(
        &self,
        parent_id: Option<Uuid>,
    ) -> CategoryResult<Vec<PublicCategory>> {
        let filter = CategoryFilter {
            is_active: Some(true),
            parent_id,
        };
        let categories = self.repository.list(filter).await?;
        Ok(categories.into_iter().map(PublicCategory::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryCategoryRepository, MockCategoryRepository};

    fn input(name: &str, parent_id: Option<Uuid>) -> CreateCategory {
        CreateCategory {
            name: name.to_string(),
            parent_id,
            ..Default::default()
        }
    }

    fn service() -> CategoryService<InMemoryCategoryRepository> {
        CategoryService::new(InMemoryCategoryRepository::new())
    }

    #[tokio::test]
    async fn test_root_and_child_placement() {
        let service = service();
        let admin = Uuid::now_v7();

        let shoes = service.create_category(admin, input("Shoes", None)).await.unwrap();
        assert_eq!(shoes.level, 0);
        assert_eq!(shoes.path, "shoes");
        assert!(shoes.parent_id.is_none());
        assert!(shoes.is_active);
        assert_eq!(shoes.sort_order, 0);
        assert_eq!(shoes.created_by, admin);

        let sneakers = service
            .create_category(admin, input("Sneakers", Some(shoes.id)))
            .await
            .unwrap();
        assert_eq!(sneakers.level, 1);
        assert_eq!(sneakers.path, "shoes/sneakers");

        let again = service
            .create_category(admin, input("Sneakers", Some(shoes.id)))
            .await;
        assert!(matches!(again, Err(CategoryError::DuplicateName)));
    }

    #[tokio::test]
    async fn test_slug_probing_sequence() {
        let service = service();
        let admin = Uuid::now_v7();

        // Distinct names, same base slug
        let names = ["Áo", "Ao", "ÁO!", "ao?"];
        let mut slugs = Vec::new();
        for name in names {
            let created = service.create_category(admin, input(name, None)).await.unwrap();
            slugs.push(created.slug);
        }

        assert_eq!(slugs, vec!["ao", "ao-1", "ao-2", "ao-3"]);
    }

    #[tokio::test]
    async fn test_max_level_exceeded() {
        let service = service();
        let admin = Uuid::now_v7();

        let mut parent = service.create_category(admin, input("L0", None)).await.unwrap();
        for name in ["L1", "L2", "L3"] {
            parent = service
                .create_category(admin, input(name, Some(parent.id)))
                .await
                .unwrap();
        }
        assert_eq!(parent.level, 3);
        assert_eq!(parent.path, "l0/l1/l2/l3");

        let too_deep = service
            .create_category(admin, input("L4", Some(parent.id)))
            .await;
        assert!(matches!(too_deep, Err(CategoryError::MaxLevelExceeded)));
    }

    #[tokio::test]
    async fn test_parent_missing_or_inactive() {
        let service = service();
        let admin = Uuid::now_v7();

        let missing = service
            .create_category(admin, input("Child", Some(Uuid::now_v7())))
            .await;
        assert!(matches!(missing, Err(CategoryError::ParentNotFound)));

        let inactive = service
            .create_category(
                admin,
                CreateCategory {
                    is_active: Some(false),
                    ..input("Archived", None)
                },
            )
            .await
            .unwrap();
        let child = service
            .create_category(admin, input("Child", Some(inactive.id)))
            .await;
        assert!(matches!(child, Err(CategoryError::ParentInactive)));
    }

    #[tokio::test]
    async fn test_invalid_input_reports_field_errors() {
        let service = service();

        let err = service
            .create_category(
                Uuid::now_v7(),
                CreateCategory {
                    sort_order: Some(-1),
                    ..input(" a ", None)
                },
            )
            .await
            .unwrap_err();

        let CategoryError::InvalidInput(details) = err else {
            panic!("expected invalid input");
        };
        assert!(details["fieldErrors"]["name"].is_array());
        assert!(details["fieldErrors"]["sortOrder"].is_array());
    }

    #[tokio::test]
    async fn test_stores_trimmed_values() {
        let service = service();

        let created = service
            .create_category(
                Uuid::now_v7(),
                CreateCategory {
                    description: Some("   ".to_string()),
                    sort_order: Some(7),
                    ..input("  Bags  ", None)
                },
            )
            .await
            .unwrap();

        assert_eq!(created.name, "Bags");
        assert!(created.description.is_none());
        assert_eq!(created.sort_order, 7);
    }

    #[tokio::test]
    async fn test_concurrent_same_name_siblings() {
        let service = Arc::new(service());
        let admin = Uuid::now_v7();

        let a = {
            let service = service.clone();
            tokio::spawn(async move { service.create_category(admin, input("Bags", None)).await })
        };
        let b = {
            let service = service.clone();
            tokio::spawn(async move { service.create_category(admin, input("Bags", None)).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(CategoryError::DuplicateName) | Err(CategoryError::DuplicateSlug)
                )
            })
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
    }

    #[tokio::test]
    async fn test_store_duplicate_slug_is_reclassified() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_slug_exists().returning(|_| Ok(false));
        repo.expect_find_by_parent_and_name()
            .returning(|_, _| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(CategoryError::DuplicateKey(UniqueConstraint::Slug)));

        let service = CategoryService::new(repo);
        let result = service
            .create_category(Uuid::now_v7(), input("Shoes", None))
            .await;

        assert!(matches!(result, Err(CategoryError::DuplicateSlug)));
    }

    #[tokio::test]
    async fn test_list_public_only_active() {
        let service = service();
        let admin = Uuid::now_v7();

        service.create_category(admin, input("Visible", None)).await.unwrap();
        service
            .create_category(
                admin,
                CreateCategory {
                    is_active: Some(false),
                    ..input("Hidden", None)
                },
            )
            .await
            .unwrap();

        let public = service.list_public_categories(None).await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].name, "Visible");

        let all = service
            .list_categories(CategoryFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
