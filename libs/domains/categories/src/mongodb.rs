//! MongoDB implementation of CategoryRepository

use async_trait::async_trait;
use database::mongodb::uuid_bson;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CategoryError, CategoryResult, UniqueConstraint};
use crate::models::{Category, CategoryFilter};
use crate::repository::CategoryRepository;

const DUPLICATE_KEY_CODE: i32 = 11000;
const SLUG_INDEX: &str = "uniq_slug";
const PARENT_NAME_INDEX: &str = "uniq_parent_name";

fn parent_bson(parent_id: Option<Uuid>) -> Bson {
    parent_id.as_ref().map(uuid_bson).unwrap_or(Bson::Null)
}

/// Map an E11000 write error to the unique index that fired.
fn duplicate_constraint(err: &mongodb::error::Error) -> Option<UniqueConstraint> {
    let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() else {
        return None;
    };
    if write_error.code != DUPLICATE_KEY_CODE {
        return None;
    }

    if write_error.message.contains(SLUG_INDEX) {
        Some(UniqueConstraint::Slug)
    } else if write_error.message.contains(PARENT_NAME_INDEX) {
        Some(UniqueConstraint::ParentName)
    } else {
        tracing::warn!(message = %write_error.message, "Duplicate key on unexpected index");
        None
    }
}

#[derive(Clone)]
pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Category>("categories");
        Self { collection }
    }

    /// Unique indexes are what resolves concurrent creates.
    pub async fn init_indexes(&self) -> CategoryResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(SLUG_INDEX.to_string())
                        .build(),
                )
                .build(),
            // Roots store parentId: null, so they are siblings of each other
            IndexModel::builder()
                .keys(doc! { "parentId": 1, "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(PARENT_NAME_INDEX.to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "parentId": 1, "isActive": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_parent_active".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "path": 1 })
                .options(IndexOptions::builder().name("idx_path".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &CategoryFilter) -> Document {
        let mut doc = doc! { "parentId": parent_bson(filter.parent_id) };

        if let Some(is_active) = filter.is_active {
            doc.insert("isActive", is_active);
        }

        doc
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> CategoryResult<Option<Category>> {
        let category = self.collection.find_one(doc! { "_id": uuid_bson(&id) }).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn slug_exists(&self, slug: &str) -> CategoryResult<bool> {
        let count = self.collection.count_documents(doc! { "slug": slug }).await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_parent_and_name(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
    ) -> CategoryResult<Option<Category>> {
        let filter = doc! { "parentId": parent_bson(parent_id), "name": name };
        let category = self.collection.find_one(filter).await?;
        Ok(category)
    }

    #[instrument(skip(self, category), fields(slug = %category.slug))]
    async fn insert(&self, category: Category) -> CategoryResult<Category> {
        match self.collection.insert_one(&category).await {
            Ok(_) => Ok(category),
            Err(err) => match duplicate_constraint(&err) {
                Some(constraint) => Err(CategoryError::DuplicateKey(constraint)),
                None => Err(err.into()),
            },
        }
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CategoryFilter) -> CategoryResult<Vec<Category>> {
        let options = FindOptions::builder()
            .sort(doc! { "sortOrder": 1, "createdAt": 1, "_id": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let categories: Vec<Category> = cursor.try_collect().await?;

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_defaults_to_roots() {
        let doc = MongoCategoryRepository::build_filter(&CategoryFilter::default());
        assert_eq!(doc.get("parentId"), Some(&Bson::Null));
        assert!(!doc.contains_key("isActive"));
    }

    #[test]
    fn test_build_filter_with_active_and_parent() {
        let parent = Uuid::now_v7();
        let doc = MongoCategoryRepository::build_filter(&CategoryFilter {
            is_active: Some(true),
            parent_id: Some(parent),
        });
        assert_eq!(doc.get_bool("isActive").ok(), Some(true));
        assert_eq!(doc.get("parentId"), Some(&uuid_bson(&parent)));
    }

    #[test]
    fn test_stored_ids_match_lookup_filters() {
        let now = chrono::Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            name: "Coats".to_string(),
            slug: "coats".to_string(),
            parent_id: Some(Uuid::now_v7()),
            level: 1,
            path: "jackets/coats".to_string(),
            description: None,
            is_active: true,
            sort_order: 0,
            created_by: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        };

        let stored = mongodb::bson::to_raw_document_buf(&category)
            .unwrap()
            .to_document()
            .unwrap();
        assert_eq!(stored.get("_id"), Some(&uuid_bson(&category.id)));
        assert_eq!(stored.get("parentId"), Some(&parent_bson(category.parent_id)));
    }
}
