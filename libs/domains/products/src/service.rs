//! Product Service - listing creation and the public catalogue

use axum_helpers::field_errors;
use domain_categories::CategoryRepository;
use domain_users::{UserRepository, eligibility::can_sell};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, MyProducts, Pagination, Product, ProductPage, ProductView};
use crate::repository::ProductRepository;

/// Products plus the user and category stores they reference
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(
        repository: R,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
            categories,
        }
    }

    /// Create a listing for `user_id`.
    ///
    /// Checks run in order: account exists, account not locked, seller
    /// profile complete, input valid, category exists.
    #[instrument(skip(self, input))]
    pub async fn create_product(
        &self,
        user_id: Uuid,
        input: CreateProduct,
    ) -> ProductResult<Product> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ProductError::UserNotFound)?;

        if user.is_locked {
            return Err(ProductError::UserLocked);
        }

        let eligibility = can_sell(&user);
        if !eligibility.can_sell {
            return Err(ProductError::ProfileIncomplete {
                reason: eligibility.reason,
                missing_fields: eligibility.missing_fields.unwrap_or_default(),
            });
        }

        let product = input
            .into_product(user.id)
            .map_err(|e| ProductError::Validation(field_errors(&e)))?;

        if self
            .categories
            .find_by_id(product.category_id)
            .await?
            .is_none()
        {
            return Err(ProductError::CategoryNotFound);
        }

        let created = self.repository.create(product).await?;

        tracing::info!(
            product_id = %created.id,
            seller_id = %created.seller_id,
            title = %created.title,
            "Product created"
        );
        Ok(created)
    }

    /// Every product the user has listed, whatever its status
    #[instrument(skip(self))]
    pub async fn get_my_products(&self, user_id: Uuid) -> ProductResult<MyProducts> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ProductError::UserNotFound);
        }

        let products = self.repository.find_by_seller_id(user_id).await?;
        Ok(MyProducts {
            total: products.len(),
            products,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_all_products(&self, page: i64, limit: i64) -> ProductResult<ProductPage> {
        if page < 1 || limit < 1 {
            return Err(ProductError::InvalidPagination);
        }

        // Pages past the addressable range are invalid
        let skip = (page - 1)
            .checked_mul(limit)
            .and_then(|skip| u64::try_from(skip).ok())
            .ok_or(ProductError::InvalidPagination)?;
        let products = self.repository.find_approved_page(skip, limit).await?;
        let total = self.repository.count_approved().await?;

        let views = try_join_all(
            products
                .into_iter()
                .map(|product| self.fetch_product_with_seller(product)),
        )
        .await?;

        Ok(ProductPage {
            products: views,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// A listed product; anything else is reported as not found
    #[instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: Uuid) -> ProductResult<ProductView> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .filter(Product::is_listed)
            .ok_or(ProductError::NotFound)?;

        self.fetch_product_with_seller(product).await
    }

    #[instrument(skip(self))]
    pub async fn get_products_by_category(&self, category_id: Uuid) -> ProductResult<Vec<Product>> {
        self.repository.find_by_category_id(category_id).await
    }

    /// Resolve the category name and seller email for display.
    ///
    /// A dangling reference leaves the field empty.
    pub async fn fetch_product_with_seller(&self, product: Product) -> ProductResult<ProductView> {
        let category = self.categories.find_by_id(product.category_id).await?;
        let seller = self.users.find_by_id(product.seller_id).await?;

        Ok(ProductView {
            category_name: category.map(|c| c.name),
            seller_email: seller.map(|u| u.email),
            product,
        })
    }
}
