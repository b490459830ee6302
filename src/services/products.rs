use crate::{
    auth::require_role,
    error::AppError,
    models::{
        product::{CreateProduct, Page, Paginated, Product, UpdateProduct},
        user::Role,
    },
    store::ProductStore,
};

const NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductService {
    products: ProductStore,
}

impl ProductService {
    pub fn new(products: ProductStore) -> Self {
        Self { products }
    }

    pub async fn create(&self, input: CreateProduct) -> Result<Product, AppError> {
        input.validate()?;
        let product = self.products.create(&input).await?;
        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn list(&self, page: Page) -> Result<Paginated<Product>, AppError> {
        let total_items = self.products.count().await?;
        let data = self.products.page(page).await?;
        Ok(Paginated {
            data,
            current_page: page.page,
            total_pages: page.total_pages(total_items),
            total_items,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Product, AppError> {
        self.products
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    pub async fn update(&self, id: i64, changes: UpdateProduct) -> Result<Product, AppError> {
        changes.validate()?;
        self.products
            .update(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    /// Admin only. `caller_role` must come from the stored user, not the token.
    pub async fn remove(&self, caller_role: Role, id: i64) -> Result<(), AppError> {
        require_role(caller_role, Role::Admin)?;
        if !self.products.delete(id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }
}

/// Path ids that are not integers name no product.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::not_found(NOT_FOUND))
}
