use sqlx::SqlitePool;

use crate::models::product::{CreateProduct, Page, Product, UpdateProduct};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, revision, created_at";

#[derive(Clone)]
pub struct ProductStore {
    db: SqlitePool,
}

impl ProductStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, product: &CreateProduct) -> Result<Product, sqlx::Error> {
        let sql = format!(
            "INSERT INTO products (name, description, price, category) VALUES (?, ?, ?, ?) RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .fetch_one(&self.db)
            .await
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await
    }

    pub async fn page(&self, page: Page) -> Result<Vec<Product>, sqlx::Error> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id LIMIT ? OFFSET ?");
        sqlx::query_as::<_, Product>(&sql)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(&self.db)
            .await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>, sqlx::Error> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    /// Applies the present fields and bumps `revision`. `None` when no row matched.
    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                category = COALESCE(?, category),
                revision = revision + 1
            WHERE id = ?
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.price)
            .bind(&changes.category)
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
