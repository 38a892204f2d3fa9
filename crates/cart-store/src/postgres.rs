use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{CartId, CartRecord, CartStore, ItemId, ItemRecord, NewItem, Result, StoreError};

const ITEM_COLUMNS: &str = "id, cart_id, name, description, image, price, quantity";

/// PostgreSQL-backed cart store implementation.
///
/// Item mutations are single statements (`ON CONFLICT` upsert, `UPDATE
/// .. RETURNING`), so the row-level locking of the database serializes
/// concurrent mutations of the same `(cart_id, item_id)` pair without
/// any read-modify-write round trip.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_item(row: PgRow) -> Result<ItemRecord> {
        Ok(ItemRecord {
            id: ItemId::new(row.try_get::<String, _>("id")?),
            cart_id: CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    #[tracing::instrument(skip(self))]
    async fn create(&self) -> Result<CartRecord> {
        let id = CartId::new();
        let row = sqlx::query("INSERT INTO carts (id) VALUES ($1) RETURNING id, created_at")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(CartRecord {
            id,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn get(&self, cart_id: CartId) -> Result<Option<CartRecord>> {
        let row = sqlx::query("SELECT id, created_at FROM carts WHERE id = $1")
            .bind(cart_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(CartRecord {
                id: cart_id,
                created_at: row.try_get("created_at")?,
            })
        })
        .transpose()
    }

    #[tracing::instrument(skip(self, item), fields(item_id = %item.id))]
    async fn upsert_item(
        &self,
        cart_id: CartId,
        item: NewItem,
        quantity: i64,
    ) -> Result<ItemRecord> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cart_items (id, cart_id, name, description, image, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id, cart_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id.as_str())
        .bind(cart_id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.image)
        .bind(item.price)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A foreign key violation means the parent cart is gone.
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("cart_items_cart_id_fkey")
            {
                return StoreError::CartNotFound(cart_id);
            }
            StoreError::Database(e)
        })?;

        Self::row_to_item(row)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_item(&self, cart_id: CartId, item_id: &ItemId) -> Result<CartId> {
        let row =
            sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2 RETURNING cart_id")
                .bind(item_id.as_str())
                .bind(cart_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => Ok(CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?)),
            None => Err(StoreError::ItemNotFound {
                cart_id,
                item_id: item_id.clone(),
            }),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_item_if_exists(&self, cart_id: CartId, item_id: &ItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
            .bind(item_id.as_str())
            .bind(cart_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn adjust_item_quantity(
        &self,
        cart_id: CartId,
        item_id: &ItemId,
        delta: i64,
    ) -> Result<(CartId, i64)> {
        let row = sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = quantity + $3
            WHERE id = $1 AND cart_id = $2
            RETURNING cart_id, quantity
            "#,
        )
        .bind(item_id.as_str())
        .bind(cart_id.as_uuid())
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok((
                CartId::from_uuid(row.try_get::<Uuid, _>("cart_id")?),
                row.try_get("quantity")?,
            )),
            None => Err(StoreError::ItemNotFound {
                cart_id,
                item_id: item_id.clone(),
            }),
        }
    }

    async fn list_items(&self, cart_id: CartId) -> Result<Vec<ItemRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM cart_items WHERE cart_id = $1 ORDER BY position ASC"
        ))
        .bind(cart_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }
}
