//! Material repository.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{MaterialCategory, MaterialId, Uom, filter::contains_patterns};

use super::RepositoryError;
use crate::models::{Material, MaterialFields, MaterialFilter};

const MATERIAL_COLUMNS: &str =
    "id, code, name, category, subcategory, uom, purchaseuom, cf, price, active";

#[derive(Debug, sqlx::FromRow)]
struct MaterialRow {
    id: i32,
    code: String,
    name: String,
    category: Option<MaterialCategory>,
    subcategory: String,
    uom: Option<Uom>,
    purchaseuom: Option<Uom>,
    cf: Decimal,
    price: Decimal,
    active: bool,
}

impl From<MaterialRow> for Material {
    fn from(row: MaterialRow) -> Self {
        Self {
            id: MaterialId::new(row.id),
            code: row.code,
            name: row.name,
            category: row.category,
            subcategory: row.subcategory,
            uom: row.uom,
            purchaseuom: row.purchaseuom,
            cf: row.cf,
            price: row.price,
            active: row.active,
        }
    }
}

/// Repository for bill-of-materials entries.
pub struct MaterialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MaterialRepository<'a> {
    /// Create a new material repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List materials matching `filter`, by id ascending.
    ///
    /// `codes` and `names` are case-insensitive substring matches where any
    /// token may match; the other filters are exact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &MaterialFilter) -> Result<Vec<Material>, RepositoryError> {
        let code_patterns = filter.codes.as_deref().map(contains_patterns);
        let name_patterns = filter.names.as_deref().map(contains_patterns);

        let rows: Vec<MaterialRow> = sqlx::query_as(&format!(
            "SELECT {MATERIAL_COLUMNS}
             FROM catalog.material
             WHERE ($1::text[] IS NULL OR code ILIKE ANY($1))
               AND ($2::text[] IS NULL OR name ILIKE ANY($2))
               AND ($3::text[] IS NULL OR category::text = ANY($3))
               AND ($4::text[] IS NULL OR lower(subcategory) = ANY($4))
               AND ($5::bool IS NULL OR active = $5)
             ORDER BY id"
        ))
        .bind(code_patterns)
        .bind(name_patterns)
        .bind(filter.categories.as_deref())
        .bind(filter.subcategories.as_deref())
        .bind(filter.active)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a material by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: MaterialId) -> Result<Option<Material>, RepositoryError> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM catalog.material WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a material.
    ///
    /// Unset `subcategory` defaults to empty, `cf` to 1, `price` to 0.00 and
    /// `active` to true.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the code is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(&self, fields: &MaterialFields) -> Result<Material, RepositoryError> {
        let row: MaterialRow = sqlx::query_as(&format!(
            "INSERT INTO catalog.material
                 (code, name, category, subcategory, uom, purchaseuom, cf, price, active)
             VALUES ($1, $2, $3, COALESCE($4::text, ''), $5, $6,
                     COALESCE($7::numeric, 1), COALESCE($8::numeric, 0.00),
                     COALESCE($9::bool, TRUE))
             RETURNING {MATERIAL_COLUMNS}"
        ))
        .bind(&fields.code)
        .bind(&fields.name)
        .bind(fields.category.flatten())
        .bind(fields.subcategory.as_deref())
        .bind(fields.uom.flatten())
        .bind(fields.purchaseuom.flatten())
        .bind(fields.cf)
        .bind(fields.price)
        .bind(fields.active)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Update a material. Unset optional fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the material does not exist.
    /// Returns `RepositoryError::Duplicate` if the code is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: MaterialId,
        fields: &MaterialFields,
    ) -> Result<Material, RepositoryError> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!(
            "UPDATE catalog.material
             SET code = $2,
                 name = $3,
                 category = CASE WHEN $4 THEN $5 ELSE category END,
                 subcategory = COALESCE($6::text, subcategory),
                 uom = CASE WHEN $7 THEN $8 ELSE uom END,
                 purchaseuom = CASE WHEN $9 THEN $10 ELSE purchaseuom END,
                 cf = COALESCE($11::numeric, cf),
                 price = COALESCE($12::numeric, price),
                 active = COALESCE($13::bool, active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {MATERIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(&fields.code)
        .bind(&fields.name)
        .bind(fields.category.is_some())
        .bind(fields.category.flatten())
        .bind(fields.subcategory.as_deref())
        .bind(fields.uom.is_some())
        .bind(fields.uom.flatten())
        .bind(fields.purchaseuom.is_some())
        .bind(fields.purchaseuom.flatten())
        .bind(fields.cf)
        .bind(fields.price)
        .bind(fields.active)
        .fetch_optional(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a material.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the material does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: MaterialId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.material WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
