//! Article variant (`ArticleInfo`) repository.
//!
//! Every write resolves the referenced article and color, checks the
//! `(article, color, category)` triple against other rows and recomputes
//! `artid` and `mcategory`, all inside one transaction. The unique indexes
//! on the triple and on `artid` back the check up under concurrent writers.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use catalog_core::{ArticleId, ArticleInfoId, Category, ColorId, UserId, derive_artid};

use super::RepositoryError;
use crate::models::{
    ArticleInfo, ArticleInfoDetail, ArticleInfoFields, ArticleInfoFilter, MinimalArticle,
};

/// Fields reported when the `(article, color, category)` triple is taken.
const TRIPLE_FIELDS: &[&str] = &["article", "color", "category"];

const INFO_COLUMNS: &str = "ai.id, ai.artid, ai.article_id, ai.color_id, ai.category, \
                            ai.mcategory, ai.price, ai.active, ai.basic, ai.export";

const DETAIL_SELECT: &str = "
    SELECT ai.id, ai.artid, a.artno AS article, c.name AS color, ai.category,
           ai.mcategory, ai.price, ai.active, ai.basic, ai.export
    FROM catalog.article_info ai
    JOIN catalog.article a ON a.id = ai.article_id
    JOIN catalog.color c ON c.id = ai.color_id";

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ArticleInfoRow {
    id: i32,
    artid: String,
    article_id: i32,
    color_id: i32,
    category: Category,
    mcategory: String,
    price: Decimal,
    active: bool,
    basic: Decimal,
    export: bool,
}

impl From<ArticleInfoRow> for ArticleInfo {
    fn from(row: ArticleInfoRow) -> Self {
        Self {
            id: ArticleInfoId::new(row.id),
            artid: row.artid,
            article: ArticleId::new(row.article_id),
            color: ColorId::new(row.color_id),
            category: row.category,
            mcategory: row.mcategory,
            price: row.price,
            active: row.active,
            basic: row.basic,
            export: row.export,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleInfoDetailRow {
    id: i32,
    artid: String,
    article: String,
    color: String,
    category: Category,
    mcategory: String,
    price: Decimal,
    active: bool,
    basic: Decimal,
    export: bool,
}

impl From<ArticleInfoDetailRow> for ArticleInfoDetail {
    fn from(row: ArticleInfoDetailRow) -> Self {
        Self {
            id: ArticleInfoId::new(row.id),
            artid: row.artid,
            article: row.article,
            color: row.color,
            category: row.category,
            mcategory: row.mcategory,
            price: row.price,
            active: row.active,
            basic: row.basic,
            export: row.export,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MinimalRow {
    article: String,
    color: String,
    mcategory: String,
    price: Decimal,
    active: bool,
}

impl From<MinimalRow> for MinimalArticle {
    fn from(row: MinimalRow) -> Self {
        Self {
            article: row.article,
            color: row.color,
            mcategory: row.mcategory,
            price: row.price,
            active: row.active,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for article variants.
pub struct ArticleInfoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArticleInfoRepository<'a> {
    /// Create a new article variant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List variants matching `filter`, by id ascending.
    ///
    /// `categories` matches either the `mcategory` or the category code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ArticleInfoFilter,
    ) -> Result<Vec<ArticleInfo>, RepositoryError> {
        let color_codes = filter.color.as_ref().and_then(|c| c.codes());
        let color_names = filter.color.as_ref().and_then(|c| c.names());

        let rows: Vec<ArticleInfoRow> = sqlx::query_as(&format!(
            "SELECT {INFO_COLUMNS}
             FROM catalog.article_info ai
             JOIN catalog.article a ON a.id = ai.article_id
             JOIN catalog.color c ON c.id = ai.color_id
             WHERE ($1::text[] IS NULL OR lower(a.artno) = ANY($1))
               AND ($2::text[] IS NULL OR a.brand::text = ANY($2))
               AND ($3::text[] IS NULL OR a.style::text = ANY($3))
               AND ($4::text[] IS NULL OR lower(c.code) = ANY($4))
               AND ($5::text[] IS NULL OR lower(c.name) = ANY($5))
               AND ($6::text[] IS NULL
                    OR ai.mcategory = ANY($6) OR ai.category::text = ANY($6))
               AND ($7::bool IS NULL OR ai.active = $7)
               AND ($8::bool IS NULL OR ai.export = $8)
             ORDER BY ai.id"
        ))
        .bind(filter.artnos.as_deref())
        .bind(filter.brands.as_deref())
        .bind(filter.styles.as_deref())
        .bind(color_codes)
        .bind(color_names)
        .bind(filter.categories.as_deref())
        .bind(filter.active)
        .bind(filter.export)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a variant by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ArticleInfoId) -> Result<Option<ArticleInfo>, RepositoryError> {
        let row: Option<ArticleInfoRow> = sqlx::query_as(&format!(
            "SELECT {INFO_COLUMNS} FROM catalog.article_info ai WHERE ai.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a variant with its article number and color name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_detail(
        &self,
        id: ArticleInfoId,
    ) -> Result<Option<ArticleInfoDetail>, RepositoryError> {
        let row: Option<ArticleInfoDetailRow> =
            sqlx::query_as(&format!("{DETAIL_SELECT} WHERE ai.id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// All variants of one article, by id ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_details_for_article(
        &self,
        article: ArticleId,
    ) -> Result<Vec<ArticleInfoDetail>, RepositoryError> {
        let rows: Vec<ArticleInfoDetailRow> = sqlx::query_as(&format!(
            "{DETAIL_SELECT} WHERE ai.article_id = $1 ORDER BY ai.id"
        ))
        .bind(article)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Public listing of every variant, by id ascending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_minimal(&self) -> Result<Vec<MinimalArticle>, RepositoryError> {
        let rows: Vec<MinimalRow> = sqlx::query_as(
            "SELECT a.artno AS article, c.name AS color, ai.mcategory, ai.price, ai.active
             FROM catalog.article_info ai
             JOIN catalog.article a ON a.id = ai.article_id
             JOIN catalog.color c ON c.id = ai.color_id
             ORDER BY ai.id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a variant owned by `user_id`.
    ///
    /// Unset `price`/`basic` default to 0.00, `active` to true and `export`
    /// to false.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the article or color
    /// does not exist.
    /// Returns `RepositoryError::Duplicate` if the triple or `artid` is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, fields), fields(article = %fields.article, color = %fields.color))]
    pub async fn create(
        &self,
        fields: &ArticleInfoFields,
        user_id: UserId,
    ) -> Result<ArticleInfo, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let artid = prepare_write(&mut tx, fields, None).await?;

        let row: ArticleInfoRow = sqlx::query_as(
            "INSERT INTO catalog.article_info AS ai
                 (article_id, color_id, category, mcategory, artid,
                  price, basic, active, export, user_id)
             VALUES ($1, $2, $3, $4, $5,
                     COALESCE($6::numeric, 0.00), COALESCE($7::numeric, 0.00),
                     COALESCE($8::bool, TRUE), COALESCE($9::bool, FALSE), $10)
             RETURNING ai.id, ai.artid, ai.article_id, ai.color_id, ai.category,
                       ai.mcategory, ai.price, ai.active, ai.basic, ai.export",
        )
        .bind(fields.article)
        .bind(fields.color)
        .bind(fields.category)
        .bind(fields.category.main_category())
        .bind(&artid)
        .bind(fields.price)
        .bind(fields.basic)
        .bind(fields.active)
        .bind(fields.export)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;

        tracing::info!(artid = %row.artid, "article variant created");
        Ok(row.into())
    }

    /// Update a variant, recomputing `artid` and `mcategory`.
    ///
    /// Unset `price`, `basic`, `active` and `export` keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    /// Returns `RepositoryError::InvalidReference` if the article or color
    /// does not exist.
    /// Returns `RepositoryError::Duplicate` if another variant holds the
    /// triple or `artid`.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: ArticleInfoId,
        fields: &ArticleInfoFields,
    ) -> Result<ArticleInfo, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Article before variant, the same order a rename takes its locks in
        let current_article: Option<i32> = sqlx::query_scalar(
            "SELECT a.id
             FROM catalog.article a
             JOIN catalog.article_info ai ON ai.article_id = a.id
             WHERE ai.id = $1
             FOR SHARE OF a",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if current_article.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM catalog.article_info WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let artid = prepare_write(&mut tx, fields, Some(id)).await?;

        let row: ArticleInfoRow = sqlx::query_as(
            "UPDATE catalog.article_info AS ai
             SET article_id = $2,
                 color_id = $3,
                 category = $4,
                 mcategory = $5,
                 artid = $6,
                 price = COALESCE($7::numeric, ai.price),
                 basic = COALESCE($8::numeric, ai.basic),
                 active = COALESCE($9::bool, ai.active),
                 export = COALESCE($10::bool, ai.export),
                 updated_at = NOW()
             WHERE ai.id = $1
             RETURNING ai.id, ai.artid, ai.article_id, ai.color_id, ai.category,
                       ai.mcategory, ai.price, ai.active, ai.basic, ai.export",
        )
        .bind(id)
        .bind(fields.article)
        .bind(fields.color)
        .bind(fields.category)
        .bind(fields.category.main_category())
        .bind(&artid)
        .bind(fields.price)
        .bind(fields.basic)
        .bind(fields.active)
        .bind(fields.export)
        .fetch_one(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// Delete a variant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ArticleInfoId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.article_info WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Resolve references, check the triple and derive the `artid` for a write.
///
/// `exclude` is the id of the row being updated, which may keep its own
/// triple. The article row stays share-locked until the transaction ends, so
/// a concurrent rename either finishes first or waits for this write.
async fn prepare_write(
    conn: &mut PgConnection,
    fields: &ArticleInfoFields,
    exclude: Option<ArticleInfoId>,
) -> Result<String, RepositoryError> {
    let artno: Option<String> =
        sqlx::query_scalar("SELECT artno FROM catalog.article WHERE id = $1 FOR SHARE")
            .bind(fields.article)
            .fetch_optional(&mut *conn)
            .await?;
    let artno = artno.ok_or(RepositoryError::InvalidReference { field: "article" })?;

    let color_code: Option<String> =
        sqlx::query_scalar("SELECT code FROM catalog.color WHERE id = $1")
            .bind(fields.color)
            .fetch_optional(&mut *conn)
            .await?;
    let color_code = color_code.ok_or(RepositoryError::InvalidReference { field: "color" })?;

    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (
             SELECT 1 FROM catalog.article_info
             WHERE article_id = $1 AND color_id = $2 AND category = $3
               AND ($4::int IS NULL OR id <> $4)
         )",
    )
    .bind(fields.article)
    .bind(fields.color)
    .bind(fields.category)
    .bind(exclude)
    .fetch_one(&mut *conn)
    .await?;
    if taken {
        return Err(RepositoryError::Duplicate {
            fields: TRIPLE_FIELDS,
        });
    }

    Ok(derive_artid(&artno, &color_code, fields.category.as_str()))
}
