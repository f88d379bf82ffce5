//! Article repository.
//!
//! Renaming an article (changing its `artno`) rewrites the `artid` of every
//! variant in the same transaction as the article update.

use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use catalog_core::{ArticleId, Brand, Category, Style, UserId, derive_artid};

use super::{ArticleInfoRepository, RepositoryError};
use crate::models::{Article, ArticleDetail, ArticleFields, ArticleFilter};

const ARTICLE_SELECT: &str = "
    SELECT a.id, a.artno, a.brand, a.style,
           ARRAY(
               SELECT i.artid::text FROM catalog.article_info i
               WHERE i.article_id = a.id ORDER BY i.id
           ) AS items
    FROM catalog.article a";

#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: i32,
    artno: String,
    brand: Option<Brand>,
    style: Option<Style>,
    items: Vec<String>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: ArticleId::new(row.id),
            artno: row.artno,
            brand: row.brand,
            style: row.style,
            items: row.items,
        }
    }
}

/// A variant as needed to rebuild its `artid`.
#[derive(Debug, sqlx::FromRow)]
struct ItemKeyRow {
    id: i32,
    color_code: String,
    category: Category,
}

/// Repository for articles.
pub struct ArticleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new article repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List articles matching `filter`, by id descending.
    ///
    /// The color and category filters match when any variant of the article
    /// matches; each article appears once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, RepositoryError> {
        let color_codes = filter.color.as_ref().and_then(|c| c.codes());
        let color_names = filter.color.as_ref().and_then(|c| c.names());

        let rows: Vec<ArticleRow> = sqlx::query_as(&format!(
            "{ARTICLE_SELECT}
             WHERE ($1::text[] IS NULL OR a.brand::text = ANY($1))
               AND ($2::text[] IS NULL OR a.style::text = ANY($2))
               AND (($3::text[] IS NULL AND $4::text[] IS NULL) OR EXISTS (
                   SELECT 1 FROM catalog.article_info ai
                   JOIN catalog.color c ON c.id = ai.color_id
                   WHERE ai.article_id = a.id
                     AND ($3::text[] IS NULL OR lower(c.code) = ANY($3))
                     AND ($4::text[] IS NULL OR lower(c.name) = ANY($4))
               ))
               AND ($5::text[] IS NULL OR EXISTS (
                   SELECT 1 FROM catalog.article_info ai
                   WHERE ai.article_id = a.id
                     AND (ai.mcategory = ANY($5) OR ai.category::text = ANY($5))
               ))
             ORDER BY a.id DESC"
        ))
        .bind(filter.brands.as_deref())
        .bind(filter.styles.as_deref())
        .bind(color_codes)
        .bind(color_names)
        .bind(filter.categories.as_deref())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an article by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ArticleId) -> Result<Option<Article>, RepositoryError> {
        fetch_article(self.pool, id).await
    }

    /// Get an article by its exact article number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_artno(&self, artno: &str) -> Result<Option<Article>, RepositoryError> {
        let row: Option<ArticleRow> =
            sqlx::query_as(&format!("{ARTICLE_SELECT} WHERE a.artno = $1"))
                .bind(artno)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Get an article with its variants expanded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_detail(&self, id: ArticleId) -> Result<Option<ArticleDetail>, RepositoryError> {
        let Some(article) = self.get(id).await? else {
            return Ok(None);
        };
        let items = ArticleInfoRepository::new(self.pool)
            .list_details_for_article(id)
            .await?;

        Ok(Some(ArticleDetail {
            id: article.id,
            artno: article.artno,
            brand: article.brand,
            style: article.style,
            items,
        }))
    }

    /// Create an article owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the `artno` is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        fields: &ArticleFields,
        user_id: UserId,
    ) -> Result<Article, RepositoryError> {
        let row: ArticleRow = sqlx::query_as(
            "INSERT INTO catalog.article (artno, brand, style, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, artno, brand, style, ARRAY[]::text[] AS items",
        )
        .bind(&fields.artno)
        .bind(fields.brand.flatten())
        .bind(fields.style.flatten())
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Update an article.
    ///
    /// When `artno` changes, every variant's `artid` is rebuilt from the new
    /// number before the transaction commits.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the article does not exist.
    /// Returns `RepositoryError::Duplicate` if the new `artno` (or a rebuilt
    /// `artid`) is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: ArticleId,
        fields: &ArticleFields,
    ) -> Result<Article, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let old_artno: Option<String> =
            sqlx::query_scalar("SELECT artno FROM catalog.article WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let old_artno = old_artno.ok_or(RepositoryError::NotFound)?;

        sqlx::query(
            "UPDATE catalog.article
             SET artno = $2,
                 brand = CASE WHEN $3 THEN $4 ELSE brand END,
                 style = CASE WHEN $5 THEN $6 ELSE style END,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.artno)
        .bind(fields.brand.is_some())
        .bind(fields.brand.flatten())
        .bind(fields.style.is_some())
        .bind(fields.style.flatten())
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

        if old_artno != fields.artno {
            let items: Vec<ItemKeyRow> = sqlx::query_as(
                "SELECT ai.id, c.code AS color_code, ai.category
                 FROM catalog.article_info ai
                 JOIN catalog.color c ON c.id = ai.color_id
                 WHERE ai.article_id = $1
                 ORDER BY ai.id
                 FOR UPDATE OF ai",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            for item in &items {
                let artid = derive_artid(&fields.artno, &item.color_code, item.category.as_str());
                sqlx::query(
                    "UPDATE catalog.article_info SET artid = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(item.id)
                .bind(&artid)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from_write)?;
            }

            tracing::info!(
                old_artno = %old_artno,
                new_artno = %fields.artno,
                items = items.len(),
                "article renamed, variant ids rebuilt"
            );
        }

        let article = fetch_article(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;
        Ok(article)
    }

    /// Delete an article and, by cascade, all of its variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the article does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ArticleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.article WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

async fn fetch_article<'e, E>(executor: E, id: ArticleId) -> Result<Option<Article>, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let row: Option<ArticleRow> = sqlx::query_as(
        "SELECT a.id, a.artno, a.brand, a.style,
                ARRAY(
                    SELECT i.artid::text FROM catalog.article_info i
                    WHERE i.article_id = a.id ORDER BY i.id
                ) AS items
         FROM catalog.article a
         WHERE a.id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(Into::into))
}
