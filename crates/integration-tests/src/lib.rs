//! Integration test support for the catalog service.
//!
//! # Running Tests
//!
//! ```bash
//! # Repository tests (need only PostgreSQL)
//! CATALOG_DATABASE_URL=postgres://localhost/catalog_test \
//!     cargo test -p catalog-integration-tests -- --ignored
//!
//! # HTTP tests also need the server, pointed at the same database
//! cargo run -p catalog-api &
//! CATALOG_BASE_URL=http://127.0.0.1:8000 \
//!     cargo test -p catalog-integration-tests --test catalog_api -- --ignored
//! ```
//!
//! Every test truncates the catalog tables. Never point these tests at a
//! database holding real data.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};

use catalog_api::db::UserRepository;
use catalog_api::models::{
    Article, ArticleFields, ArticleInfo, ArticleInfoFields, Color, NewColor, TokenKey, User,
};
use catalog_core::{Brand, Category, Style};

/// Serializes tests within one test binary; they share one database.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Database URL for tests.
///
/// # Panics
///
/// Panics if neither `CATALOG_DATABASE_URL` nor `DATABASE_URL` is set.
#[must_use]
pub fn database_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var("CATALOG_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CATALOG_DATABASE_URL must be set for integration tests")
}

/// Base URL of a running catalog server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

/// Exclusive access to a migrated, empty catalog database.
pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

impl TestDb {
    /// Lock the database, apply migrations and truncate every catalog table.
    ///
    /// # Panics
    ///
    /// Panics if the database is unreachable or a migration fails.
    pub async fn acquire() -> Self {
        let guard = DB_LOCK.lock().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url())
            .await
            .expect("Failed to connect to test database");

        catalog_api::MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        sqlx::query(
            "TRUNCATE catalog.material, catalog.article_info, catalog.article,
                      catalog.color, catalog.api_token, catalog.app_user
             RESTART IDENTITY CASCADE",
        )
        .execute(&pool)
        .await
        .expect("Failed to truncate catalog tables");

        Self {
            pool,
            _guard: guard,
        }
    }

    /// Create a user and issue a token, returning the user and plain key.
    ///
    /// # Panics
    ///
    /// Panics if the user cannot be created.
    pub async fn user_with_token(&self, email: &str, is_staff: bool) -> (User, String) {
        let users = UserRepository::new(&self.pool);
        let user = users
            .create(email, "Test User", is_staff)
            .await
            .expect("Failed to create user");
        let key = TokenKey::generate();
        users
            .issue_token(user.id, &key.hash())
            .await
            .expect("Failed to issue token");
        (user, key.expose().to_owned())
    }

    /// Create a color.
    ///
    /// # Panics
    ///
    /// Panics if the color cannot be created.
    pub async fn color(&self, owner: &User, name: &str, code: &str) -> Color {
        catalog_api::db::ColorRepository::new(&self.pool)
            .create(
                &NewColor {
                    name: name.to_owned(),
                    code: code.to_owned(),
                },
                owner.id,
            )
            .await
            .expect("Failed to create color")
    }

    /// Create an article.
    ///
    /// # Panics
    ///
    /// Panics if the article cannot be created.
    pub async fn article(
        &self,
        owner: &User,
        artno: &str,
        brand: Option<Brand>,
        style: Option<Style>,
    ) -> Article {
        catalog_api::db::ArticleRepository::new(&self.pool)
            .create(
                &ArticleFields {
                    artno: artno.to_owned(),
                    brand: Some(brand),
                    style: Some(style),
                },
                owner.id,
            )
            .await
            .expect("Failed to create article")
    }

    /// Create an article variant.
    ///
    /// # Panics
    ///
    /// Panics if the variant cannot be created.
    pub async fn variant(
        &self,
        owner: &User,
        article: &Article,
        color: &Color,
        category: Category,
        price: Decimal,
    ) -> ArticleInfo {
        catalog_api::db::ArticleInfoRepository::new(&self.pool)
            .create(&variant_fields(article, color, category, price), owner.id)
            .await
            .expect("Failed to create article variant")
    }
}

/// Fields for a variant with default `basic`, `active` and `export`.
#[must_use]
pub fn variant_fields(
    article: &Article,
    color: &Color,
    category: Category,
    price: Decimal,
) -> ArticleInfoFields {
    ArticleInfoFields {
        article: article.id,
        color: color.id,
        category,
        price: Some(price),
        basic: None,
        active: None,
        export: None,
    }
}
