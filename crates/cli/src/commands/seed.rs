//! Seed the database with a small sample catalog.
//!
//! Safe to run repeatedly: existing colors and articles are reused by code
//! and artno, and variants or materials that already exist are skipped.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use catalog_api::db::{
    ArticleInfoRepository, ArticleRepository, ColorRepository, MaterialRepository,
    RepositoryError, UserRepository,
};
use catalog_api::models::{
    Article, ArticleFields, ArticleInfoFields, Color, MaterialFields, NewColor, User,
};
use catalog_core::{Brand, Category, MaterialCategory, Style, Uom};

use super::{CommandError, check_email, connect};

/// Owner of seeded rows when no `--owner` is given.
pub const DEFAULT_OWNER: &str = "seed@catalog.local";

const COLORS: &[(&str, &str)] = &[
    ("black", "bk"),
    ("brown", "br"),
    ("grey", "gy"),
    ("blue", "bl"),
];

const ARTICLES: &[(&str, Brand, Style)] = &[
    ("3290", Brand::Pride, Style::Covering),
    ("8436", Brand::Pride, Style::Sandal),
    ("d4303", Brand::Debongo, Style::VStrap),
    ("k6012", Brand::Kapers, Style::Sandal),
];

/// Seed variant.
struct SampleItem {
    artno: &'static str,
    color: &'static str,
    category: Category,
    active: bool,
    export: bool,
    /// Whole rupees.
    price: i64,
}

const ITEMS: &[SampleItem] = &[
    SampleItem {
        artno: "3290",
        color: "bk",
        category: Category::Gents,
        active: true,
        export: false,
        price: 270,
    },
    SampleItem {
        artno: "3290",
        color: "br",
        category: Category::Gents,
        active: false,
        export: true,
        price: 270,
    },
    SampleItem {
        artno: "8436",
        color: "bl",
        category: Category::Ladies,
        active: false,
        export: false,
        price: 239,
    },
    SampleItem {
        artno: "d4303",
        color: "gy",
        category: Category::Giants,
        active: true,
        export: true,
        price: 329,
    },
    SampleItem {
        artno: "k6012",
        color: "bl",
        category: Category::Kids,
        active: false,
        export: false,
        price: 309,
    },
    SampleItem {
        artno: "k6012",
        color: "bl",
        category: Category::Boys,
        active: false,
        export: false,
        price: 309,
    },
];

/// Counts reported after seeding.
#[derive(Debug, Default)]
struct SeedSummary {
    inserted: usize,
    skipped: usize,
}

impl SeedSummary {
    fn record<T>(&mut self, result: Result<T, RepositoryError>) -> Result<(), RepositoryError> {
        match result {
            Ok(_) => self.inserted += 1,
            Err(RepositoryError::Duplicate { .. }) => self.skipped += 1,
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a write fails
/// for a reason other than the row already existing.
pub async fn run(owner_email: &str) -> Result<(), CommandError> {
    check_email(owner_email)?;
    let pool = connect().await?;
    let owner = owner(&pool, owner_email).await?;
    let mut summary = SeedSummary::default();

    let mut colors = Vec::with_capacity(COLORS.len());
    for (name, code) in COLORS {
        colors.push(color(&pool, &owner, name, code, &mut summary).await?);
    }

    let mut articles = Vec::with_capacity(ARTICLES.len());
    for (artno, brand, style) in ARTICLES {
        articles.push(article(&pool, &owner, artno, *brand, *style, &mut summary).await?);
    }

    let variants = ArticleInfoRepository::new(&pool);
    for item in ITEMS {
        let (Some(article), Some(color)) = (
            articles.iter().find(|a| a.artno == item.artno),
            colors.iter().find(|c| c.code == item.color),
        ) else {
            continue;
        };

        let fields = ArticleInfoFields {
            article: article.id,
            color: color.id,
            category: item.category,
            price: Some(Decimal::new(item.price * 100, 2)),
            basic: None,
            active: Some(item.active),
            export: Some(item.export),
        };
        summary.record(variants.create(&fields, owner.id).await)?;
    }

    let materials = MaterialRepository::new(&pool);
    for fields in sample_materials() {
        summary.record(materials.create(&fields).await)?;
    }

    info!("Seeding complete!");
    info!("  Rows inserted: {}", summary.inserted);
    info!("  Rows skipped (already exist): {}", summary.skipped);

    Ok(())
}

async fn owner(pool: &PgPool, email: &str) -> Result<User, CommandError> {
    let users = UserRepository::new(pool);
    if let Some(user) = users.get_by_email(email).await? {
        return Ok(user);
    }
    info!("Creating seed owner {email}");
    Ok(users.create(email, "Seed", false).await?)
}

async fn color(
    pool: &PgPool,
    owner: &User,
    name: &str,
    code: &str,
    summary: &mut SeedSummary,
) -> Result<Color, CommandError> {
    let repo = ColorRepository::new(pool);
    if let Some(existing) = repo.get_by_code(code).await? {
        summary.skipped += 1;
        return Ok(existing);
    }
    let color = repo
        .create(
            &NewColor {
                name: name.to_owned(),
                code: code.to_owned(),
            },
            owner.id,
        )
        .await?;
    summary.inserted += 1;
    Ok(color)
}

async fn article(
    pool: &PgPool,
    owner: &User,
    artno: &str,
    brand: Brand,
    style: Style,
    summary: &mut SeedSummary,
) -> Result<Article, CommandError> {
    let repo = ArticleRepository::new(pool);
    if let Some(existing) = repo.get_by_artno(artno).await? {
        summary.skipped += 1;
        return Ok(existing);
    }
    let article = repo
        .create(
            &ArticleFields {
                artno: artno.to_owned(),
                brand: Some(Some(brand)),
                style: Some(Some(style)),
            },
            owner.id,
        )
        .await?;
    info!("Created article {artno} ({}, {})", brand.label(), style.label());
    summary.inserted += 1;
    Ok(article)
}

fn sample_materials() -> [MaterialFields; 2] {
    [
        MaterialFields {
            code: "5-co07".to_owned(),
            name: "Non pasted tape".to_owned(),
            category: Some(Some(MaterialCategory::Packing)),
            subcategory: Some("tape".to_owned()),
            uom: Some(Some(Uom::Roll)),
            purchaseuom: Some(Some(Uom::Roll)),
            cf: None,
            price: Some(Decimal::new(4500, 2)),
            active: None,
        },
        MaterialFields {
            code: "r-blk-01".to_owned(),
            name: "Rexin black 1mm".to_owned(),
            category: Some(Some(MaterialCategory::Rexin)),
            subcategory: Some("sheet".to_owned()),
            uom: Some(Some(Uom::Meter)),
            purchaseuom: Some(Some(Uom::Meter)),
            cf: None,
            price: Some(Decimal::new(18000, 2)),
            active: None,
        },
    ]
}
