//! Repository tests against a real `PostgreSQL` database.
//!
//! These tests require `CATALOG_DATABASE_URL` pointing at a disposable
//! database. Run with: cargo test -p catalog-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::PgPool;

use catalog_api::db::{
    ArticleInfoRepository, ArticleRepository, ColorRepository, MaterialRepository,
    RepositoryError,
};
use catalog_api::models::{
    ArticleFields, ArticleFilter, ArticleInfoFields, ArticleInfoFilter, MaterialFields,
    MaterialFilter, NewColor,
};
use catalog_core::{Brand, Category, ColorFilter, MaterialCategory, Style, Uom};
use catalog_integration_tests::{TestDb, variant_fields};

fn price(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

fn material(code: &str, name: &str) -> MaterialFields {
    MaterialFields {
        code: code.to_owned(),
        name: name.to_owned(),
        category: None,
        subcategory: None,
        uom: None,
        purchaseuom: None,
        cf: None,
        price: None,
        active: None,
    }
}

fn rename_to(artno: &str) -> ArticleFields {
    ArticleFields {
        artno: artno.to_owned(),
        brand: None,
        style: None,
    }
}

/// Wait until `count` sessions on the test database are blocked on a lock.
async fn wait_for_lock_waiters(pool: &PgPool, count: i64) {
    for _ in 0..250 {
        let waiting: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM pg_stat_activity
             WHERE datname = current_database() AND wait_event_type = 'Lock'",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        if waiting >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("expected {count} sessions waiting on a lock");
}

// =============================================================================
// Article Variants
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_scenario_gents_black_3290() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;

    let article = db
        .article(&user, "3290", Some(Brand::Pride), Some(Style::Covering))
        .await;
    let black = db.color(&user, "black", "bk").await;
    let item = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;

    assert_eq!(item.artid, "3290-bk-g");
    assert_eq!(item.mcategory, "gents");
    assert_eq!(item.price, price("270.00"));
    assert_eq!(item.basic, Decimal::ZERO);
    assert!(item.active);
    assert!(!item.export);

    let detail = ArticleInfoRepository::new(&db.pool)
        .get_detail(item.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.article, "3290");
    assert_eq!(detail.color, "black");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_duplicate_triple_is_rejected() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    db.variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;

    let err = ArticleInfoRepository::new(&db.pool)
        .create(
            &variant_fields(&article, &black, Category::Gents, price("199.00")),
            user.id,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Duplicate { fields } if fields == ["article", "color", "category"]
    ));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_update_may_keep_own_triple_but_not_take_another() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let gents = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;
    let ladies = db
        .variant(&user, &article, &black, Category::Ladies, price("250.00"))
        .await;
    let repo = ArticleInfoRepository::new(&db.pool);

    // Same triple, new price
    let updated = repo
        .update(
            gents.id,
            &variant_fields(&article, &black, Category::Gents, price("280.00")),
        )
        .await
        .unwrap();
    assert_eq!(updated.price, price("280.00"));
    assert_eq!(updated.artid, "3290-bk-g");

    // Taking the ladies triple fails
    let err = repo
        .update(
            gents.id,
            &variant_fields(&article, &black, Category::Ladies, price("280.00")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate { .. }));

    // Ladies row is untouched
    let ladies_now = repo.get(ladies.id).await.unwrap().unwrap();
    assert_eq!(ladies_now, ladies);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_update_recomputes_derived_fields_and_keeps_unset_values() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "d4303", None, None).await;
    let grey = db.color(&user, "grey", "gy").await;
    let item = db
        .variant(&user, &article, &grey, Category::Gents, price("120.50"))
        .await;

    let updated = ArticleInfoRepository::new(&db.pool)
        .update(
            item.id,
            &ArticleInfoFields {
                article: article.id,
                color: grey.id,
                category: Category::Giants,
                price: None,
                basic: Some(price("99.99")),
                active: Some(false),
                export: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.artid, "d4303-gy-x");
    assert_eq!(updated.mcategory, "giants");
    assert_eq!(updated.price, price("120.50"));
    assert_eq!(updated.basic, price("99.99"));
    assert!(!updated.active);
    assert!(!updated.export);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_missing_references_are_reported_per_field() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let repo = ArticleInfoRepository::new(&db.pool);

    let mut fields = variant_fields(&article, &black, Category::Gents, Decimal::ZERO);
    fields.color = catalog_core::ColorId::new(black.id.as_i32() + 100);
    let err = repo.create(&fields, user.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidReference { field: "color" }));

    let mut fields = variant_fields(&article, &black, Category::Gents, Decimal::ZERO);
    fields.article = catalog_core::ArticleId::new(article.id.as_i32() + 100);
    let err = repo.create(&fields, user.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidReference { field: "article" }));

    let err = repo
        .update(
            catalog_core::ArticleInfoId::new(9999),
            &variant_fields(&article, &black, Category::Gents, Decimal::ZERO),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

// =============================================================================
// Articles
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_rename_rewrites_every_artid() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db
        .article(&user, "3290", Some(Brand::Pride), Some(Style::Covering))
        .await;
    let black = db.color(&user, "black", "bk").await;
    let blue = db.color(&user, "blue", "bl").await;
    db.variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;
    db.variant(&user, &article, &blue, Category::Kids, price("150.00"))
        .await;

    let renamed = ArticleRepository::new(&db.pool)
        .update(
            article.id,
            &ArticleFields {
                artno: "3780".to_owned(),
                brand: None,
                style: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.artno, "3780");
    assert_eq!(renamed.items, vec!["3780-bk-g", "3780-bl-k"]);
    // Unsent brand and style are kept
    assert_eq!(renamed.brand, Some(Brand::Pride));
    assert_eq!(renamed.style, Some(Style::Covering));

    let stale = ArticleInfoRepository::new(&db.pool)
        .list(&ArticleInfoFilter {
            artnos: Some(vec!["3290".to_owned()]),
            ..ArticleInfoFilter::default()
        })
        .await
        .unwrap();
    assert!(stale.is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_rename_to_taken_artno_changes_nothing() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let first = db.article(&user, "3290", None, None).await;
    db.article(&user, "3780", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    db.variant(&user, &first, &black, Category::Gents, price("270.00"))
        .await;

    let repo = ArticleRepository::new(&db.pool);
    let err = repo
        .update(
            first.id,
            &ArticleFields {
                artno: "3780".to_owned(),
                brand: None,
                style: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate { fields } if fields == ["artno"]));

    let unchanged = repo.get(first.id).await.unwrap().unwrap();
    assert_eq!(unchanged.artno, "3290");
    assert_eq!(unchanged.items, vec!["3290-bk-g"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_article_filters_match_through_variants() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let black = db.color(&user, "black", "bk").await;
    let grey = db.color(&user, "grey", "gy").await;

    let gents = db
        .article(&user, "3290", Some(Brand::Pride), Some(Style::Covering))
        .await;
    let kids = db
        .article(&user, "k6012", Some(Brand::Disney), Some(Style::Sandal))
        .await;
    let giants = db
        .article(&user, "d4303", Some(Brand::Debongo), Some(Style::VStrap))
        .await;

    db.variant(&user, &gents, &black, Category::Gents, price("270.00"))
        .await;
    db.variant(&user, &kids, &black, Category::Kids, price("150.00"))
        .await;
    db.variant(&user, &kids, &black, Category::Boys, price("150.00"))
        .await;
    db.variant(&user, &giants, &grey, Category::Giants, price("300.00"))
        .await;

    let repo = ArticleRepository::new(&db.pool);
    let artnos = |articles: Vec<catalog_api::models::Article>| {
        articles.into_iter().map(|a| a.artno).collect::<Vec<_>>()
    };

    // Newest first, no filter
    let all = repo.list(&ArticleFilter::default()).await.unwrap();
    assert_eq!(artnos(all), vec!["d4303", "k6012", "3290"]);

    // Main category names, distinct even though k6012 has two kids variants
    let filter = ArticleFilter {
        categories: Some(vec!["kids".to_owned(), "giants".to_owned()]),
        ..ArticleFilter::default()
    };
    assert_eq!(artnos(repo.list(&filter).await.unwrap()), vec!["d4303", "k6012"]);

    // Category codes work too
    let filter = ArticleFilter {
        categories: Some(vec!["g".to_owned()]),
        ..ArticleFilter::default()
    };
    assert_eq!(artnos(repo.list(&filter).await.unwrap()), vec!["3290"]);

    // Color by code, then by name
    let filter = ArticleFilter {
        color: ColorFilter::parse(Some("bk")),
        ..ArticleFilter::default()
    };
    assert_eq!(artnos(repo.list(&filter).await.unwrap()), vec!["k6012", "3290"]);
    let filter = ArticleFilter {
        color: ColorFilter::parse(Some("grey")),
        ..ArticleFilter::default()
    };
    assert_eq!(artnos(repo.list(&filter).await.unwrap()), vec!["d4303"]);

    // Brand and style combine with AND
    let filter = ArticleFilter {
        brands: Some(vec!["pride".to_owned(), "disney".to_owned()]),
        styles: Some(vec!["sandal".to_owned()]),
        ..ArticleFilter::default()
    };
    assert_eq!(artnos(repo.list(&filter).await.unwrap()), vec!["k6012"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_delete_article_cascades_to_variants() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let item = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;

    let repo = ArticleRepository::new(&db.pool);
    repo.delete(article.id).await.unwrap();

    assert!(repo.get(article.id).await.unwrap().is_none());
    assert!(
        ArticleInfoRepository::new(&db.pool)
            .get(item.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(matches!(
        repo.delete(article.id).await.unwrap_err(),
        RepositoryError::NotFound
    ));
}

// =============================================================================
// Concurrent Writes
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_variant_created_during_rename_gets_new_artno() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let brown = db.color(&user, "brown", "br").await;
    let existing = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;

    // Holding the existing variant stalls the rename after it has updated
    // the article row but before it rewrites the variants
    let mut blocker = db.pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM catalog.article_info WHERE id = $1 FOR UPDATE")
        .bind(existing.id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let pool = db.pool.clone();
    let article_id = article.id;
    let rename = tokio::spawn(async move {
        ArticleRepository::new(&pool)
            .update(article_id, &rename_to("3780"))
            .await
    });
    wait_for_lock_waiters(&db.pool, 1).await;

    let pool = db.pool.clone();
    let fields = variant_fields(&article, &brown, Category::Ladies, price("250.00"));
    let owner = user.id;
    let create = tokio::spawn(async move {
        ArticleInfoRepository::new(&pool)
            .create(&fields, owner)
            .await
    });
    wait_for_lock_waiters(&db.pool, 2).await;

    blocker.rollback().await.unwrap();

    let renamed = rename.await.unwrap().unwrap();
    let created = create.await.unwrap().unwrap();

    assert_eq!(renamed.artno, "3780");
    assert_eq!(created.artid, "3780-br-l");
    let items = ArticleRepository::new(&db.pool)
        .get(article.id)
        .await
        .unwrap()
        .unwrap()
        .items;
    assert_eq!(items, vec!["3780-bk-g", "3780-br-l"]);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_variant_updated_during_rename_gets_new_artno() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let held = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;
    let edited = db
        .variant(&user, &article, &black, Category::Ladies, price("250.00"))
        .await;

    let mut blocker = db.pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM catalog.article_info WHERE id = $1 FOR UPDATE")
        .bind(held.id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let pool = db.pool.clone();
    let article_id = article.id;
    let rename = tokio::spawn(async move {
        ArticleRepository::new(&pool)
            .update(article_id, &rename_to("3780"))
            .await
    });
    wait_for_lock_waiters(&db.pool, 1).await;

    // Waits on the article before touching its own row, so the rename can
    // still take that row once the blocker lets go
    let pool = db.pool.clone();
    let fields = variant_fields(&article, &black, Category::Kids, price("150.00"));
    let edited_id = edited.id;
    let update = tokio::spawn(async move {
        ArticleInfoRepository::new(&pool)
            .update(edited_id, &fields)
            .await
    });
    wait_for_lock_waiters(&db.pool, 2).await;

    blocker.rollback().await.unwrap();

    rename.await.unwrap().unwrap();
    let updated = update.await.unwrap().unwrap();

    assert_eq!(updated.artid, "3780-bk-k");
    let held_now = ArticleInfoRepository::new(&db.pool)
        .get(held.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(held_now.artid, "3780-bk-g");
}

// =============================================================================
// Variant Filters
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_variant_boolean_and_color_filters() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", true).await;
    let article = db.article(&user, "3290", None, None).await;
    let black = db.color(&user, "black", "bk").await;
    let blue = db.color(&user, "blue", "bl").await;
    let active = db
        .variant(&user, &article, &black, Category::Gents, price("270.00"))
        .await;
    let inactive = ArticleInfoRepository::new(&db.pool)
        .create(
            &ArticleInfoFields {
                active: Some(false),
                export: Some(true),
                ..variant_fields(&article, &blue, Category::Ladies, price("250.00"))
            },
            user.id,
        )
        .await
        .unwrap();

    let repo = ArticleInfoRepository::new(&db.pool);
    let ids = |items: Vec<catalog_api::models::ArticleInfo>| {
        items.into_iter().map(|i| i.id).collect::<Vec<_>>()
    };

    let filter = ArticleInfoFilter {
        active: Some(true),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![active.id]);

    // "none" parses to false
    let filter = ArticleInfoFilter {
        active: catalog_core::filter::bool_param("active", Some("none")).unwrap(),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![inactive.id]);

    let filter = ArticleInfoFilter {
        export: Some(true),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![inactive.id]);

    let filter = ArticleInfoFilter {
        color: ColorFilter::parse(Some("bk")),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![active.id]);

    let filter = ArticleInfoFilter {
        color: ColorFilter::parse(Some("black")),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![active.id]);

    // One long token switches the whole list to names; "bk" is no color name
    let filter = ArticleInfoFilter {
        color: ColorFilter::parse(Some("bk, blue")),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![inactive.id]);

    let filter = ArticleInfoFilter {
        categories: Some(vec!["ladies".to_owned()]),
        ..ArticleInfoFilter::default()
    };
    assert_eq!(ids(repo.list(&filter).await.unwrap()), vec![inactive.id]);

    let minimal = repo.list_minimal().await.unwrap();
    assert_eq!(minimal.len(), 2);
    assert_eq!(minimal[0].article, "3290");
    assert_eq!(minimal[0].color, "black");
    assert_eq!(minimal[1].mcategory, "ladies");
}

// =============================================================================
// Colors
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_colors_unique_and_ordered_by_name_desc() {
    let db = TestDb::acquire().await;
    let (user, _) = db.user_with_token("owner@example.com", false).await;
    db.color(&user, "black", "bk").await;
    db.color(&user, "white", "wt").await;
    db.color(&user, "grey", "gy").await;

    let repo = ColorRepository::new(&db.pool);
    let names: Vec<_> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["white", "grey", "black"]);

    let err = repo
        .create(
            &NewColor {
                name: "jet black".to_owned(),
                code: "bk".to_owned(),
            },
            user.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate { fields } if fields == ["code"]));

    let err = repo
        .create(
            &NewColor {
                name: "black".to_owned(),
                code: "bx".to_owned(),
            },
            user.id,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate { fields } if fields == ["name"]));
}

// =============================================================================
// Materials
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_material_filters() {
    let db = TestDb::acquire().await;
    let repo = MaterialRepository::new(&db.pool);

    let tape = repo
        .create(&MaterialFields {
            category: Some(Some(MaterialCategory::Packing)),
            subcategory: Some("Tape".to_owned()),
            uom: Some(Some(Uom::Roll)),
            ..material("5-CO07", "Non pasted tape")
        })
        .await
        .unwrap();
    let rexin = repo
        .create(&MaterialFields {
            category: Some(Some(MaterialCategory::Rexin)),
            active: Some(false),
            ..material("R-100", "Rexin black")
        })
        .await
        .unwrap();

    assert_eq!(tape.cf, Decimal::ONE);
    assert_eq!(tape.subcategory, "Tape");
    assert_eq!(rexin.subcategory, "");

    let codes = |items: Vec<catalog_api::models::Material>| {
        items.into_iter().map(|m| m.code).collect::<Vec<_>>()
    };

    // Substring, case-insensitive, any token
    let filter = MaterialFilter {
        codes: Some(vec!["co07".to_owned(), "zzz".to_owned()]),
        ..MaterialFilter::default()
    };
    assert_eq!(codes(repo.list(&filter).await.unwrap()), vec!["5-CO07"]);

    let filter = MaterialFilter {
        names: Some(vec!["pasted".to_owned(), "rexin".to_owned()]),
        ..MaterialFilter::default()
    };
    assert_eq!(
        codes(repo.list(&filter).await.unwrap()),
        vec!["5-CO07", "R-100"]
    );

    let filter = MaterialFilter {
        subcategories: Some(vec!["tape".to_owned()]),
        ..MaterialFilter::default()
    };
    assert_eq!(codes(repo.list(&filter).await.unwrap()), vec!["5-CO07"]);

    let filter = MaterialFilter {
        active: Some(false),
        categories: Some(vec!["rexin".to_owned()]),
        ..MaterialFilter::default()
    };
    assert_eq!(codes(repo.list(&filter).await.unwrap()), vec!["R-100"]);

    // Wildcards in a token match literally
    let filter = MaterialFilter {
        codes: Some(vec!["_".to_owned()]),
        ..MaterialFilter::default()
    };
    assert!(repo.list(&filter).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (CATALOG_DATABASE_URL)"]
async fn test_material_update_and_duplicate_code() {
    let db = TestDb::acquire().await;
    let repo = MaterialRepository::new(&db.pool);
    let tape = repo
        .create(&MaterialFields {
            price: Some(price("12.50")),
            ..material("5-co07", "Non pasted tape")
        })
        .await
        .unwrap();
    repo.create(&material("5-co08", "Pasted tape"))
        .await
        .unwrap();

    let updated = repo
        .update(
            tape.id,
            &MaterialFields {
                cf: Some(price("0.0250")),
                purchaseuom: Some(Some(Uom::Kilogram)),
                ..material("5-co07", "Non pasted tape 48mm")
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Non pasted tape 48mm");
    assert_eq!(updated.price, price("12.50"));
    assert_eq!(updated.cf, price("0.0250"));
    assert_eq!(updated.purchaseuom, Some(Uom::Kilogram));

    let err = repo
        .update(tape.id, &material("5-co08", "Clash"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Duplicate { fields } if fields == ["code"]));

    repo.delete(tape.id).await.unwrap();
    assert!(repo.get(tape.id).await.unwrap().is_none());
}
