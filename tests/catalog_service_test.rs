mod common;

use catalog_api::api::error::AppError;
use catalog_api::entities::cast_members::CastMemberType;
use catalog_api::entities::prelude::*;
use catalog_api::services::catalog_service::{ListOptions, VideoInput};
use catalog_api::validation::{FieldValue, RequestInput};
use common::*;
use sea_orm::{EntityTrait, PaginatorTrait};

fn report(err: AppError) -> catalog_api::validation::ValidationReport {
    match err {
        AppError::Validation(report) => report,
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_category_round_trip_and_restore() {
    let t = setup_catalog().await;

    let created = t
        .catalog
        .create_category(
            RequestInput::new()
                .with("name", "Documentary")
                .with("description", "Non-fiction")
                .with("is_active", "0"),
        )
        .await
        .unwrap();
    assert_eq!(created.name, "Documentary");
    assert_eq!(created.description.as_deref(), Some("Non-fiction"));
    assert!(!created.is_active);
    assert_eq!(created.id.len(), 36);

    let fetched = t.catalog.get_category(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    t.catalog.delete_category(&created.id).await.unwrap();
    assert!(matches!(
        t.catalog.get_category(&created.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(t.catalog.list_categories(&ListOptions::default()).await.unwrap().is_empty());

    let with_trashed = ListOptions {
        with_trashed: true,
        ..Default::default()
    };
    let trashed = t.catalog.list_categories(&with_trashed).await.unwrap();
    assert_eq!(trashed.len(), 1);
    assert!(trashed[0].deleted_at.is_some());

    let restored = t.catalog.restore_category(&created.id).await.unwrap();
    assert_eq!(restored, created);

    // Restoring an active row is a 404.
    assert!(matches!(
        t.catalog.restore_category(&created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_category_update_keeps_omitted_fields() {
    let t = setup_catalog().await;
    let created = t
        .catalog
        .create_category(
            RequestInput::new()
                .with("name", "Drama")
                .with("description", "Serious stories"),
        )
        .await
        .unwrap();
    assert!(created.is_active);

    let updated = t
        .catalog
        .update_category(&created.id, RequestInput::new().with("name", "Dramas"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Dramas");
    assert_eq!(updated.description.as_deref(), Some("Serious stories"));

    let cleared = t
        .catalog
        .update_category(
            &created.id,
            RequestInput::new()
                .with("name", "Dramas")
                .with("description", FieldValue::Null),
        )
        .await
        .unwrap();
    assert_eq!(cleared.description, None);
}

#[tokio::test]
async fn test_category_validation() {
    let t = setup_catalog().await;

    let err = t
        .catalog
        .create_category(
            RequestInput::new()
                .with("name", "x".repeat(256))
                .with("is_active", "maybe"),
        )
        .await
        .unwrap_err();
    let report = report(err);
    assert!(report.has("name", "max.string"));
    assert!(report.has("is_active", "boolean"));

    let err = t.catalog.create_category(RequestInput::new()).await.unwrap_err();
    assert!(report_has(err, "name", "required"));
    assert_eq!(Categories::find().count(&t.db).await.unwrap(), 0);
}

fn report_has(err: AppError, field: &str, rule: &str) -> bool {
    report(err).has(field, rule)
}

#[tokio::test]
async fn test_cast_member_type_is_enumerated() {
    let t = setup_catalog().await;

    let err = t
        .catalog
        .create_cast_member(RequestInput::new().with("name", "Amy Adams").with("type", 3i64))
        .await
        .unwrap_err();
    assert!(report_has(err, "type", "in"));

    let member = t
        .catalog
        .create_cast_member(RequestInput::new().with("name", "Amy Adams").with("type", "2"))
        .await
        .unwrap();
    assert_eq!(member.member_type, CastMemberType::Actor.code());

    let updated = t
        .catalog
        .update_cast_member(
            &member.id,
            RequestInput::new().with("name", "Denis Villeneuve").with("type", 1i64),
        )
        .await
        .unwrap();
    assert_eq!(updated.member_type, CastMemberType::Director.code());

    t.catalog.delete_cast_member(&member.id).await.unwrap();
    let restored = t.catalog.restore_cast_member(&member.id).await.unwrap();
    assert_eq!(restored, updated);
}

#[tokio::test]
async fn test_genre_requires_categories() {
    let t = setup_catalog().await;

    let err = t
        .catalog
        .create_genre(
            RequestInput::new()
                .with("name", "Sci-Fi")
                .with("categories_id", Vec::<String>::new()),
        )
        .await
        .unwrap_err();
    assert!(report_has(err, "categories_id", "required"));

    let err = t
        .catalog
        .create_genre(
            RequestInput::new()
                .with("name", "Sci-Fi")
                .with("categories_id", "not-a-list"),
        )
        .await
        .unwrap_err();
    assert!(report_has(err, "categories_id", "array"));
    assert_eq!(Genres::find().count(&t.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_genre_rejects_trashed_category() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    t.catalog.delete_category(&category.id).await.unwrap();

    let err = t
        .catalog
        .create_genre(
            RequestInput::new()
                .with("name", "Sci-Fi")
                .with("categories_id", vec![category.id.clone()]),
        )
        .await
        .unwrap_err();
    let report = report(err);
    assert!(report.has("categories_id", "exists"));
    assert_eq!(
        report.violations("categories_id")[0].message,
        "The selected categories id is invalid."
    );
}

#[tokio::test]
async fn test_genre_update_replaces_categories() {
    let t = setup_catalog().await;
    let a = create_category(&t.catalog, "A").await;
    let b = create_category(&t.catalog, "B").await;
    let c = create_category(&t.catalog, "C").await;

    let genre = create_genre(&t.catalog, "Drama", &[&a.id, &b.id]).await;
    let mut expected = vec![a.id.clone(), b.id.clone()];
    expected.sort();
    assert_eq!(genre.categories_id, expected);

    let updated = t
        .catalog
        .update_genre(
            &genre.genre.id,
            RequestInput::new()
                .with("name", "Drama")
                .with("categories_id", vec![c.id.clone(), b.id.clone()]),
        )
        .await
        .unwrap();
    let mut expected = vec![b.id.clone(), c.id.clone()];
    expected.sort();
    assert_eq!(updated.categories_id, expected);
    assert_eq!(CategoryGenre::find().count(&t.db).await.unwrap(), 2);

    let listed = t.catalog.list_genres(&ListOptions::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].categories_id, expected);
}

#[tokio::test]
async fn test_video_round_trip() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let created = t
        .catalog
        .create_video(video_request(&category.id, &genre.genre.id))
        .await
        .unwrap();
    assert_eq!(created.video.title, "Arrival");
    assert_eq!(created.video.year_launched, 2016);
    assert!(created.video.opened);
    assert_eq!(created.video.rating, "14");
    assert_eq!(created.video.duration, 116);
    assert_eq!(created.categories_id, vec![category.id.clone()]);
    assert_eq!(created.genres_id, vec![genre.genre.id.clone()]);
    assert_eq!(created.thumb_file_url, None);

    let fetched = t.catalog.get_video(&created.video.id).await.unwrap();
    assert_eq!(fetched, created);

    t.catalog.delete_video(&created.video.id).await.unwrap();
    assert!(matches!(
        t.catalog.get_video(&created.video.id).await,
        Err(AppError::NotFound(_))
    ));
    let restored = t.catalog.restore_video(&created.video.id).await.unwrap();
    assert_eq!(restored, created);
}

#[tokio::test]
async fn test_video_field_validation() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let input = video_request(&category.id, &genre.genre.id)
        .with("rating", "0")
        .with("duration", "10m")
        .with("year_launched", "16")
        .with("opened", "yes");
    let report = report(t.catalog.create_video(input).await.unwrap_err());

    assert!(report.has("rating", "in"));
    assert!(report.has("duration", "integer"));
    assert!(report.has("year_launched", "date_format"));
    assert!(report.has("opened", "boolean"));
    // Stops at the first failing rule of a field.
    assert_eq!(report.violations("duration").len(), 1);
    assert_eq!(Videos::find().count(&t.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_video_duration_must_be_positive() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let input = video_request(&category.id, &genre.genre.id).with("duration", 0i64);
    let report = report(t.catalog.create_video(input).await.unwrap_err());
    assert!(report.has("duration", "min.numeric"));
}

#[tokio::test]
async fn test_video_duration_must_fit_column() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let input = video_request(&category.id, &genre.genre.id).with("duration", "3000000000");
    let report = report(t.catalog.create_video(input).await.unwrap_err());
    assert!(report.has("duration", "max.numeric"));
    assert_eq!(
        report.violations("duration")[0].message,
        format!("The duration may not be greater than {}.", i32::MAX)
    );
    assert_eq!(Videos::find().count(&t.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_video_genres_must_belong_to_categories() {
    let t = setup_catalog().await;
    let movies = create_category(&t.catalog, "Movies").await;
    let series = create_category(&t.catalog, "Series").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&series.id]).await;

    let input = video_request(&movies.id, &genre.genre.id);
    let report = report(t.catalog.create_video(input).await.unwrap_err());
    assert!(report.has("genres_id", "genres_has_categories"));
    assert!(!report.has("categories_id", "exists"));

    // Linking the genre to the submitted category makes it valid.
    t.catalog
        .update_genre(
            &genre.genre.id,
            RequestInput::new()
                .with("name", "Sci-Fi")
                .with("categories_id", vec![series.id.clone(), movies.id.clone()]),
        )
        .await
        .unwrap();
    let input = video_request(&movies.id, &genre.genre.id);
    assert!(t.catalog.create_video(input).await.is_ok());
}

#[tokio::test]
async fn test_video_missing_lists_are_required() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;

    let input = RequestInput::new()
        .with("title", "Arrival")
        .with("description", "Visitors")
        .with("year_launched", 2016i64)
        .with("rating", "L")
        .with("duration", 90i64)
        .with("categories_id", vec![category.id.clone()]);
    let report = report(t.catalog.create_video(input).await.unwrap_err());
    assert!(report.has("genres_id", "required"));
    assert_eq!(
        report.violations("genres_id")[0].message,
        "The genres id field is required."
    );
}

#[tokio::test]
async fn test_video_upload_rules() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let input = video_request(&category.id, &genre.genre.id)
        .with("thumb_file", mp4_upload())
        .with("video_file", "not a file");
    let report = report(t.catalog.create_video(input).await.unwrap_err());
    assert!(report.has("thumb_file", "mimetypes"));
    assert!(report.has("video_file", "file"));
    assert!(t.storage.keys().is_empty());
}

#[tokio::test]
async fn test_video_files_stored_under_video_id() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let input = video_request(&category.id, &genre.genre.id)
        .with("thumb_file", png_upload())
        .with("video_file", mp4_upload());
    let created = t.catalog.create_video(input).await.unwrap();

    let id = &created.video.id;
    let thumb = created.video.thumb_file.clone().unwrap();
    let video = created.video.video_file.clone().unwrap();
    assert!(thumb.ends_with(".png"));
    assert!(video.ends_with(".mp4"));
    assert_ne!(thumb, "cover.png");

    assert!(t.storage.contains(&format!("{}/{}", id, thumb)));
    assert!(t.storage.contains(&format!("{}/{}", id, video)));
    assert_eq!(
        created.thumb_file_url.as_deref(),
        Some(format!("http://storage.test/{}/{}", id, thumb).as_str())
    );
}

#[tokio::test]
async fn test_update_replaces_only_resupplied_file() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    let created = t
        .catalog
        .create_video(
            video_request(&category.id, &genre.genre.id)
                .with("thumb_file", png_upload())
                .with("video_file", mp4_upload()),
        )
        .await
        .unwrap();
    let id = created.video.id.clone();
    let old_thumb = created.video.thumb_file.clone().unwrap();
    let old_video = created.video.video_file.clone().unwrap();

    let updated = t
        .catalog
        .update_video(
            &id,
            video_request(&category.id, &genre.genre.id).with("video_file", mp4_upload()),
        )
        .await
        .unwrap();

    let new_video = updated.video.video_file.clone().unwrap();
    assert_ne!(new_video, old_video);
    assert_eq!(updated.video.thumb_file.as_deref(), Some(old_thumb.as_str()));

    assert!(!t.storage.contains(&format!("{}/{}", id, old_video)));
    assert!(t.storage.contains(&format!("{}/{}", id, new_video)));
    assert!(t.storage.contains(&format!("{}/{}", id, old_thumb)));
    assert_eq!(t.storage.keys().len(), 2);
}

#[tokio::test]
async fn test_association_failure_rolls_back_row_and_files() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;

    // Bypass request validation so the foreign key is what rejects the id.
    let mut data = VideoInput::from_request(
        video_request(&category.id, &genre.genre.id).with("thumb_file", png_upload()),
    )
    .unwrap();
    data.categories_id.push("00000000-0000-0000-0000-000000000000".to_string());

    let err = t.catalog.store_video(None, data).await.unwrap_err();
    assert!(matches!(err, AppError::Constraint(_)), "got {:?}", err);

    assert_eq!(Videos::find().count(&t.db).await.unwrap(), 0);
    assert_eq!(CategoryVideo::find().count(&t.db).await.unwrap(), 0);
    assert!(t.storage.keys().is_empty());
}

#[tokio::test]
async fn test_failing_post_commit_action_removes_new_files() {
    let t = setup_catalog().await;
    let category = create_category(&t.catalog, "Movies").await;
    let genre = create_genre(&t.catalog, "Sci-Fi", &[&category.id]).await;
    t.storage.put("unrelated/keep.bin", b"keep");

    let created = t
        .catalog
        .create_video(
            video_request(&category.id, &genre.genre.id)
                .with("thumb_file", png_upload())
                .with("video_file", mp4_upload()),
        )
        .await
        .unwrap();
    let id = created.video.id.clone();
    let old_thumb = format!("{}/{}", id, created.video.thumb_file.clone().unwrap());
    let old_video = format!("{}/{}", id, created.video.video_file.clone().unwrap());

    // Deleting the replaced video file after commit fails.
    t.storage.fail_deletes_of(&old_video);

    let err = t
        .catalog
        .update_video(
            &id,
            video_request(&category.id, &genre.genre.id)
                .with("thumb_file", png_upload())
                .with("video_file", mp4_upload()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FileCommit(_)), "got {:?}", err);

    // The new thumb and video are gone. The old thumb was removed by the hook
    // that ran before the failing one.
    let mut expected = vec![old_video.clone(), "unrelated/keep.bin".to_string()];
    expected.sort();
    assert_eq!(t.storage.keys(), expected);
    assert!(!t.storage.contains(&old_thumb));
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let t = setup_catalog().await;
    let missing = "11111111-1111-1111-1111-111111111111";

    assert!(matches!(
        t.catalog.get_video(missing).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        t.catalog
            .update_category(missing, RequestInput::new().with("name", "x"))
            .await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        t.catalog.delete_genre(missing).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_paging() {
    let t = setup_catalog().await;
    for name in ["A", "B", "C"] {
        create_category(&t.catalog, name).await;
    }

    let page = t
        .catalog
        .list_categories(&ListOptions {
            with_trashed: false,
            limit: Some(2),
            offset: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
}
