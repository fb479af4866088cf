use tests::*;

use pretty_assertions::assert_eq;
use recordkit::{attrs, driver::Operation, Model, SaveOptions, Value};

#[tokio::test]
async fn save_without_primary_key_creates() {
    let (db, ops_log) = setup_logged(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => "rob@redwoodjs.com" }).unwrap();
    assert!(!user.is_persisted());

    assert!(user.save(&db, SaveOptions::default()).await.unwrap());

    assert!(user.is_persisted());
    assert_eq!(user.primary_key(), Some(&Value::from(1)));

    let ops_log = ops_log.lock().unwrap();
    assert_eq!(ops_log.len(), 1);
    assert!(matches!(ops_log[0].operation, Operation::Create(_)));
}

#[tokio::test]
async fn save_with_primary_key_updates() {
    let (db, ops_log) = setup_logged(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, .. } = seed(&db).await;
    ops_log.lock().unwrap().clear();

    let mut copy = User::new(
        &db,
        attrs! { "id" => id(&rob), "email" => "rob@redwoodjs.com", "name" => "Robert" },
    )
    .unwrap();

    assert!(copy.save(&db, SaveOptions::default()).await.unwrap());

    {
        let ops_log = ops_log.lock().unwrap();
        assert_eq!(ops_log.len(), 1);
        let Operation::Update(update) = &ops_log[0].operation else {
            panic!("expected an update; op={:?}", ops_log[0].operation);
        };
        assert_eq!(update.model, "user");
        assert_eq!(update.key, attrs! { "id" => 1 });
        assert!(!update.data.contains_key("id"));
    }

    let found = User::find(&db, id(&rob)).await.unwrap();
    assert_eq!(found.get("name"), Some(&Value::from("Robert")));
}

#[tokio::test]
async fn update_merges_then_saves() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { mut rob, .. } = seed(&db).await;

    assert!(rob
        .update(&db, attrs! { "name" => "Robert" }, SaveOptions::default())
        .await
        .unwrap());

    assert_eq!(rob.get("name"), Some(&Value::from("Robert")));
    assert_eq!(rob.get("email"), Some(&Value::from("rob@redwoodjs.com")));

    let found = User::find(&db, id(&rob)).await.unwrap();
    assert_eq!(found.attributes(), rob.attributes());
}

#[tokio::test]
async fn null_required_attribute() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => Value::Null }).unwrap();

    assert!(!user.save(&db, SaveOptions::default()).await.unwrap());
    assert_eq!(user.errors().on("email"), ["must not be null"]);
    assert!(user.errors().base().is_empty());
    assert!(!user.is_persisted());
    assert_eq!(user.primary_key(), None);
}

#[tokio::test]
async fn null_required_attribute_throws() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => Value::Null }).unwrap();
    let before = user.attributes().clone();

    let err = user.save(&db, SaveOptions::throw()).await.unwrap_err();

    assert!(err.is_null_attribute());
    assert_eq!(err.to_string(), "email must not be null");
    assert_eq!(user.attributes(), &before);
}

#[tokio::test]
async fn missing_required_attribute() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "name" => "Rob" }).unwrap();

    assert!(!user.save(&db, SaveOptions::default()).await.unwrap());
    assert_eq!(user.errors().base(), ["email is missing"]);

    let err = user.save(&db, SaveOptions::throw()).await.unwrap_err();
    assert!(err.is_missing_attribute());
    assert_eq!(err.to_string(), "email is missing");
    assert_eq!(user.attributes(), &attrs! { "name" => "Rob" });
}

#[tokio::test]
async fn update_target_not_found() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::new(
        &db,
        attrs! { "id" => 999, "email" => "ghost@redwoodjs.com" },
    )
    .unwrap();

    assert!(!user.save(&db, SaveOptions::default()).await.unwrap());
    assert_eq!(user.errors().base(), ["User record to update not found"]);

    let err = user.save(&db, SaveOptions::throw()).await.unwrap_err();
    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "User record to update not found");
}

#[tokio::test]
async fn save_clears_errors_from_previous_attempts() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => Value::Null }).unwrap();
    assert!(!user.save(&db, SaveOptions::default()).await.unwrap());
    assert!(user.has_error());

    user.set("email", "rob@redwoodjs.com");
    assert!(user.save(&db, SaveOptions::default()).await.unwrap());
    assert!(!user.has_error());
}

#[tokio::test]
async fn other_storage_failures_are_errors_in_both_modes() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    let mut duplicate = User::build(&db, attrs! { "email" => "rob@redwoodjs.com" }).unwrap();

    let err = duplicate.save(&db, SaveOptions::default()).await.unwrap_err();
    assert!(err.is_driver());
    assert_eq!(
        err.to_string(),
        "Unique constraint failed on the fields: (`email`)"
    );
    assert!(!duplicate.has_error());

    let err = User::create_with(
        &db,
        attrs! { "email" => "rob@redwoodjs.com" },
        SaveOptions::throw(),
    )
    .await
    .unwrap_err();
    assert!(err.is_driver());
}

#[tokio::test]
async fn create_returns_unsaved_record_in_collect_mode() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let user = User::create(&db, attrs! { "email" => Value::Null }).await.unwrap();

    assert!(!user.is_persisted());
    assert_eq!(user.errors().on("email"), ["must not be null"]);
}

#[tokio::test]
async fn destroy() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { mut tom_post, .. } = seed(&db).await;
    let post_id = id(&tom_post);

    let mut stale = Post::find(&db, post_id.clone()).await.unwrap();

    assert!(tom_post.destroy(&db, SaveOptions::default()).await.unwrap());
    assert!(tom_post.is_destroyed());
    assert_eq!(tom_post.get("title"), Some(&Value::from("Tom's first post")));

    let err = Post::find(&db, post_id).await.unwrap_err();
    assert!(err.is_record_not_found());

    // A destroyed record is inert
    let err = tom_post.save(&db, SaveOptions::default()).await.unwrap_err();
    assert!(err.is_record_not_found());

    // The row is gone underneath a second copy
    assert!(!stale.destroy(&db, SaveOptions::default()).await.unwrap());
    assert_eq!(stale.errors().base(), ["Post record not found"]);

    let err = stale.destroy(&db, SaveOptions::throw()).await.unwrap_err();
    assert!(err.is_record_not_found());
}
