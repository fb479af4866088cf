use tests::*;

use pretty_assertions::assert_eq;
use recordkit::{attrs, Direction, FindOptions, Model, QueryOptions, Value};

fn names<M: Model>(records: &[recordkit::Record<M>]) -> Vec<&Value> {
    records
        .iter()
        .map(|record| record.get("name").unwrap())
        .collect()
}

#[tokio::test]
async fn find_by_primary_key() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, .. } = seed(&db).await;

    let user = User::find(&db, id(&rob)).await.unwrap();

    assert!(user.is_persisted());
    assert_eq!(user.attributes(), rob.attributes());
}

#[tokio::test]
async fn find_missing_raises_not_found() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    let err = User::find(&db, 999).await.unwrap_err();

    assert!(err.is_record_not_found());
    assert_eq!(err.to_string(), "User record not found");
}

#[tokio::test]
async fn find_with_additional_filter() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, .. } = seed(&db).await;

    let user = User::find_with(
        &db,
        id(&rob),
        FindOptions::filter(attrs! { "email" => "rob@redwoodjs.com" }),
    )
    .await
    .unwrap();
    assert_eq!(user.primary_key(), rob.primary_key());

    let err = User::find_with(
        &db,
        id(&rob),
        FindOptions::filter(attrs! { "email" => "tom@redwoodjs.com" }),
    )
    .await
    .unwrap_err();
    assert!(err.is_record_not_found());

    // The primary key wins over a colliding filter entry
    let user = User::find_with(&db, id(&rob), FindOptions::filter(attrs! { "id" => 2 }))
        .await
        .unwrap();
    assert_eq!(user.primary_key(), rob.primary_key());
}

#[tokio::test]
async fn find_by_returns_none_when_absent() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    let tom = User::find_by(&db, attrs! { "email" => "tom@redwoodjs.com" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tom.get("name"), Some(&Value::from("Tom Preston-Werner")));

    let nobody = User::find_by(&db, attrs! { "email" => "nobody@redwoodjs.com" })
        .await
        .unwrap();
    assert!(nobody.is_none());

    let first = User::first(&db, attrs! {}).await.unwrap().unwrap();
    assert_eq!(first.get("email"), Some(&Value::from("rob@redwoodjs.com")));
}

#[tokio::test]
async fn filter_and_all() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    assert_eq!(User::all(&db).await.unwrap().len(), 2);

    let members = User::filter(&db, attrs! { "role" => "member" }).await.unwrap();
    assert_eq!(members.len(), 2);

    let admins = User::filter(&db, attrs! { "role" => "admin" }).await.unwrap();
    assert!(admins.is_empty());

    let toms = User::filter(
        &db,
        attrs! { "name" => attrs! { "startsWith" => "Tom" } },
    )
    .await
    .unwrap();
    assert_eq!(
        names(&toms),
        [&Value::from("Tom Preston-Werner")]
    );

    let either = User::filter(
        &db,
        attrs! {
            "OR" => vec![
                attrs! { "email" => "rob@redwoodjs.com" },
                attrs! { "email" => "tom@redwoodjs.com" },
            ],
        },
    )
    .await
    .unwrap();
    assert_eq!(either.len(), 2);
}

#[tokio::test]
async fn ordering_and_paging() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    let users = User::filter_with(
        &db,
        attrs! {},
        QueryOptions::default().order_by("name", Direction::Desc),
    )
    .await
    .unwrap();
    assert_eq!(
        names(&users),
        [
            &Value::from("Tom Preston-Werner"),
            &Value::from("Rob Cameron")
        ]
    );

    let users = User::filter_with(
        &db,
        attrs! {},
        QueryOptions::default()
            .order_by("name", Direction::Asc)
            .skip(1)
            .take(1),
    )
    .await
    .unwrap();
    assert_eq!(names(&users), [&Value::from("Tom Preston-Werner")]);
}

#[tokio::test]
async fn filter_through_relations() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    seed(&db).await;

    let authors = User::filter(
        &db,
        attrs! { "posts" => attrs! { "some" => attrs! { "title" => "Tom's first post" } } },
    )
    .await
    .unwrap();
    assert_eq!(names(&authors), [&Value::from("Tom Preston-Werner")]);

    let posts = Post::filter(
        &db,
        attrs! { "categories" => attrs! { "some" => attrs! { "name" => "wood" } } },
    )
    .await
    .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].get("title"), Some(&Value::from("Rob's first post")));
}

#[tokio::test]
async fn unknown_filter_field_is_an_error() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    // Nothing stored yet
    let err = User::filter(&db, attrs! { "nickname" => "rc" }).await.unwrap_err();
    assert!(err.is_driver());
    assert_eq!(err.to_string(), "Unknown argument `nickname` for model `User`.");

    let err = User::find_by(&db, attrs! { "nickname" => "rc" }).await.unwrap_err();
    assert!(err.is_driver());

    seed(&db).await;

    let err = User::filter(&db, attrs! { "nickname" => "rc" }).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown argument `nickname` for model `User`.");

    // An earlier entry that already rules out every row
    let err = User::filter(
        &db,
        attrs! { "email" => "nobody@redwoodjs.com", "nickname" => "rc" },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown argument `nickname` for model `User`.");

    let err = User::find_by(
        &db,
        attrs! { "NOT" => attrs! { "posts" => attrs! { "some" => attrs! { "subtitle" => "x" } } } },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Unknown argument `subtitle` for model `Post`.");
}
