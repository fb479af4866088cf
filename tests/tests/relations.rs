use tests::*;

use pretty_assertions::assert_eq;
use recordkit::{attrs, Model, Value};

#[tokio::test]
async fn has_many_is_scoped_by_the_parent() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, tom_post, .. } = seed(&db).await;

    let posts = rob.has_many::<Post>("posts").unwrap();
    assert_eq!(posts.constraint(), &attrs! { "userId" => 1 });

    let all = posts.all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("title"), Some(&Value::from("Rob's first post")));

    // Caller keys that collide with the constraint are overridden
    let scoped = posts
        .filter(&db, attrs! { "userId" => id(&tom_post) })
        .await
        .unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].get("userId"), Some(&id(&rob)));

    let err = posts.find(&db, id(&tom_post)).await.unwrap_err();
    assert!(err.is_record_not_found());
}

#[tokio::test]
async fn has_many_create_links_to_the_parent() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { tom, .. } = seed(&db).await;

    let posts = tom.has_many::<Post>("posts").unwrap();

    let post = posts
        .create(&db, attrs! { "title" => "Second post", "userId" => 99 })
        .await
        .unwrap();
    assert!(post.is_persisted());
    assert_eq!(post.get("userId"), Some(&id(&tom)));

    assert_eq!(posts.all(&db).await.unwrap().len(), 2);

    let found = posts
        .find_by(&db, attrs! { "title" => "Second post" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.primary_key(), post.primary_key());

    let draft = posts.build(&db, attrs! { "title" => "Draft" }).unwrap();
    assert!(!draft.is_persisted());
    assert_eq!(draft.get("userId"), Some(&id(&tom)));
}

#[tokio::test]
async fn many_to_many_in_both_directions() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario {
        rob, rob_post, wood, ..
    } = seed(&db).await;

    let posts = wood.has_many::<Post>("posts").unwrap();
    assert_eq!(
        posts.constraint(),
        &attrs! { "categories" => attrs! { "some" => attrs! { "id" => 1 } } }
    );

    let all = posts.all(&db).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].primary_key(), rob_post.primary_key());

    posts
        .create(&db, attrs! { "title" => "Whittling", "userId" => id(&rob) })
        .await
        .unwrap();
    assert_eq!(posts.all(&db).await.unwrap().len(), 2);

    let categories = rob_post
        .has_many::<Category>("categories")
        .unwrap()
        .all(&db)
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].get("name"), Some(&Value::from("wood")));
}

#[tokio::test]
async fn belongs_to_and_has_one() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, rob_post, .. } = seed(&db).await;

    let author = rob_post.belongs_to::<User>(&db, "user").await.unwrap().unwrap();
    assert_eq!(author.primary_key(), rob.primary_key());

    let orphan = Post::build(&db, attrs! { "userId" => Value::Null }).unwrap();
    assert!(orphan.belongs_to::<User>(&db, "user").await.unwrap().is_none());

    assert!(rob.has_one::<Profile>(&db, "profile").await.unwrap().is_none());

    Profile::create(&db, attrs! { "userId" => id(&rob), "bio" => "Builder" })
        .await
        .unwrap();

    let profile = rob.has_one::<Profile>(&db, "profile").await.unwrap().unwrap();
    assert_eq!(profile.get("bio"), Some(&Value::from("Builder")));
}

#[tokio::test]
async fn accessor_misuse() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, .. } = seed(&db).await;

    let err = rob.has_many::<Post>("comments").unwrap_err();
    assert!(err.is_unknown_relation());
    assert_eq!(err.to_string(), "User has no relation named comments");

    // Target type does not match the relationship
    let err = rob.has_many::<Category>("posts").unwrap_err();
    assert!(err.is_unknown_relation());

    // Wrong relationship kind
    let err = rob.has_many::<Profile>("profile").unwrap_err();
    assert!(err.is_unknown_relation());
}
