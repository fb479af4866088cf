use tests::*;

use pretty_assertions::assert_eq;
use recordkit::{attrs, Model, SaveOptions, Value};
use serde_json::json;

#[tokio::test]
async fn accessors_follow_the_attribute_map() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(
        &db,
        attrs! { "email" => "rob@redwoodjs.com", "name" => "Rob" },
    )
    .unwrap();

    assert_eq!(user.accessors().collect::<Vec<_>>(), ["email", "name"]);
    assert_eq!(user.get("email"), Some(&Value::from("rob@redwoodjs.com")));

    user.set("name", "Robert");
    assert_eq!(user.attributes()["name"], Value::from("Robert"));

    user.set("nickname", "rc");
    assert!(user.has_accessor("nickname"));
    assert!(user.errors().contains_key("nickname"));
}

#[tokio::test]
async fn relationship_names_are_not_attribute_accessors() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let user = User::build(
        &db,
        attrs! { "email" => "rob@redwoodjs.com", "posts" => attrs! {} },
    )
    .unwrap();

    assert!(user.has_accessor("email"));
    assert!(!user.has_accessor("posts"));
    assert!(!user.errors().contains_key("posts"));
}

#[tokio::test]
async fn saving_installs_accessors_for_storage_fields() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => "rob@redwoodjs.com" }).unwrap();
    assert!(!user.has_accessor("role"));

    assert!(user.save(&db, SaveOptions::default()).await.unwrap());

    assert_eq!(
        user.accessors().collect::<Vec<_>>(),
        ["email", "id", "name", "role"]
    );
    assert_eq!(user.get("role"), Some(&Value::from("member")));
    assert!(user.errors().contains_key("role"));
}

#[tokio::test]
async fn typed_reads() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { rob, .. } = seed(&db).await;

    assert_eq!(rob.get_as::<String>("email").unwrap(), "rob@redwoodjs.com");
    assert_eq!(rob.get_as::<i64>("id").unwrap(), 1);
    assert_eq!(rob.get_as::<Option<String>>("name").unwrap().as_deref(), Some("Rob Cameron"));

    let err = rob.get_as::<String>("nickname").unwrap_err();
    assert!(err.is_missing_attribute());

    let err = rob.get_as::<i64>("email").unwrap_err();
    assert!(err.is_type_conversion());
}

#[tokio::test]
async fn new_records_have_no_relationship_accessors() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let user = User::new(&db, attrs! { "id" => 1 }).unwrap();
    let err = user.has_many::<Post>("posts").unwrap_err();
    assert!(err.is_unknown_relation());

    let user = User::build(&db, attrs! { "id" => 1 }).unwrap();
    assert!(user.has_many::<Post>("posts").is_ok());
}

#[tokio::test]
async fn serializes_attributes() {
    let db = setup(models!(User, Post, Category, Profile)).await;
    let Scenario { tom, .. } = seed(&db).await;

    assert_eq!(
        serde_json::to_value(&tom).unwrap(),
        json!({
            "id": 2,
            "email": "tom@redwoodjs.com",
            "name": "Tom Preston-Werner",
            "role": "member",
        })
    );
}

#[tokio::test]
async fn empty_record_has_only_base_errors() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let user = User::build(&db, attrs! {}).unwrap();

    assert_eq!(serde_json::to_value(user.errors()).unwrap(), json!({ "base": [] }));
}
