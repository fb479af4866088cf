use tests::*;

use pretty_assertions::assert_eq;
use recordkit::{
    attrs,
    validation::{Length, Numericality},
    Model, RequiredModels, Rule, SaveOptions, ValidateOptions, Validations, Value,
};

/// The `User` entity type with validation rules declared.
struct Member;

impl Model for Member {
    const NAME: &'static str = "User";

    fn validations() -> Validations {
        Validations::new()
            .validates("email", [Rule::presence(), Rule::email()])
            .validates(
                "name",
                [Rule::length(Length {
                    min: Some(2),
                    max: Some(20),
                    ..Length::default()
                })],
            )
            .validates(
                "role",
                [Rule::inclusion(["member", "admin"]).message("is not a known role")],
            )
    }

    fn required_models(models: &mut RequiredModels) {
        models.require::<Post>().require::<Profile>();
    }
}

struct Scored;

impl Model for Scored {
    const NAME: &'static str = "Post";

    fn validations() -> Validations {
        Validations::new()
            .validates(
                "userId",
                [Rule::numericality(Numericality {
                    integer: true,
                    positive: true,
                    ..Numericality::default()
                })],
            )
            .validates(
                "body",
                [Rule::custom(|body, attributes| {
                    body.as_str() != attributes.get("title").and_then(Value::as_str)
                })
                .message("must differ from the title")],
            )
    }

    fn required_models(models: &mut RequiredModels) {
        models.require::<User>().require::<Category>();
    }
}

#[tokio::test]
async fn no_rules_always_validate() {
    let db = setup(models!(User, Post, Category, Profile)).await;

    let mut user = User::build(&db, attrs! { "email" => Value::Null }).unwrap();

    assert!(user.validate(ValidateOptions::default()).unwrap());
    assert!(user.errors().on("email").is_empty());
    assert!(!user.has_error());
}

#[tokio::test]
async fn presence_failure_then_revalidation() {
    let db = setup(models!(Member, Post, Category, Profile)).await;

    let mut user = Member::build(&db, attrs! { "email" => Value::Null }).unwrap();

    assert!(!user.validate(ValidateOptions::default()).unwrap());
    assert_eq!(user.errors().on("email"), ["email must be present"]);

    user.set("email", "rob@redwoodjs.com");
    assert!(user.validate(ValidateOptions::default()).unwrap());
    assert!(user.errors().on("email").is_empty());
}

#[tokio::test]
async fn is_valid_discards_manual_errors() {
    let db = setup(models!(Member, Post, Category, Profile)).await;

    let mut user = Member::build(&db, attrs! { "email" => "rob@redwoodjs.com" }).unwrap();
    user.add_error("base", "something is off");
    assert!(user.has_error());

    assert!(user.is_valid());
    assert!(user.errors().base().is_empty());
}

#[tokio::test]
async fn collects_every_failing_attribute() {
    let db = setup(models!(Member, Post, Category, Profile)).await;

    let mut user = Member::build(
        &db,
        attrs! { "email" => "rob", "name" => "R", "role" => "owner" },
    )
    .unwrap();

    assert!(!user.validate(ValidateOptions::default()).unwrap());
    assert_eq!(
        user.errors().on("email"),
        ["email must be formatted like an email address"]
    );
    assert_eq!(user.errors().on("name"), ["name must be at least 2 characters"]);
    assert_eq!(user.errors().on("role"), ["is not a known role"]);
    assert_eq!(user.errors().full_messages().len(), 3);
}

#[tokio::test]
async fn throw_mode_raises_the_first_failure() {
    let db = setup(models!(Member, Post, Category, Profile)).await;

    let mut user = Member::build(&db, attrs! { "email" => "", "name" => "R" }).unwrap();

    let err = user.validate(ValidateOptions::throw()).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "email must be present");

    let failure = err.validation_failure().unwrap();
    assert_eq!(failure.attribute(), "email");
    assert!(user.errors().on("name").is_empty());
}

#[tokio::test]
async fn invalid_records_are_not_written() {
    let (db, ops_log) = setup_logged(models!(Member, Post, Category, Profile)).await;

    let mut user = Member::build(&db, attrs! { "email" => "not an email" }).unwrap();
    assert!(!user.save(&db, SaveOptions::default()).await.unwrap());
    assert!(!user.is_persisted());

    let err = Member::create_with(&db, attrs! { "email" => Value::Null }, SaveOptions::throw())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert!(ops_log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn numericality_and_custom_rules() {
    let db = setup(models!(User, Scored, Category, Profile)).await;

    let mut post = Scored::build(
        &db,
        attrs! { "userId" => -1.5, "title" => "Hello", "body" => "Hello" },
    )
    .unwrap();

    assert!(!post.is_valid());
    assert_eq!(post.errors().on("userId"), ["userId must be an integer"]);
    assert_eq!(post.errors().on("body"), ["must differ from the title"]);

    post.set("userId", -1);
    assert!(!post.is_valid());
    assert_eq!(post.errors().on("userId"), ["userId must be positive"]);

    post.set("userId", 1).set("body", "World");
    assert!(post.is_valid());
}
