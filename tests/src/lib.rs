mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

pub mod models;
pub use models::{Category, Post, Profile, User};

use recordkit::{attrs, db::Builder, Db, Model, Record, SchemaSource, Value};
use recordkit_driver_memory::Memory;

use std::sync::{Arc, Mutex};

#[macro_export]
macro_rules! models {
    (
        $( $model:ident ),*
    ) => {{
        let mut builder = recordkit::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}

/// Path of the datamodel every test builds against.
pub const DATAMODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/datamodel.json");

pub fn schema() -> SchemaSource {
    SchemaSource::file(DATAMODEL)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a `Db` over a fresh in-memory driver.
pub async fn setup(mut builder: Builder) -> Db {
    init_logging();

    builder.schema(schema()).build(Memory::new()).await.unwrap()
}

/// Like [`setup`], also returning the log of every driver operation.
pub async fn setup_logged(mut builder: Builder) -> (Db, Arc<Mutex<Vec<DriverOp>>>) {
    init_logging();

    let driver = LoggingDriver::new(Memory::new());
    let ops_log = driver.ops_log_handle();
    let db = builder.schema(schema()).build(driver).await.unwrap();

    (db, ops_log)
}

/// The standard fixture: two users, a post each, and a category holding
/// rob's post.
#[derive(Debug)]
pub struct Scenario {
    pub rob: Record<User>,
    pub tom: Record<User>,
    pub rob_post: Record<Post>,
    pub tom_post: Record<Post>,
    pub wood: Record<Category>,
}

pub async fn seed(db: &Db) -> Scenario {
    let rob = User::create(
        db,
        attrs! { "email" => "rob@redwoodjs.com", "name" => "Rob Cameron" },
    )
    .await
    .unwrap();

    let tom = User::create(
        db,
        attrs! { "email" => "tom@redwoodjs.com", "name" => "Tom Preston-Werner" },
    )
    .await
    .unwrap();

    let rob_post = Post::create(
        db,
        attrs! { "userId" => id(&rob), "title" => "Rob's first post", "body" => "Hello" },
    )
    .await
    .unwrap();

    let tom_post = Post::create(
        db,
        attrs! { "userId" => id(&tom), "title" => "Tom's first post", "body" => "Hi" },
    )
    .await
    .unwrap();

    let wood = Category::create(
        db,
        attrs! {
            "name" => "wood",
            "posts" => attrs! { "connect" => vec![attrs! { "id" => id(&rob_post) }] },
        },
    )
    .await
    .unwrap();

    Scenario {
        rob,
        tom,
        rob_post,
        tom_post,
        wood,
    }
}

/// Primary key of a persisted record.
pub fn id<M: Model>(record: &Record<M>) -> Value {
    record.primary_key().cloned().unwrap()
}
