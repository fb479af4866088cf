//! Entity types over `fixtures/datamodel.json`.

use recordkit::{Model, RequiredModels};

#[derive(Debug)]
pub struct User;

impl Model for User {
    const NAME: &'static str = "User";

    fn required_models(models: &mut RequiredModels) {
        models.require::<Post>().require::<Profile>();
    }
}

#[derive(Debug)]
pub struct Post;

impl Model for Post {
    const NAME: &'static str = "Post";

    fn required_models(models: &mut RequiredModels) {
        models.require::<User>().require::<Category>();
    }
}

#[derive(Debug)]
pub struct Category;

impl Model for Category {
    const NAME: &'static str = "Category";

    fn required_models(models: &mut RequiredModels) {
        models.require::<Post>();
    }
}

#[derive(Debug)]
pub struct Profile;

impl Model for Profile {
    const NAME: &'static str = "Profile";

    fn required_models(models: &mut RequiredModels) {
        models.require::<User>();
    }
}
