use heck::ToLowerCamelCase;

/// The default storage accessor for a model: its name in lower camel case
/// (`User` becomes `user`, `BlogPost` becomes `blogPost`).
pub fn storage_accessor(model: &str) -> String {
    model.to_lower_camel_case()
}
