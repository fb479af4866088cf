/// Builds an [`Attributes`](crate::Attributes) map from `key => value` pairs.
///
/// ```
/// # use recordkit_core::{attrs, Value};
/// let attrs = attrs! { "email" => "rob@redwoodjs.com", "name" => Value::Null };
/// assert_eq!(attrs.len(), 2);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut attrs = $crate::Attributes::new();
        $(
            attrs.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        attrs
    }};
}
