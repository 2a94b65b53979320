use std::borrow::Cow;

/// Flatten a namespace-qualified name into the single name written to the
/// output: `namespace:local`, or just `local` without a namespace.
///
/// Start and end tags go through the same flattening, so output tags
/// stay balanced.
pub(crate) fn flatten<'a>(namespace: &str, local: &'a str) -> Cow<'a, str> {
    if namespace.is_empty() {
        Cow::Borrowed(local)
    } else {
        Cow::Owned(format!("{}:{}", namespace, local))
    }
}
