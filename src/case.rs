//! Project name case variants.
//!
//! Every function splits its input on `-`, `_` and spaces, dropping empty
//! segments, and then rebuilds the segments in its own style. Case folding is
//! ASCII-only so the output does not depend on the locale.

fn segments(s: &str) -> impl Iterator<Item = &str> {
    s.split(['-', '_', ' ']).filter(|segment| !segment.is_empty())
}

fn join_lowercase(s: &str, separator: &str) -> String {
    segments(s)
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(separator)
}

/// `"My Cool App"` becomes `"myCoolApp"`.
///
/// An input without any segment (empty, or only delimiters) yields an empty
/// string, like [`to_snake_case`] and [`to_kebab_case`].
#[must_use]
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, segment) in segments(s).enumerate() {
        if i == 0 {
            result.push_str(&segment.to_ascii_lowercase());
            continue;
        }

        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(&chars.as_str().to_ascii_lowercase());
        }
    }

    result
}

/// `"My Cool App"` becomes `"my_cool_app"`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    join_lowercase(s, "_")
}

/// `"My Cool App"` becomes `"my-cool-app"`.
#[must_use]
pub fn to_kebab_case(s: &str) -> String {
    join_lowercase(s, "-")
}
