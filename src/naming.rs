//! Environment variable naming.
//!
//! A field maps to one *segment*: its explicit tag when given, otherwise its
//! identifier in upper-snake form. Segments from the root down to the field are
//! joined with `_` behind the optional prefix.
//!
//! | Prefix  | Segments            | Name            |
//! |---------|---------------------|-----------------|
//! | `""`    | `[]`                | `""`            |
//! | `""`    | `["INNER", "STR"]`  | `INNER_STR`     |
//! | `"APP"` | `[]`                | `APP`           |
//! | `"APP"` | `["INNER", "STR"]`  | `APP_INNER_STR` |

/// Tag value that excludes a field from environment overrides.
pub const SKIP_TAG: &str = "-";

/// Separator between the prefix and each segment.
pub const SEPARATOR: char = '_';

/// Join a prefix and segments into a single environment variable name.
pub fn env_name<S: AsRef<str>>(prefix: &str, segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_");

    match (prefix.is_empty(), segments.is_empty()) {
        (true, true) => String::new(),
        (true, false) => joined,
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}{SEPARATOR}{joined}"),
    }
}

/// Segment for a field, or `None` when the field is tagged with [`SKIP_TAG`].
pub fn segment(ident: &str, tag: Option<&str>) -> Option<String> {
    match tag {
        Some(SKIP_TAG) => None,
        Some(tag) if !tag.is_empty() => Some(tag.to_string()),
        _ => Some(upper_snake(ident)),
    }
}

/// Convert an identifier to upper-snake form.
///
/// Splits only where an ASCII lowercase letter is directly followed by an ASCII
/// uppercase one. Digits never start a new word, and runs of capitals stay
/// together: `ApiKey2FA` becomes `API_KEY2FA`.
pub fn upper_snake(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    let mut prev: Option<char> = None;
    for c in ident.chars() {
        if let Some(p) = prev
            && p.is_ascii_lowercase()
            && c.is_ascii_uppercase()
        {
            out.push(SEPARATOR);
        }
        out.push(c.to_ascii_uppercase());
        prev = Some(c);
    }
    out
}
