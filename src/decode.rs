//! Primitive decoders.
//!
//! Each decoder looks a variable up and parses it. A malformed value is
//! reported exactly like a missing one: `None`. There is no unsigned decoder;
//! unsigned fields go through [`signed`] and drop negative results.

use std::time::Duration;

use crate::env::EnvSource;

/// The raw value, unmodified. Set-but-empty is `Some("")`.
pub fn text(env: &impl EnvSource, name: &str) -> Option<String> {
    env.var(name)
}

/// A boolean, after trimming whitespace.
pub fn boolean(env: &impl EnvSource, name: &str) -> Option<bool> {
    parse_bool(env.var(name)?.trim())
}

/// A base-10 `i64`, after trimming whitespace.
pub fn signed(env: &impl EnvSource, name: &str) -> Option<i64> {
    env.var(name)?.trim().parse().ok()
}

/// A duration such as `500ms` or `1h30m`, after trimming whitespace. An
/// explicit `+` sign is accepted; negative durations are not.
pub fn duration(env: &impl EnvSource, name: &str) -> Option<Duration> {
    let raw = env.var(name)?;
    let raw = raw.trim();
    humantime::parse_duration(raw.strip_prefix('+').unwrap_or(raw)).ok()
}

/// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and the matching false forms.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
