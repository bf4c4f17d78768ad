//! Where environment variables come from.
//!
//! The override engine reads through [`EnvSource`] so tests can pass synthetic
//! data instead of touching the process environment.

use std::collections::BTreeMap;
use std::ops::Bound;

/// Read access to a set of environment variables.
pub trait EnvSource {
    /// Value of `name`, or `None` when unset. An empty value is still set.
    fn var(&self, name: &str) -> Option<String>;

    /// Whether any variable name starts with `base` (exact, case-sensitive).
    ///
    /// Matches every name sharing the prefix, declared field or not. This is
    /// what gates allocation of optional nested structs.
    fn has_prefix(&self, base: &str) -> bool;
}

/// The live process environment.
///
/// Values that are not valid UTF-8 count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(name)?.into_string().ok()
    }

    fn has_prefix(&self, base: &str) -> bool {
        std::env::vars_os().any(|(key, _)| key.to_string_lossy().starts_with(base))
    }
}

/// An owned, point-in-time set of variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Build from `(name, value)` pairs. Later duplicates win.
    pub fn new(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Capture the current process environment, skipping non-UTF-8 entries.
    pub fn capture() -> Self {
        Self::new(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}

impl EnvSource for EnvSnapshot {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn has_prefix(&self, base: &str) -> bool {
        // Names are sorted, so the first key >= base is the only candidate.
        self.vars
            .range::<str, _>((Bound::Included(base), Bound::Unbounded))
            .next()
            .is_some_and(|(key, _)| key.starts_with(base))
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn has_prefix(&self, base: &str) -> bool {
        (**self).has_prefix(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_value_is_set() {
        let env = snapshot(&[("APP_NAME", "")]);
        assert_eq!(env.var("APP_NAME"), Some(String::new()));
        assert_eq!(env.var("APP_OTHER"), None);
    }

    #[test]
    fn prefix_matches_any_name_sharing_it() {
        let env = snapshot(&[("APP_INNER_XYZ", "1")]);
        assert!(env.has_prefix("APP_INNER_"));
        assert!(env.has_prefix("APP_"));
        assert!(!env.has_prefix("APP_PINNER_"));
    }

    #[test]
    fn prefix_is_case_sensitive() {
        let env = snapshot(&[("app_inner_str", "x")]);
        assert!(!env.has_prefix("APP_INNER_"));
    }

    #[test]
    fn prefix_requires_full_base() {
        // A variable equal to the base without the trailing separator is not a match.
        let env = snapshot(&[("APP_INNER", "x")]);
        assert!(!env.has_prefix("APP_INNER_"));
    }

    #[test]
    fn prefix_on_empty_snapshot() {
        assert!(!EnvSnapshot::default().has_prefix("APP_"));
    }

    #[test]
    fn later_duplicates_win() {
        let env = snapshot(&[("A", "1"), ("A", "2")]);
        assert_eq!(env.var("A").as_deref(), Some("2"));
        assert_eq!(env.len(), 1);
    }
}
