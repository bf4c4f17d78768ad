//! Environment overrides: walk a config struct and apply matching variables.
//!
//! Every field maps to `{PREFIX}_{SEGMENT}[_{SEGMENT}...]` (see [`naming`]).
//! Application never fails: a missing variable and a malformed one are treated
//! the same, and the field keeps whatever value it had.
//!
//! `Option` fields are only allocated when the environment has data for them.
//! An optional scalar needs its exact variable to be present and parse; an
//! optional struct needs at least one variable whose name starts with its own
//! name plus `_`. Nothing is ever reset to `None`.

use crate::decode;
use crate::env::{EnvSource, ProcessEnv};
use crate::fields::{EnvField, EnvStruct, OptionalScalar, ScalarKind, Shape, Slot};
use crate::naming::{self, SEPARATOR};

/// Apply overrides from the process environment.
///
/// `target` is normally a struct registered with
/// [`env_struct!`](crate::env_struct). An `Option` of one is walked only when
/// it is `Some`; any other value is left alone.
pub fn apply_env_overrides<F: EnvField + ?Sized>(target: &mut F, prefix: &str) {
    apply_env_overrides_from(target, prefix, &ProcessEnv);
}

/// Like [`apply_env_overrides`] but reading from an explicit [`EnvSource`].
pub fn apply_env_overrides_from<F, E>(target: &mut F, prefix: &str, env: &E)
where
    F: EnvField + ?Sized,
    E: EnvSource + ?Sized,
{
    let root = match target.shape() {
        Shape::Struct(s) => s,
        Shape::OptionalStruct(opt) => match opt.get() {
            Some(s) => s,
            None => return,
        },
        Shape::Scalar(_) | Shape::OptionalScalar(_) => return,
    };
    apply_struct(root, prefix, &[], &env);
}

fn apply_struct(target: &mut dyn EnvStruct, prefix: &str, segments: &[String], env: &dyn EnvSource) {
    target.visit_fields(&mut |meta, field| {
        let Some(segment) = naming::segment(meta.ident, meta.tag) else {
            return;
        };
        let mut path = segments.to_vec();
        path.push(segment);
        let name = naming::env_name(prefix, &path);

        match field.shape() {
            Shape::Struct(nested) => apply_struct(nested, prefix, &path, env),
            Shape::Scalar(slot) => {
                if let Some(value) = Decoded::read(env, slot.kind(), &name) {
                    value.assign(slot);
                    tracing::trace!(var = %name, "applied env override");
                }
            }
            Shape::OptionalStruct(opt) => {
                let base = format!("{name}{SEPARATOR}");
                if env.has_prefix(&base) {
                    tracing::trace!(var = %base, "env data present, allocating optional section");
                    apply_struct(opt.get_or_insert(), prefix, &path, env);
                }
            }
            Shape::OptionalScalar(opt) => apply_optional_scalar(opt, &name, env),
        }
    });
}

fn apply_optional_scalar(opt: &mut dyn OptionalScalar, name: &str, env: &dyn EnvSource) {
    // Decode first: storage is only allocated once a usable value exists.
    if let Some(value) = Decoded::read(env, opt.kind(), name) {
        value.assign(opt.get_or_insert());
        tracing::trace!(var = %name, "applied env override");
    }
}

/// A successfully decoded variable, ready to store.
enum Decoded {
    Text(String),
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Duration(std::time::Duration),
}

impl Decoded {
    fn read(env: &dyn EnvSource, kind: ScalarKind, name: &str) -> Option<Self> {
        match kind {
            ScalarKind::Text => decode::text(&env, name).map(Decoded::Text),
            ScalarKind::Bool => decode::boolean(&env, name).map(Decoded::Bool),
            ScalarKind::Signed => decode::signed(&env, name).map(Decoded::Signed),
            // Negative input for an unsigned field counts as absent.
            ScalarKind::Unsigned => decode::signed(&env, name)
                .and_then(|n| u64::try_from(n).ok())
                .map(Decoded::Unsigned),
            ScalarKind::Duration => decode::duration(&env, name).map(Decoded::Duration),
        }
    }

    fn assign(self, slot: Slot<'_>) {
        match (self, slot) {
            (Decoded::Text(v), Slot::Text(s)) => *s = v,
            (Decoded::Bool(v), Slot::Bool(s)) => *s = v,
            (Decoded::Signed(v), Slot::Signed(s)) => s.set_i64(v),
            (Decoded::Unsigned(v), Slot::Unsigned(s)) => s.set_u64(v),
            (Decoded::Duration(v), Slot::Duration(s)) => *s = v,
            // Kinds come from the slot itself, so they always agree.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvSnapshot;
    use crate::fixtures::test::{EnvCfg, EnvInner};
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs.iter().copied().collect()
    }

    fn apply(cfg: &mut EnvCfg, prefix: &str, pairs: &[(&str, &str)]) {
        apply_env_overrides_from(cfg, prefix, &env(pairs));
    }

    #[test]
    fn all_branches_with_prefix() {
        let mut c = EnvCfg::default();
        apply(
            &mut c,
            "APP",
            &[
                ("APP_S", "top"),
                ("APP_API_KEY2FA", "k2fa"),
                ("APP_INNER_STR", "in"),
                ("APP_INNER_BOOL", "true"),
                ("APP_INNER_INT", "42"),
                ("APP_INNER_DUR", "1h30m"),
                ("APP_INNER_U", "5"),
                ("APP_INNER_NEG_U", "-3"),
                ("APP_INNER_SKIP", "shouldSkip"),
                ("APP_PINNER_STR", "pinner"),
                ("APP_PSTR", "hello"),
                ("APP_PBOOL", "1"),
                ("APP_PINT", "7"),
                ("APP_PDUR", "500ms"),
                ("APP_PU", "9"),
            ],
        );

        assert_eq!(c.s, "top");
        assert_eq!(c.api_key2fa, "k2fa");
        assert_eq!(c.inner.str, "in");
        assert!(c.inner.b);
        assert_eq!(c.inner.i, 42);
        assert_eq!(c.inner.dur, Duration::from_secs(90 * 60));
        assert_eq!(c.inner.u, 5);
        assert_eq!(c.inner.neg_u, 0, "negative input must be ignored for unsigned");
        assert_eq!(c.inner.skip, "", "skip-tagged field must stay untouched");

        let pinner = c.ptr_inner.as_ref().expect("PINNER should be allocated");
        assert_eq!(pinner.str, "pinner");

        assert_eq!(c.ptr_str.as_deref(), Some("hello"));
        assert_eq!(c.ptr_bool, Some(true));
        assert_eq!(c.ptr_int, Some(7));
        assert_eq!(c.ptr_dur, Some(Duration::from_millis(500)));
        assert_eq!(c.ptr_uint, Some(9));
    }

    #[test]
    fn no_prefix_uses_bare_segments() {
        let mut c = EnvCfg::default();
        apply(&mut c, "", &[("S", "nopfx"), ("INNER_STR", "inNoPfx")]);
        assert_eq!(c.s, "nopfx");
        assert_eq!(c.inner.str, "inNoPfx");
    }

    #[test]
    fn unallocated_optional_root_is_noop() {
        let mut root: Option<EnvCfg> = None;
        apply_env_overrides_from(&mut root, "APP", &env(&[("APP_S", "x")]));
        assert!(root.is_none());
    }

    #[test]
    fn allocated_optional_root_is_walked() {
        let mut root = Some(EnvCfg::default());
        apply_env_overrides_from(&mut root, "APP", &env(&[("APP_S", "x")]));
        assert_eq!(root.unwrap().s, "x");
    }

    #[test]
    fn scalar_root_is_noop() {
        let mut s = String::from("keep");
        apply_env_overrides_from(&mut s, "APP", &env(&[("APP", "changed")]));
        assert_eq!(s, "keep");
    }

    #[test]
    fn no_allocation_without_env() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("UNRELATED", "1")]);
        assert!(c.ptr_inner.is_none());
        assert!(c.ptr_str.is_none());
        assert!(c.ptr_bool.is_none());
        assert!(c.ptr_int.is_none());
        assert!(c.ptr_dur.is_none());
        assert!(c.ptr_uint.is_none());
    }

    #[test]
    fn malformed_optional_scalars_stay_none() {
        let mut c = EnvCfg::default();
        apply(
            &mut c,
            "APP",
            &[
                ("APP_PBOOL", "notabool"),
                ("APP_PINT", "seven"),
                ("APP_PDUR", "soon"),
                ("APP_PU", "-1"),
            ],
        );
        assert!(c.ptr_bool.is_none());
        assert!(c.ptr_int.is_none());
        assert!(c.ptr_dur.is_none());
        assert!(c.ptr_uint.is_none());
    }

    #[test]
    fn empty_value_allocates_optional_text() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_PSTR", "")]);
        assert_eq!(c.ptr_str.as_deref(), Some(""));
    }

    #[test]
    fn stray_variable_allocates_optional_struct() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_PINNER_XYZ", "1")]);
        let pinner = c.ptr_inner.expect("any APP_PINNER_* variable allocates");
        assert_eq!(pinner, EnvInner::default());
    }

    #[test]
    fn bare_optional_struct_name_does_not_allocate() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_PINNER", "1")]);
        assert!(c.ptr_inner.is_none());
    }

    #[test]
    fn skip_tagged_inside_optional_struct_is_ignored() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_PINNER_SKIP", "nope")]);
        // The probe still sees APP_PINNER_*, so the section is allocated,
        // but the skip-tagged field itself is never read.
        let pinner = c.ptr_inner.expect("probe matched");
        assert_eq!(pinner.skip, "");
    }

    #[test]
    fn skip_tagged_optional_struct_is_never_allocated() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_HIDDEN_STR", "x"), ("APP_HIDDEN", "x")]);
        assert!(c.hidden.is_none());
    }

    #[test]
    fn existing_optional_struct_is_kept_and_updated() {
        let mut c = EnvCfg {
            ptr_inner: Some(EnvInner {
                str: "old".into(),
                i: 11,
                ..EnvInner::default()
            }),
            ..EnvCfg::default()
        };
        apply(&mut c, "APP", &[("APP_PINNER_STR", "new")]);
        let pinner = c.ptr_inner.unwrap();
        assert_eq!(pinner.str, "new");
        assert_eq!(pinner.i, 11);
    }

    #[test]
    fn existing_optional_scalar_is_never_cleared() {
        let mut c = EnvCfg {
            ptr_int: Some(3),
            ..EnvCfg::default()
        };
        apply(&mut c, "APP", &[("APP_PINT", "bad")]);
        assert_eq!(c.ptr_int, Some(3));
    }

    #[test]
    fn negative_unsigned_keeps_prior_value() {
        let mut c = EnvCfg::default();
        c.inner.neg_u = 12;
        apply(&mut c, "APP", &[("APP_INNER_NEG_U", "-3")]);
        assert_eq!(c.inner.neg_u, 12);
    }

    #[test]
    fn signed_value_truncates_to_field_width() {
        let mut c = EnvCfg::default();
        apply(&mut c, "APP", &[("APP_INNER_SMALL", "300")]);
        assert_eq!(c.inner.small, 300i64 as i8);
    }

    #[test]
    fn malformed_scalars_keep_prior_values() {
        let mut c = EnvCfg::default();
        c.inner.b = true;
        c.inner.i = 5;
        apply(
            &mut c,
            "APP",
            &[("APP_INNER_BOOL", "maybe"), ("APP_INNER_INT", "4x")],
        );
        assert!(c.inner.b);
        assert_eq!(c.inner.i, 5);
    }

    #[test]
    fn application_is_idempotent() {
        let pairs = [
            ("APP_S", "top"),
            ("APP_INNER_INT", "42"),
            ("APP_PINNER_STR", "pinner"),
            ("APP_PU", "9"),
        ];
        let mut once = EnvCfg::default();
        apply(&mut once, "APP", &pairs);
        let mut twice = EnvCfg::default();
        apply(&mut twice, "APP", &pairs);
        apply(&mut twice, "APP", &pairs);
        assert_eq!(once, twice);
    }

    #[test]
    fn process_env_is_read() {
        // Unique name so parallel tests cannot interfere.
        let key = "ENVFIG_OVERRIDES_TEST_S";
        // SAFETY: no other test reads or writes this variable.
        unsafe { std::env::set_var(key, "from-process") };
        let mut c = EnvCfg::default();
        apply_env_overrides(&mut c, "ENVFIG_OVERRIDES_TEST");
        unsafe { std::env::remove_var(key) };
        assert_eq!(c.s, "from-process");
    }
}
