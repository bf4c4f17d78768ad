//! Compile-time field descriptors.
//!
//! A config struct exposes its fields through [`EnvStruct::visit_fields`]; each
//! field exposes its shape and a mutable slot through [`EnvField::shape`]. The
//! override engine is written once against these two traits.
//!
//! Implementations ship for the supported scalar types and their `Option`
//! forms. User structs get theirs from [`env_struct!`](crate::env_struct).

use std::time::Duration;

/// Identifier and tag of one registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// The field identifier as written in source.
    pub ident: &'static str,
    /// Explicit segment name; `Some("-")` excludes the field.
    pub tag: Option<&'static str>,
}

impl FieldMeta {
    pub const fn new(ident: &'static str, tag: Option<&'static str>) -> Self {
        Self { ident, tag }
    }
}

/// A struct whose fields can be overridden from the environment.
pub trait EnvStruct {
    /// Call `visit` once per registered field, in declaration order.
    fn visit_fields(&mut self, visit: &mut dyn FnMut(FieldMeta, &mut dyn EnvField));
}

/// A value the override engine knows how to treat.
pub trait EnvField {
    fn shape(&mut self) -> Shape<'_>;
}

/// Scalar kinds, which pick the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Bool,
    Signed,
    Unsigned,
    Duration,
}

/// What a field is, with a mutable view into it.
pub enum Shape<'a> {
    Scalar(Slot<'a>),
    Struct(&'a mut dyn EnvStruct),
    OptionalScalar(&'a mut dyn OptionalScalar),
    OptionalStruct(&'a mut dyn OptionalStruct),
}

/// Mutable storage for one scalar.
pub enum Slot<'a> {
    Text(&'a mut String),
    Bool(&'a mut bool),
    Signed(&'a mut dyn SignedInt),
    Unsigned(&'a mut dyn UnsignedInt),
    Duration(&'a mut Duration),
}

impl Slot<'_> {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Slot::Text(_) => ScalarKind::Text,
            Slot::Bool(_) => ScalarKind::Bool,
            Slot::Signed(_) => ScalarKind::Signed,
            Slot::Unsigned(_) => ScalarKind::Unsigned,
            Slot::Duration(_) => ScalarKind::Duration,
        }
    }
}

/// Signed integer storage of any width. Wider values are truncated.
pub trait SignedInt {
    fn set_i64(&mut self, value: i64);
}

/// Unsigned integer storage of any width. Wider values are truncated.
pub trait UnsignedInt {
    fn set_u64(&mut self, value: u64);
}

/// An `Option` around a scalar.
pub trait OptionalScalar {
    /// Kind of the wrapped scalar, known even while unset.
    fn kind(&self) -> ScalarKind;
    /// Storage, inserting the default value first when unset.
    fn get_or_insert(&mut self) -> Slot<'_>;
}

/// An `Option` around a struct.
pub trait OptionalStruct {
    fn get(&mut self) -> Option<&mut dyn EnvStruct>;
    /// The struct, inserting its default first when unset. Never replaces a
    /// value that is already present.
    fn get_or_insert(&mut self) -> &mut dyn EnvStruct;
}

macro_rules! impl_int {
    ($trait:ident, $set:ident, $wide:ty, $variant:ident, $kind:ident: $($ty:ty),+) => {$(
        impl $trait for $ty {
            fn $set(&mut self, value: $wide) {
                *self = value as $ty;
            }
        }

        impl EnvField for $ty {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Scalar(Slot::$variant(self))
            }
        }

        impl OptionalScalar for Option<$ty> {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$kind
            }

            fn get_or_insert(&mut self) -> Slot<'_> {
                Slot::$variant(self.get_or_insert_with(Default::default))
            }
        }

        impl EnvField for Option<$ty> {
            fn shape(&mut self) -> Shape<'_> {
                Shape::OptionalScalar(self)
            }
        }
    )+};
}

impl_int!(SignedInt, set_i64, i64, Signed, Signed: i8, i16, i32, i64, isize);
impl_int!(UnsignedInt, set_u64, u64, Unsigned, Unsigned: u8, u16, u32, u64, usize);

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl EnvField for $ty {
            fn shape(&mut self) -> Shape<'_> {
                Shape::Scalar(Slot::$variant(self))
            }
        }

        impl OptionalScalar for Option<$ty> {
            fn kind(&self) -> ScalarKind {
                ScalarKind::$variant
            }

            fn get_or_insert(&mut self) -> Slot<'_> {
                Slot::$variant(self.get_or_insert_with(Default::default))
            }
        }

        impl EnvField for Option<$ty> {
            fn shape(&mut self) -> Shape<'_> {
                Shape::OptionalScalar(self)
            }
        }
    )+};
}

impl_scalar! {
    String => Text,
    bool => Bool,
    Duration => Duration,
}

/// Marker for structs registered with [`env_struct!`](crate::env_struct).
///
/// Lets `Option<S>` get its [`EnvField`] impl without overlapping the scalar
/// `Option` impls above.
pub trait NestedStruct: EnvStruct + Default {}

impl<S: NestedStruct> OptionalStruct for Option<S> {
    fn get(&mut self) -> Option<&mut dyn EnvStruct> {
        self.as_mut().map(|s| s as &mut dyn EnvStruct)
    }

    fn get_or_insert(&mut self) -> &mut dyn EnvStruct {
        self.get_or_insert_with(S::default)
    }
}

impl<S: NestedStruct> EnvField for Option<S> {
    fn shape(&mut self) -> Shape<'_> {
        Shape::OptionalStruct(self)
    }
}

/// Register a struct's fields for environment overrides.
///
/// Each entry is a field name, optionally followed by `=> "TAG"`. A tag replaces
/// the derived segment name; the tag `"-"` excludes the field. Fields left out
/// of the list are never touched.
///
/// ```ignore
/// #[derive(Default)]
/// struct Server {
///     host: String,
///     port: u16,
///     timeout: std::time::Duration,
/// }
///
/// #[derive(Default)]
/// struct AppConfig {
///     name: String,
///     server: Server,
///     tls: Option<Tls>,
///     api_token: String,
/// }
///
/// envfig::env_struct!(Server { host, port, timeout => "TIMEOUT" });
/// envfig::env_struct!(AppConfig { name, server => "SRV", tls, api_token => "-" });
/// ```
///
/// The struct must implement `Default`, which is used when an `Option` of it is
/// allocated.
#[macro_export]
macro_rules! env_struct {
    ($ty:ty { $($field:ident $(=> $tag:literal)?),* $(,)? }) => {
        impl $crate::EnvStruct for $ty {
            fn visit_fields(
                &mut self,
                visit: &mut dyn FnMut($crate::FieldMeta, &mut dyn $crate::EnvField),
            ) {
                $(
                    visit(
                        $crate::FieldMeta::new(
                            stringify!($field),
                            $crate::__env_tag!($($tag)?),
                        ),
                        &mut self.$field,
                    );
                )*
            }
        }

        impl $crate::EnvField for $ty {
            fn shape(&mut self) -> $crate::Shape<'_> {
                $crate::Shape::Struct(self)
            }
        }

        impl $crate::NestedStruct for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __env_tag {
    () => {
        ::core::option::Option::None
    };
    ($tag:literal) => {
        ::core::option::Option::Some($tag)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        left: String,
        right: u8,
        hidden: bool,
    }

    crate::env_struct!(Pair { left => "L", right, hidden => "-" });

    #[test]
    fn visits_registered_fields_in_order() {
        let mut pair = Pair::default();
        let mut seen = Vec::new();
        pair.visit_fields(&mut |meta, _| seen.push(meta));
        assert_eq!(
            seen,
            vec![
                FieldMeta::new("left", Some("L")),
                FieldMeta::new("right", None),
                FieldMeta::new("hidden", Some("-")),
            ]
        );
    }

    #[test]
    fn scalar_shapes() {
        let mut s = String::new();
        assert!(matches!(s.shape(), Shape::Scalar(Slot::Text(_))));
        let mut n = 0i32;
        assert!(matches!(n.shape(), Shape::Scalar(Slot::Signed(_))));
        let mut u = 0usize;
        assert!(matches!(u.shape(), Shape::Scalar(Slot::Unsigned(_))));
        let mut d = Duration::ZERO;
        assert!(matches!(d.shape(), Shape::Scalar(Slot::Duration(_))));
    }

    #[test]
    fn struct_and_optional_shapes() {
        let mut pair = Pair::default();
        assert!(matches!(pair.shape(), Shape::Struct(_)));
        let mut opt: Option<Pair> = None;
        assert!(matches!(opt.shape(), Shape::OptionalStruct(_)));
        let mut opt: Option<bool> = None;
        assert!(matches!(opt.shape(), Shape::OptionalScalar(_)));
    }

    #[test]
    fn optional_scalar_knows_kind_while_unset() {
        let opt: Option<u16> = None;
        assert_eq!(OptionalScalar::kind(&opt), ScalarKind::Unsigned);
        let opt: Option<Duration> = None;
        assert_eq!(OptionalScalar::kind(&opt), ScalarKind::Duration);
    }

    #[test]
    fn integer_slots_truncate_to_width() {
        let mut n = 0i8;
        n.set_i64(300);
        assert_eq!(n, 300i64 as i8);
        let mut u = 0u8;
        u.set_u64(256 + 7);
        assert_eq!(u, 7);
    }

    #[test]
    fn optional_struct_insert_keeps_existing() {
        let mut opt = Some(Pair {
            left: "kept".into(),
            ..Pair::default()
        });
        OptionalStruct::get_or_insert(&mut opt);
        assert_eq!(opt.unwrap().left, "kept");
    }
}
