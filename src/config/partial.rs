//! Layered config structs.
//!
//! Every config section has a partial counterpart in which each value is
//! optional. Partials from the built-in defaults and the user's file are
//! merged, then validated into the full section.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// A partial config struct, which contains optional values of everything.
/// Generated with the `PartialConfig` macro.
pub trait PartialConfig {
    /// The full config type, returned after validation.
    type Output;

    /// Merges `low` and `high`; `high` wins wherever both have a value.
    fn merge(low: Self, high: Self) -> Self;

    /// Validates the final struct. All required values should exist.
    fn validate(self) -> Result<Self::Output, ValidationError>;
}

#[derive(Default, Debug, PartialEq)]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
    /// Section path leading to `fields`, outermost first.
    pub path: Vec<String>,
}

impl ValidationError {
    pub(crate) fn within(mut self, section: &str) -> Self {
        self.path.insert(0, section.to_owned());
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "Missing fields {:?}", self.fields)
        } else {
            write!(f, "Missing fields {:?} in [{}]", self.fields, self.path.join("."))
        }
    }
}
impl Error for ValidationError {}

/// Derives a partial struct for a config section.
///
/// ```ignore
/// #[derive(PartialConfig!)]
/// #[derive_args(SectionPartial)]
/// #[derive(Serialize, Deserialize)]
/// struct Section {
///     value: u64,
///     #[derive_args(NestedPartial)]
///     nested: Nested,
/// }
/// ```
///
/// Plain fields become `Option<T>` in the partial. Fields marked with
/// `#[derive_args(..)]` use the named partial type of a nested section.
macro_rules! PartialConfig {
    (
        #[derive_args($PartialName:ident)]
        $(#[$struct_meta:meta])*
        $struct_vis:vis
        struct $StructName:ident {
            $(
                $(#[$($field_meta:tt)*])*
                $field_vis:vis
                $field_name:ident: $field_ty:ty
            ),* $(,)?
        }
    ) => {
        PartialConfig!(
            @fields(low, high, self, err) [
                $(#[$struct_meta])*
                struct $StructName => $PartialName {
                    $( $(#[$($field_meta)*])* $field_name: $field_ty, )*
                }
            ] -> [
                // Accumulated partial fields; merge body; missing checks;
                // validated fields.
                []; []; []; []
            ]
        );
    };

    // Every field is processed: emit the partial struct and its impl.
    (@fields($low:ident, $high:ident, $self:ident, $err:ident) [
        $(#[$struct_meta:meta])*
        struct $StructName:ident => $PartialName:ident { }
    ] -> [
        [ $($fields:tt)* ]; [ $($merge:tt)* ]; [ $($check:tt)* ]; [ $($validate:tt)* ]
    ]) => {
        $(#[$struct_meta])*
        // All fields are Option or another partial, so Default is empty.
        #[derive(Default)]
        #[serde(default)]
        struct $PartialName {
            $( $fields )*
        }

        impl PartialConfig for $PartialName {
            type Output = $StructName;

            fn merge($low: Self, $high: Self) -> Self {
                Self {
                    $( $merge )*
                }
            }

            fn validate($self) -> Result<$StructName, ValidationError> {
                #[allow(unused_mut)]
                let mut $err = ValidationError::default();
                $($check)*
                if !$err.fields.is_empty() {
                    return Err($err);
                }
                Ok($StructName {
                    $($validate)*
                })
            }
        }
    };

    // Nested section: reuse its partial type and validate it recursively.
    (@fields($low:ident, $high:ident, $self:ident, $err:ident) [
        $(#[$struct_meta:meta])*
        struct $StructName:ident => $PartialName:ident {
            #[derive_args($nested_partial:ident)]
            $(#[$($field_meta:tt)*])*
            $field_name:ident: $field_ty:ty,
            $($rest:tt)*
        }
    ] -> [
        [ $($fields:tt)* ]; [ $($merge:tt)* ]; [ $($check:tt)* ]; [ $($validate:tt)* ]
    ]) => {
        PartialConfig! {
            @fields($low, $high, $self, $err) [
                $(#[$struct_meta])*
                struct $StructName => $PartialName { $($rest)* }
            ] -> [
                [
                    $($fields)*

                    $(#[$($field_meta)*])*
                    $field_name: $nested_partial,
                ];
                [
                    $($merge)*
                    $field_name: <$nested_partial as PartialConfig>::merge($low.$field_name, $high.$field_name),
                ];
                [
                    $($check)*
                ];
                [
                    $($validate)*
                    $field_name: $self
                        .$field_name
                        .validate()
                        .map_err(|e| e.within(stringify!($field_name)))?,
                ]
            ]
        }
    };

    // Plain field: wrap it in Option.
    (@fields($low:ident, $high:ident, $self:ident, $err:ident) [
        $(#[$struct_meta:meta])*
        struct $StructName:ident => $PartialName:ident {
            $(#[$($field_meta:tt)*])*
            $field_name:ident: $field_ty:ty,

            $($rest:tt)*
        }
    ] -> [
        [ $($fields:tt)* ]; [ $($merge:tt)* ]; [ $($check:tt)* ]; [ $($validate:tt)* ]
    ]) => {
        PartialConfig! {
            @fields($low, $high, $self, $err) [
                $(#[$struct_meta])*
                struct $StructName => $PartialName { $($rest)* }
            ] -> [
                [
                    $($fields)*

                    $(#[$($field_meta)*])*
                    $field_name: Option<$field_ty>,
                ];
                [
                    $($merge)*
                    $field_name: $high.$field_name.or($low.$field_name),
                ];
                [
                    $($check)*
                    if $self.$field_name.is_none() {
                        $err.fields.push(stringify!($field_name));
                    }
                ];
                [
                    $($validate)*
                    // Checked for None above.
                    $field_name: $self.$field_name.unwrap(),
                ]
            ]
        }
    };
}
