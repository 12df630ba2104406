//! Declaration macros for event unions and variadic filter stages.

/// Declare an event union together with its tag enum.
///
/// Each variant wraps a payload struct of the same name. The macro generates:
/// - the union enum (outer and per-variant attributes are passed through),
/// - a `Copy` tag enum with `ALL`, `as_str`, `Display`, `FromStr`, and serde
///   support using the string literal given for each variant,
/// - `Tagged` for the union and for every payload struct,
/// - `Variant` and `From<Payload> for Union` for every payload struct.
///
/// ```
/// use tagstream::{tagged_union, Tagged, Variant};
///
/// #[derive(Clone, Debug, PartialEq)]
/// pub struct Add {
///     pub amount: i64,
/// }
///
/// #[derive(Clone, Debug, PartialEq)]
/// pub struct Subtract {
///     pub amount: i64,
/// }
///
/// tagged_union! {
///     #[derive(Clone, Debug, PartialEq)]
///     pub enum Action: ActionType {
///         Add = "add",
///         Subtract = "subtract",
///     }
/// }
///
/// let action = Action::from(Add { amount: 1 });
/// assert_eq!(action.tag(), ActionType::Add);
/// assert_eq!(ActionType::Subtract.as_str(), "subtract");
/// assert_eq!(Add::narrow(action), Ok(Add { amount: 1 }));
/// ```
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $union:ident : $tag:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $name:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $union {
            $(
                $(#[$vmeta])*
                $variant($variant),
            )+
        }

        #[doc = concat!("Discriminant of [`", stringify!($union), "`].")]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $tag {
            $( $variant, )+
        }

        impl $tag {
            /// Every discriminant, in declaration order.
            pub const ALL: &'static [$tag] = &[$( $tag::$variant, )+];

            /// The wire name of this discriminant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $tag::$variant => $name, )+
                }
            }
        }

        impl ::core::fmt::Display for $tag {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $tag {
            type Err = $crate::StreamError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s {
                    $( $name => Ok($tag::$variant), )+
                    other => Err($crate::StreamError::UnknownTag(other.to_string())),
                }
            }
        }

        impl $crate::__private::serde::Serialize for $tag {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $tag {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let name = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                name.parse()
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }

        impl $crate::Tagged for $union {
            type Tag = $tag;

            fn tag(&self) -> $tag {
                match self {
                    $( $union::$variant(_) => $tag::$variant, )+
                }
            }
        }

        $(
            impl $crate::Tagged for $variant {
                type Tag = $tag;

                fn tag(&self) -> $tag {
                    $tag::$variant
                }
            }

            impl $crate::Variant for $variant {
                type Union = $union;

                const TAG: $tag = $tag::$variant;

                #[allow(unreachable_patterns)]
                fn narrow(event: $union) -> ::core::result::Result<Self, $union> {
                    match event {
                        $union::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }

            impl ::core::convert::From<$variant> for $union {
                fn from(inner: $variant) -> Self {
                    $union::$variant(inner)
                }
            }
        )+
    };
}

/// Build a narrowing [`OfType`](crate::filter::OfType) stage from 1 to 4
/// variant types.
///
/// `of_type!(Add, Subtract)` is `of_type::<(Add, Subtract)>()`. Five or more
/// variants do not compile; use [`of_tags`](crate::filter::of_tags) instead.
#[macro_export]
macro_rules! of_type {
    ($($variant:ty),+ $(,)?) => {
        $crate::filter::of_type::<($($variant,)+)>()
    };
}
