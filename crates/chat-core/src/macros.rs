/// Declare a closed enumeration transmitted as a small integer
///
/// Generates the enum with explicit discriminants, `TryFrom<u64>` that fails
/// with [`UnknownVariant`](crate::payload::UnknownVariant) on any other value,
/// and `From<Enum> for u8` for the way back.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant = $value,
            )+
        }

        impl $name {
            /// Get the numeric value
            #[inline]
            #[must_use]
            pub fn as_u8(self) -> u8 {
                self as u8
            }
        }

        impl TryFrom<u64> for $name {
            type Error = $crate::payload::UnknownVariant;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err($crate::payload::UnknownVariant(other)),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }
    };
}

pub(crate) use closed_enum;
