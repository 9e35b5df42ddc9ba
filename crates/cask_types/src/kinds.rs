//! The closed enumerations describing what the wire format can carry.

/// The maximum length in bytes of a chunk key. Keys should be as short as
/// possible, for both space and lookup performance.
pub const MAX_KEY_LENGTH: usize = 40;

/// Type tags as they appear on the wire.
///
/// Tags below `0x40` use the small chunk encoding (payload + key < 256
/// bytes); tags from `0x40` up use the large chunk encoding with a `u64`
/// size field. The numeric values are part of the stable wire format.
///
/// The scalar tags cover every bit width of their family: `Int` is any of
/// i8/i16/i32/i64, and the chunk's size field disambiguates. The same holds
/// for the vector, matrix and quaternion tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireTag {
    Bool = 0x01,
    Int = 0x02,
    UInt = 0x03,
    Float = 0x04,
    Vec2 = 0x05,
    Vec3 = 0x06,
    Vec4 = 0x07,
    IVec2 = 0x08,
    IVec3 = 0x09,
    IVec4 = 0x0a,
    UVec2 = 0x0b,
    UVec3 = 0x0c,
    UVec4 = 0x0d,
    Mat2 = 0x0e,
    Mat3 = 0x0f,
    Mat4 = 0x10,
    Quat = 0x11,
    Uuid = 0x12,
    Hash = 0x13,

    /// A named subsection containing named values and nested subsections.
    Subsection = 0xd0,
    /// An array of unnamed, size-prefixed subsections.
    SubsectionArray = 0xd1,
    /// A UTF-8 encoded string.
    String = 0xe0,
    /// An array of strings.
    StringArray = 0xe1,
}

impl WireTag {
    /// The tag of the array form of a base value tag (`0x01..=0x13`).
    ///
    /// Array tags occupy `0x41..=0x53`, at a fixed `0x40` offset from their
    /// single-value counterparts.
    #[inline]
    pub const fn array(self) -> u8 {
        debug_assert!((self as u8) <= WireTag::Hash as u8);
        self as u8 + 0x40
    }
}

macro_rules! element_kinds {
    ($($variant:ident = $value:literal,)+) => {
        /// Every element type the framework can carry, one variant per
        /// concrete type (unlike [`WireTag`], bit widths are distinct
        /// kinds here).
        ///
        /// The `u16` discriminants are stable: they are what a serialized
        /// `Varying` stores for its element tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum ElementKind {
            $($variant = $value,)+
        }

        impl ElementKind {
            /// The stable `u16` form used on the wire by `Varying`.
            #[inline]
            pub const fn as_u16(self) -> u16 {
                self as u16
            }

            /// Decode the stable `u16` form; `None` for unknown values.
            pub const fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

element_kinds! {
    Bool = 0x01,
    I8 = 0x02,
    I16 = 0x03,
    I32 = 0x04,
    I64 = 0x05,
    U8 = 0x06,
    U16 = 0x07,
    U32 = 0x08,
    U64 = 0x09,
    F32 = 0x0a,
    F64 = 0x0b,
    I8Vec2 = 0x0c,
    I8Vec3 = 0x0d,
    I8Vec4 = 0x0e,
    I16Vec2 = 0x0f,
    I16Vec3 = 0x10,
    I16Vec4 = 0x11,
    I32Vec2 = 0x12,
    I32Vec3 = 0x13,
    I32Vec4 = 0x14,
    I64Vec2 = 0x15,
    I64Vec3 = 0x16,
    I64Vec4 = 0x17,
    U8Vec2 = 0x18,
    U8Vec3 = 0x19,
    U8Vec4 = 0x1a,
    U16Vec2 = 0x1b,
    U16Vec3 = 0x1c,
    U16Vec4 = 0x1d,
    U32Vec2 = 0x1e,
    U32Vec3 = 0x1f,
    U32Vec4 = 0x20,
    U64Vec2 = 0x21,
    U64Vec3 = 0x22,
    U64Vec4 = 0x23,
    F32Vec2 = 0x24,
    F32Vec3 = 0x25,
    F32Vec4 = 0x26,
    F64Vec2 = 0x27,
    F64Vec3 = 0x28,
    F64Vec4 = 0x29,
    F32Mat2 = 0x2a,
    F32Mat3 = 0x2b,
    F32Mat4 = 0x2c,
    F64Mat2 = 0x2d,
    F64Mat3 = 0x2e,
    F64Mat4 = 0x2f,
    F32Quat = 0x30,
    F64Quat = 0x31,
    Uuid = 0x32,
    Hash = 0x33,
    String = 0x34,
    EntityRef = 0x35,
    ItemRef = 0x36,
}

/// Every container shape a value can be wrapped in.
///
/// The `u16` discriminants are stable wire values (serialized by
/// `Varying`), inherited from the original format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ContainerKind {
    /// A single direct value.
    None = 0x00,
    /// Zero or one value.
    OptionalValue = 0x01,
    /// An ordered sequence of values.
    Vector = 0x10,
    /// An optional ordered sequence of values.
    OptionalVector = 0x11,
    /// Values plus a sequence of 32-bit indices into them.
    IdxVector = 0x20,
    /// An optional indexed vector.
    OptionalIdxVector = 0x21,
}

impl ContainerKind {
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x00 => Some(Self::None),
            0x01 => Some(Self::OptionalValue),
            0x10 => Some(Self::Vector),
            0x11 => Some(Self::OptionalVector),
            0x20 => Some(Self::IdxVector),
            0x21 => Some(Self::OptionalIdxVector),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_tags_are_offset_by_0x40() {
        assert_eq!(WireTag::Bool.array(), 0x41);
        assert_eq!(WireTag::UInt.array(), 0x43);
        assert_eq!(WireTag::Hash.array(), 0x53);
    }

    #[test]
    fn element_kind_u16_round_trip() {
        for value in 0..=u16::MAX {
            if let Some(kind) = ElementKind::from_u16(value) {
                assert_eq!(kind.as_u16(), value);
            }
        }
        assert_eq!(ElementKind::from_u16(0), None);
        assert_eq!(ElementKind::from_u16(0x37), None);
    }

    #[test]
    fn container_kind_u16_round_trip() {
        for kind in [
            ContainerKind::None,
            ContainerKind::OptionalValue,
            ContainerKind::Vector,
            ContainerKind::OptionalVector,
            ContainerKind::IdxVector,
            ContainerKind::OptionalIdxVector,
        ] {
            assert_eq!(ContainerKind::from_u16(kind.as_u16()), Some(kind));
        }
        assert_eq!(ContainerKind::from_u16(0x2), None);
    }
}
