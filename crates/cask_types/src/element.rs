//! The [`Element`] trait: one impl per concrete element type the framework
//! can carry.

use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, I8Vec2, I8Vec3, I8Vec4, I16Vec2, I16Vec3,
    I16Vec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat, U8Vec2,
    U8Vec3, U8Vec4, U16Vec2, U16Vec3, U16Vec4, U64Vec2, U64Vec3, U64Vec4, UVec2, UVec3, UVec4,
    Vec2, Vec3, Vec4,
};
use uuid::Uuid;

use crate::{ElementKind, EntityRef, Hash, ItemRef};

/// A type that can appear as an element on the wire, in any of the
/// container shapes.
///
/// The set of implementors is closed: exactly one per [`ElementKind`]
/// variant. `zero()` is the value a cleared slot holds.
pub trait Element: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    const KIND: ElementKind;

    /// The zero value of the type.
    fn zero() -> Self;
}

/// Element types with a total order and known bounds, usable as set and
/// map keys (graph nodes, table keys) and for range scans.
///
/// `inf()` orders at-or-below every value of the type, `sup()` at-or-above.
/// Strings have no finite upper bound and are the one element type that is
/// not `Bounded`.
pub trait Bounded: Element {
    /// Limit inferior (minimum bound).
    fn inf() -> Self;

    /// Limit superior (maximum bound).
    fn sup() -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $kind:ident, $zero:expr, $inf:expr, $sup:expr) => {
        impl Element for $ty {
            const KIND: ElementKind = ElementKind::$kind;

            #[inline]
            fn zero() -> Self {
                $zero
            }
        }

        impl Bounded for $ty {
            #[inline]
            fn inf() -> Self {
                $inf
            }

            #[inline]
            fn sup() -> Self {
                $sup
            }
        }
    };
}

impl_element!(bool, Bool, false, false, true);

impl_element!(i8, I8, 0, i8::MIN, i8::MAX);
impl_element!(i16, I16, 0, i16::MIN, i16::MAX);
impl_element!(i32, I32, 0, i32::MIN, i32::MAX);
impl_element!(i64, I64, 0, i64::MIN, i64::MAX);
impl_element!(u8, U8, 0, u8::MIN, u8::MAX);
impl_element!(u16, U16, 0, u16::MIN, u16::MAX);
impl_element!(u32, U32, 0, u32::MIN, u32::MAX);
impl_element!(u64, U64, 0, u64::MIN, u64::MAX);
impl_element!(f32, F32, 0.0, f32::MIN, f32::MAX);
impl_element!(f64, F64, 0.0, f64::MIN, f64::MAX);

impl_element!(I8Vec2, I8Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I8Vec3, I8Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I8Vec4, I8Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I16Vec2, I16Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I16Vec3, I16Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I16Vec4, I16Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(IVec2, I32Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(IVec3, I32Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(IVec4, I32Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I64Vec2, I64Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I64Vec3, I64Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(I64Vec4, I64Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U8Vec2, U8Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U8Vec3, U8Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U8Vec4, U8Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U16Vec2, U16Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U16Vec3, U16Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U16Vec4, U16Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(UVec2, U32Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(UVec3, U32Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(UVec4, U32Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U64Vec2, U64Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U64Vec3, U64Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(U64Vec4, U64Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(Vec2, F32Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(Vec3, F32Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(Vec4, F32Vec4, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(DVec2, F64Vec2, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(DVec3, F64Vec3, Self::ZERO, Self::MIN, Self::MAX);
impl_element!(DVec4, F64Vec4, Self::ZERO, Self::MIN, Self::MAX);

impl_element!(
    Mat2,
    F32Mat2,
    Self::ZERO,
    Self::from_cols_array(&[f32::MIN; 4]),
    Self::from_cols_array(&[f32::MAX; 4])
);
impl_element!(
    Mat3,
    F32Mat3,
    Self::ZERO,
    Self::from_cols_array(&[f32::MIN; 9]),
    Self::from_cols_array(&[f32::MAX; 9])
);
impl_element!(
    Mat4,
    F32Mat4,
    Self::ZERO,
    Self::from_cols_array(&[f32::MIN; 16]),
    Self::from_cols_array(&[f32::MAX; 16])
);
impl_element!(
    DMat2,
    F64Mat2,
    Self::ZERO,
    Self::from_cols_array(&[f64::MIN; 4]),
    Self::from_cols_array(&[f64::MAX; 4])
);
impl_element!(
    DMat3,
    F64Mat3,
    Self::ZERO,
    Self::from_cols_array(&[f64::MIN; 9]),
    Self::from_cols_array(&[f64::MAX; 9])
);
impl_element!(
    DMat4,
    F64Mat4,
    Self::ZERO,
    Self::from_cols_array(&[f64::MIN; 16]),
    Self::from_cols_array(&[f64::MAX; 16])
);

impl_element!(
    Quat,
    F32Quat,
    Self::from_xyzw(0.0, 0.0, 0.0, 0.0),
    Self::from_xyzw(f32::MIN, f32::MIN, f32::MIN, f32::MIN),
    Self::from_xyzw(f32::MAX, f32::MAX, f32::MAX, f32::MAX)
);
impl_element!(
    DQuat,
    F64Quat,
    Self::from_xyzw(0.0, 0.0, 0.0, 0.0),
    Self::from_xyzw(f64::MIN, f64::MIN, f64::MIN, f64::MIN),
    Self::from_xyzw(f64::MAX, f64::MAX, f64::MAX, f64::MAX)
);

impl_element!(Uuid, Uuid, Self::nil(), Self::nil(), Self::max());
impl_element!(Hash, Hash, Self::ZERO, Self::INF, Self::SUP);
impl_element!(EntityRef, EntityRef, Self::NULL, Self::INF, Self::SUP);
impl_element!(ItemRef, ItemRef, Self::NULL, Self::INF, Self::SUP);

// Strings have a zero but no finite upper bound, so no `Bounded` impl.
impl Element for String {
    const KIND: ElementKind = ElementKind::String;

    #[inline]
    fn zero() -> Self {
        Self::new()
    }
}
