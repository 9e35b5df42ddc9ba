//! The dynamic dispatch table behind [`Varying`](crate::Varying).
//!
//! One entry per supported `(element kind, container kind)` pair, each a
//! set of monomorphized function pointers operating on the type-erased
//! payload. Unsupported pairs simply have no entry.

use std::any::Any;

use cask_codec::{EntityReader, EntityWriter, Value};
use cask_types::{ContainerKind, Element, ElementKind, IdxVec, Result};
use glam::{
    DMat2, DMat3, DMat4, DQuat, DVec2, DVec3, DVec4, I8Vec2, I8Vec3, I8Vec4, I16Vec2, I16Vec3,
    I16Vec4, I64Vec2, I64Vec3, I64Vec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat, U8Vec2,
    U8Vec3, U8Vec4, U16Vec2, U16Vec3, U16Vec4, U64Vec2, U64Vec3, U64Vec4, UVec2, UVec3, UVec4,
    Vec2, Vec3, Vec4,
};
use uuid::Uuid;

use crate::varying::VaryingPayload;

pub(crate) type Payload = dyn Any + Send + Sync;

/// The operation set of one `(element, container)` pair.
///
/// The payload-typed operations return `false` when handed a payload of
/// the wrong type, which callers treat as corruption.
#[derive(Clone, Copy)]
pub(crate) struct DynOps {
    pub new: fn() -> Box<Payload>,
    pub clear: fn(&mut Payload) -> bool,
    pub equals: fn(&Payload, &Payload) -> bool,
    pub copy: fn(&mut Payload, &Payload) -> bool,
    pub write: fn(&Payload, &mut EntityWriter<'_>, &str) -> Result<()>,
    pub read: fn(&mut Payload, &mut EntityReader<'_, '_>, &str) -> Result<()>,
}

/// A concrete payload type with its empty value; the bound set every
/// dispatch operation needs.
pub(crate) trait PayloadOps: VaryingPayload + Value + Clone + PartialEq + Sized {
    fn empty() -> Self;
}

fn dyn_new<P: PayloadOps>() -> Box<Payload> {
    Box::new(P::empty())
}

fn dyn_clear<P: PayloadOps>(data: &mut Payload) -> bool {
    match data.downcast_mut::<P>() {
        Some(value) => {
            *value = P::empty();
            true
        }
        None => false,
    }
}

fn dyn_equals<P: PayloadOps>(lhs: &Payload, rhs: &Payload) -> bool {
    match (lhs.downcast_ref::<P>(), rhs.downcast_ref::<P>()) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

fn dyn_copy<P: PayloadOps>(dest: &mut Payload, source: &Payload) -> bool {
    match (dest.downcast_mut::<P>(), source.downcast_ref::<P>()) {
        (Some(dest), Some(source)) => {
            dest.clone_from(source);
            true
        }
        _ => false,
    }
}

fn dyn_write<P: PayloadOps>(
    data: &Payload,
    writer: &mut EntityWriter<'_>,
    key: &str,
) -> Result<()> {
    match data.downcast_ref::<P>() {
        Some(value) => writer.write(key, value),
        None => {
            log::error!("varying payload does not match its declared type");
            Err(cask_types::Error::Corrupted)
        }
    }
}

fn dyn_read<P: PayloadOps>(
    data: &mut Payload,
    reader: &mut EntityReader<'_, '_>,
    key: &str,
) -> Result<()> {
    match data.downcast_mut::<P>() {
        Some(value) => {
            *value = reader.read::<P>(key)?;
            Ok(())
        }
        None => {
            log::error!("varying payload does not match its declared type");
            Err(cask_types::Error::Corrupted)
        }
    }
}

fn ops_for<P: PayloadOps>() -> DynOps {
    DynOps {
        new: dyn_new::<P>,
        clear: dyn_clear::<P>,
        equals: dyn_equals::<P>,
        copy: dyn_copy::<P>,
        write: dyn_write::<P>,
        read: dyn_read::<P>,
    }
}

fn container_ops<T>(container: ContainerKind) -> DynOps
where
    T: PayloadOps,
    Option<T>: PayloadOps,
    Vec<T>: PayloadOps,
    Option<Vec<T>>: PayloadOps,
    IdxVec<T>: PayloadOps,
    Option<IdxVec<T>>: PayloadOps,
{
    match container {
        ContainerKind::None => ops_for::<T>(),
        ContainerKind::OptionalValue => ops_for::<Option<T>>(),
        ContainerKind::Vector => ops_for::<Vec<T>>(),
        ContainerKind::OptionalVector => ops_for::<Option<Vec<T>>>(),
        ContainerKind::IdxVector => ops_for::<IdxVec<T>>(),
        ContainerKind::OptionalIdxVector => ops_for::<Option<IdxVec<T>>>(),
    }
}

/// One macro invocation per consumer, over the single authoritative list of
/// element types.
macro_rules! for_each_element_type {
    ($consumer:ident) => {
        $consumer! {
            bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64,
            I8Vec2, I8Vec3, I8Vec4, I16Vec2, I16Vec3, I16Vec4,
            IVec2, IVec3, IVec4, I64Vec2, I64Vec3, I64Vec4,
            U8Vec2, U8Vec3, U8Vec4, U16Vec2, U16Vec3, U16Vec4,
            UVec2, UVec3, UVec4, U64Vec2, U64Vec3, U64Vec4,
            Vec2, Vec3, Vec4, DVec2, DVec3, DVec4,
            Mat2, Mat3, Mat4, DMat2, DMat3, DMat4,
            Quat, DQuat,
            Uuid, cask_types::Hash, String, cask_types::EntityRef, cask_types::ItemRef,
        }
    };
}

macro_rules! impl_payloads {
    ($($ty:ty,)+) => {
        $(
            impl VaryingPayload for $ty {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::None;
            }
            impl VaryingPayload for Option<$ty> {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::OptionalValue;
            }
            impl VaryingPayload for Vec<$ty> {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::Vector;
            }
            impl VaryingPayload for Option<Vec<$ty>> {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::OptionalVector;
            }
            impl VaryingPayload for IdxVec<$ty> {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::IdxVector;
            }
            impl VaryingPayload for Option<IdxVec<$ty>> {
                const ELEMENT: ElementKind = <$ty as Element>::KIND;
                const CONTAINER: ContainerKind = ContainerKind::OptionalIdxVector;
            }

            impl PayloadOps for $ty {
                fn empty() -> Self {
                    <$ty as Element>::zero()
                }
            }
            impl PayloadOps for Option<$ty> {
                fn empty() -> Self {
                    None
                }
            }
            impl PayloadOps for Vec<$ty> {
                fn empty() -> Self {
                    Self::new()
                }
            }
            impl PayloadOps for Option<Vec<$ty>> {
                fn empty() -> Self {
                    None
                }
            }
            impl PayloadOps for IdxVec<$ty> {
                fn empty() -> Self {
                    Self::new()
                }
            }
            impl PayloadOps for Option<IdxVec<$ty>> {
                fn empty() -> Self {
                    None
                }
            }
        )+
    };
}

for_each_element_type!(impl_payloads);

macro_rules! impl_ops_lookup {
    ($($ty:ty,)+) => {
        /// The dispatch entry for an `(element, container)` pair, or `None`
        /// for unsupported combinations.
        pub(crate) fn ops(element: ElementKind, container: ContainerKind) -> Option<DynOps> {
            $(
                if element == <$ty as Element>::KIND {
                    return Some(container_ops::<$ty>(container));
                }
            )+
            None
        }
    };
}

for_each_element_type!(impl_ops_lookup);
