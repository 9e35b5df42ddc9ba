use std::fmt;

use uuid::Uuid;

use crate::Hash;

/// A reference to another entity, by the digest of its serialized form.
///
/// The all-zero digest is the null reference; like a pointer, an
/// `EntityRef` converts to `true` in boolean position iff it is non-null.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EntityRef(Hash);

impl EntityRef {
    /// The null reference.
    pub const NULL: Self = Self(Hash::ZERO);

    /// Limit inferior, for range scans over ordered sets of refs.
    pub const INF: Self = Self(Hash::INF);

    /// Limit superior, for range scans over ordered sets of refs.
    pub const SUP: Self = Self(Hash::SUP);

    #[inline]
    pub const fn from_hash(hash: Hash) -> Self {
        Self(hash)
    }

    #[inline]
    pub const fn hash(&self) -> Hash {
        self.0
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Hash> for EntityRef {
    #[inline]
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl From<EntityRef> for Hash {
    #[inline]
    fn from(r: EntityRef) -> Self {
        r.0
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({})", self.0)
    }
}

/// A reference to an item within the same entity. Acts like a handle: it
/// can be minted, held, copied and compared, but never pointed at a chosen
/// value.
///
/// The nil UUID is the null reference.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemRef(Uuid);

impl ItemRef {
    /// The null reference.
    pub const NULL: Self = Self(Uuid::nil());

    /// Limit inferior, for range scans over ordered sets of refs.
    pub const INF: Self = Self(Uuid::nil());

    /// Limit superior, for range scans over ordered sets of refs.
    pub const SUP: Self = Self(Uuid::max());

    /// Mint a new unique reference.
    #[inline]
    pub fn make_ref() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub const fn uuid(&self) -> Uuid {
        self.0
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ItemRef {
    #[inline]
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ItemRef> for Uuid {
    #[inline]
    fn from(r: ItemRef) -> Self {
        r.0
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemRef({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_orders_below_everything() {
        let minted = ItemRef::make_ref();
        assert!(ItemRef::NULL < minted);
        assert!(minted <= ItemRef::SUP);
        assert!(!minted.is_null());
        assert!(ItemRef::NULL.is_null());

        let r = EntityRef::from_hash(Hash::from_bytes([3; 32]));
        assert!(EntityRef::NULL < r);
        assert!(r < EntityRef::SUP);
        assert!(!r.is_null());
        assert!(EntityRef::NULL.is_null());
    }

    #[test]
    fn minted_refs_are_unique() {
        let a = ItemRef::make_ref();
        let b = ItemRef::make_ref();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_ref_round_trips_through_hash() {
        let hash = Hash::from_bytes([0xcd; 32]);
        let r = EntityRef::from(hash);
        assert_eq!(Hash::from(r), hash);
        assert_eq!(r.to_string(), hash.to_string());
    }
}
