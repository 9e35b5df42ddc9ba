/// A vector of values plus a sequence of 32-bit indices into them.
///
/// The two halves are independent plain vectors; nothing is enforced at
/// mutation time. Whether every index actually lands inside `values` is
/// checked by validation (see `IndexedVector` in `cask_data`), not here.
#[derive(Debug, Clone, PartialEq)]
pub struct IdxVec<T> {
    values: Vec<T>,
    index: Vec<u32>,
}

impl<T> Default for IdxVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IdxVec<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            index: Vec::new(),
        }
    }

    #[inline]
    pub fn from_parts(values: Vec<T>, index: Vec<u32>) -> Self {
        Self { values, index }
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut Vec<T> {
        &mut self.values
    }

    #[inline]
    pub fn index(&self) -> &[u32] {
        &self.index
    }

    #[inline]
    pub fn index_mut(&mut self) -> &mut Vec<u32> {
        &mut self.index
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.index.clear();
    }
}
