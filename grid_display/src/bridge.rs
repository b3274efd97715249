// bridge.rs - Typed, bounds-checked read-only views over a grid engine's linear memory
//
// A view is derived from a `Pointer` and borrows the memory it reads, so it
// cannot outlive a `step()` on the owning model. Pointers themselves are
// plain values; deriving a view from one issued before the latest step
// fails with `BoundsError::Stale`.

use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;

use crate::error::{BoundsError, RenderResult};
use crate::memory::{LinearMemory, Pointer};
use crate::model::GridModel;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i32 {}
}

/// Element types a view may reinterpret memory as.
pub trait Element: Pod + sealed::Sealed {}
impl Element for u8 {}
impl Element for i32 {}

#[derive(Debug, Clone, Copy)]
pub struct View<'m, T> {
    bytes: &'m [u8],
    len: usize,
    _element: PhantomData<T>,
}

/// One byte per cell, row-major.
pub type SnapshotView<'m> = View<'m, u8>;
/// Signed 32-bit diff entries in native byte order.
pub type DiffView<'m> = View<'m, i32>;

impl<'m, T: Element> View<'m, T> {
    pub fn derive(memory: &'m LinearMemory, ptr: Pointer, len: usize) -> Result<Self, BoundsError> {
        let size = len
            .checked_mul(size_of::<T>())
            .ok_or(BoundsError::Region {
                address: ptr.address(),
                size: usize::MAX,
                memory_len: memory.len(),
            })?;
        let bytes = memory.region(ptr, size)?;
        Ok(Self {
            bytes,
            len,
            _element: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Result<T, BoundsError> {
        if index >= self.len {
            return Err(BoundsError::Index {
                index,
                len: self.len,
            });
        }
        let width = size_of::<T>();
        let start = index * width;
        Ok(bytemuck::pod_read_unaligned(&self.bytes[start..start + width]))
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bytes
            .chunks_exact(size_of::<T>())
            .map(bytemuck::pod_read_unaligned)
    }
}

/// Fresh view over the model's full-state snapshot.
pub fn snapshot_view<M: GridModel + ?Sized>(model: &M) -> RenderResult<SnapshotView<'_>> {
    let ptr = model.snapshot();
    Ok(View::derive(model.memory(), ptr, model.cell_count())?)
}

/// Fresh view over the diff produced by the step that returned `ptr`.
pub fn diff_view<M: GridModel + ?Sized>(
    model: &M,
    ptr: Pointer,
    count: usize,
) -> RenderResult<DiffView<'_>> {
    Ok(View::derive(model.memory(), ptr, count)?)
}
