// memory.rs - Linear memory owned by a grid engine and read by the renderer
//
// The engine hands out `Pointer`s into its memory. Every pointer carries
// the `Epoch` at which it was issued; any operation that may move or
// rewrite the memory advances the epoch, which expires all outstanding
// pointers at once.

use crate::error::BoundsError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub const fn get(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

/// Address into a [`LinearMemory`], valid only while its epoch is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pointer {
    address: u32,
    epoch: Epoch,
}

impl Pointer {
    pub const fn address(self) -> u32 {
        self.address
    }

    pub const fn epoch(self) -> Epoch {
        self.epoch
    }
}

#[derive(Debug, Default)]
pub struct LinearMemory {
    bytes: Vec<u8>,
    epoch: Epoch,
}

impl LinearMemory {
    pub fn with_len(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
            epoch: Epoch::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Issue a pointer stamped with the current epoch.
    pub fn pointer(&self, address: u32) -> Pointer {
        Pointer {
            address,
            epoch: self.epoch,
        }
    }

    /// Check that `ptr` is current and that `size` bytes starting at it fit,
    /// returning those bytes.
    pub fn region(&self, ptr: Pointer, size: usize) -> Result<&[u8], BoundsError> {
        if ptr.epoch != self.epoch {
            return Err(BoundsError::Stale {
                issued: ptr.epoch.get(),
                current: self.epoch.get(),
            });
        }
        let start = ptr.address as usize;
        start
            .checked_add(size)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or(BoundsError::Region {
                address: ptr.address,
                size,
                memory_len: self.bytes.len(),
            })
    }

    /// Overwrite bytes in place. Does not advance the epoch; callers that
    /// change content readers may hold pointers into must call
    /// [`LinearMemory::invalidate`].
    pub fn write(&mut self, address: u32, data: &[u8]) -> Result<(), BoundsError> {
        let start = address as usize;
        let memory_len = self.bytes.len();
        let target = start
            .checked_add(data.len())
            .and_then(|end| self.bytes.get_mut(start..end))
            .ok_or(BoundsError::Region {
                address,
                size: data.len(),
                memory_len,
            })?;
        target.copy_from_slice(data);
        Ok(())
    }

    /// Grow or shrink the memory. The backing allocation may move, so every
    /// outstanding pointer expires.
    pub fn resize(&mut self, len: usize) -> Epoch {
        self.bytes.resize(len, 0);
        self.bytes.shrink_to_fit();
        self.invalidate()
    }

    /// Expire every outstanding pointer.
    pub fn invalidate(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.epoch
    }
}
