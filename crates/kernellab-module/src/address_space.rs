//! `AddressSpace`: default `UserMemory` implementation.
//!
//! A sparse set of mapped regions keyed by base address. Accesses must
//! fall entirely inside one region; anything else faults without
//! touching memory. This is the caller side of every transfer in tests
//! and in embedders that drive the devices in-process.

use kernellab_core::error::Fault;
use kernellab_core::traits::UserMemory;

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
pub struct AddressSpace {
    regions: Mutex<BTreeMap<u64, Vec<u8>>>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `len` zeroed bytes at `base`
    ///
    /// Fails if the range is empty, wraps or overlaps an existing region.
    pub fn map(&self, base: u64, len: usize) -> Result<(), Fault> {
        let fault = Fault { addr: base, len };
        if len == 0 {
            return Err(fault);
        }
        let end = base.checked_add(len as u64).ok_or(fault)?;
        let mut regions = self.regions();

        if let Some((&prev, data)) = regions.range(..end).next_back() {
            if prev + data.len() as u64 > base {
                return Err(fault);
            }
        }
        regions.insert(base, vec![0; len]);
        Ok(())
    }

    /// Remove the region starting at `base`
    pub fn unmap(&self, base: u64) -> bool {
        self.regions().remove(&base).is_some()
    }

    fn regions(&self) -> MutexGuard<'_, BTreeMap<u64, Vec<u8>>> {
        self.regions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the in-region slice for `[addr, addr + len)`
    fn with_range<R>(&self, addr: u64, len: usize, f: impl FnOnce(&mut [u8]) -> R) -> Result<R, Fault> {
        let fault = Fault { addr, len };
        let mut regions = self.regions();
        let (&base, data) = regions.range_mut(..=addr).next_back().ok_or(fault)?;
        let start = (addr - base) as usize;
        let end = start.checked_add(len).ok_or(fault)?;
        if end > data.len() {
            return Err(fault);
        }
        Ok(f(&mut data[start..end]))
    }
}

impl UserMemory for AddressSpace {
    fn copy_from_user(&self, addr: u64, dst: &mut [u8]) -> Result<(), Fault> {
        self.with_range(addr, dst.len(), |src| dst.copy_from_slice(src))
    }

    fn copy_to_user(&self, addr: u64, src: &[u8]) -> Result<(), Fault> {
        self.with_range(addr, src.len(), |dst| dst.copy_from_slice(src))
    }
}

impl std::fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let regions = self.regions();
        f.debug_list()
            .entries(regions.iter().map(|(base, data)| (*base, data.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_inside_region() {
        let mm = AddressSpace::new();
        mm.map(0x1000, 64).unwrap();

        mm.copy_to_user(0x1010, &[1, 2, 3]).unwrap();
        let mut out = [0u8; 5];
        mm.copy_from_user(0x100f, &mut out).unwrap();
        assert_eq!(out, [0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_faults() {
        let mm = AddressSpace::new();
        mm.map(0x1000, 16).unwrap();

        // unmapped
        assert_eq!(mm.copy_to_user(0x10, &[0]), Err(Fault { addr: 0x10, len: 1 }));
        // runs off the end
        let mut buf = [0u8; 8];
        assert!(mm.copy_from_user(0x100c, &mut buf).is_err());
        // failed copies leave memory untouched
        assert!(mm.copy_to_user(0x100c, &[9; 8]).is_err());
        mm.copy_from_user(0x1008, &mut buf).unwrap();
        assert_eq!(buf, [0; 8]);
    }

    #[test]
    fn test_map_rejects_overlap() {
        let mm = AddressSpace::new();
        mm.map(0x1000, 0x100).unwrap();
        assert!(mm.map(0x10ff, 8).is_err());
        assert!(mm.map(0xff8, 16).is_err());
        assert!(mm.map(0x1100, 8).is_ok());
        assert!(mm.map(u64::MAX - 2, 8).is_err());

        assert!(mm.unmap(0x1000));
        assert!(mm.map(0xff8, 16).is_ok());
    }
}
