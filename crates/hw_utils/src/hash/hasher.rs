//! Hash states used by the `hookwire` containers.
//!
//! [`FixedHashState`] seeds `foldhash` with a constant, so a name hashes the
//! same way in every process. [`NoOpHashState`] is for keys that are hashes
//! already, like [`TypeId`](core::any::TypeId).

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

const SEED: u64 = 0x6b6f_6f68_7769_7265;

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A `foldhash` state with a constant seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use hw_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("id"), FixedHashState.hash_one("id"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> FixedHasher {
        FixedState::with_seed(SEED).build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// Keeps the last `u64` it was fed as the hash.
///
/// Byte input is folded in, so other keys still work, only badly.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        self.0 = bytes
            .iter()
            .fold(self.0, |hash, &byte| hash.rotate_left(8) ^ u64::from(byte));
    }

    #[inline]
    fn write_u64(&mut self, value: u64) {
        self.0 = value;
    }
}

#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline]
    fn build_hasher(&self) -> NoOpHasher {
        NoOpHasher::default()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn noop_keeps_u64() {
        assert_eq!(NoOpHashState.hash_one(42_u64), 42);
        assert_ne!(NoOpHashState.hash_one([1_u8, 2]), NoOpHashState.hash_one([2_u8, 1]));
    }

    #[test]
    fn fixed_state_depends_on_input_only() {
        assert_eq!(FixedHashState.hash_one("key"), FixedHashState.hash_one("key"));
        assert_ne!(FixedHashState.hash_one("key"), FixedHashState.hash_one("value"));
    }
}
