use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::cell::UnsafeCell;

thread_local! {
    static RNG: UnsafeCell<ChaCha20Rng> = UnsafeCell::new(ChaCha20Rng::from_seed(OsRng.gen()));
}

/// Thread-local CSPRNG. Template draws and subject reference numbers don't
/// strictly need a cryptographic source, but sharing one seeded generator per
/// thread avoids handing `OsRng` to every call site.
pub struct SecureRng;

impl SecureRng {
    pub fn next_u32() -> u32 {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            unsafe { rand_chacha::rand_core::RngCore::next_u32(&mut *rng.get()) }
        })
    }

    pub fn next_u64() -> u64 {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            unsafe { rand_chacha::rand_core::RngCore::next_u64(&mut *rng.get()) }
        })
    }

    pub fn next_u128() -> u128 {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            let rng_ref = unsafe { &mut *rng.get() };
            let mut bytes = [0u8; 16];
            rand_chacha::rand_core::RngCore::fill_bytes(rng_ref, &mut bytes);
            u128::from_le_bytes(bytes)
        })
    }

    /// Uniform index into a collection of `len` elements. Panics if `len`
    /// is zero.
    pub fn uniform_index(len: usize) -> usize {
        RNG.with(|rng| {
            // Only one thread accesses this RNG so this is safe
            let rng_ref = unsafe { &mut *rng.get() };
            rng_ref.gen_range(0..len)
        })
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        SecureRng::next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        SecureRng::next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        RNG.with(|rng| unsafe {
            rand_chacha::rand_core::RngCore::fill_bytes(&mut *rng.get(), dest)
        })
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_index_stays_in_bounds() {
        for _ in 0..10_000 {
            assert!(SecureRng::uniform_index(7) < 7);
        }
    }

    #[test]
    fn test_uniform_index_hits_every_bucket() {
        let mut seen = [false; 4];
        for _ in 0..1_000 {
            seen[SecureRng::uniform_index(4)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_next_u128_varies() {
        assert_ne!(SecureRng::next_u128(), SecureRng::next_u128());
    }
}
