use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand::rngs::StdRng;

/// Cryptographic randomness collaborator for C5 (`MsgId`, `EndToEndId`).
///
/// Injected rather than reached for globally, so tests can supply a
/// deterministic source without the emitter knowing the difference.
pub trait RandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]);
}

/// Production source: the OS CSPRNG, per spec.md §5 ("must be a CSPRNG, not
/// a deterministic PRNG, in production").
pub struct CryptoRandomSource(OsRng);

impl CryptoRandomSource {
    pub fn new() -> Self {
        Self(OsRng)
    }
}

impl Default for CryptoRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for CryptoRandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.0.fill_bytes(buf);
    }
}

/// Deterministic source for tests: a seeded `StdRng`, never used outside
/// `#[cfg(test)]` code.
pub struct DeterministicRandomSource(StdRng);

impl DeterministicRandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for DeterministicRandomSource {
    fn fill_bytes(&mut self, buf: &mut [u8]) {
        self.0.fill_bytes(buf);
    }
}
