//! Deterministic random streams for wheel spins and question generation.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// Independent RNG streams segregated by concern, derived from one user seed.
///
/// Keeping the wheel and question streams apart means that changing how many
/// draws a question consumes never perturbs which rime the wheel lands on.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    wheel: CountingRng<ChaCha20Rng>,
    question: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            wheel: CountingRng::new(derive_stream_seed(seed, b"wheel")),
            question: CountingRng::new(derive_stream_seed(seed, b"question")),
        }
    }

    /// Seed the bundle from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used to choose where the wheel lands.
    pub fn wheel(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.wheel
    }

    /// Stream used to pick answers, distractors and choice order.
    pub fn question(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.question
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// HMAC-SHA256 of the domain tag keyed by the user seed, truncated to 64 bits.
fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        // HMAC accepts keys of any length; keep the raw seed if that ever changes.
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
