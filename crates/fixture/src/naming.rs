//! Collision-resistant random name generation
//!
//! Names are drawn uniformly from uppercase letters, lowercase letters, and
//! digits. Uniqueness is never assumed: the factory resolves collisions
//! empirically by drawing a fresh candidate, so generation must stay cheap
//! enough to call once per retry attempt.

/// Characters a generated name is drawn from
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default generated-name length
pub const DEFAULT_NAME_LEN: usize = 16;

/// Generate a random alphanumeric name of the given length.
///
/// Constrained-namespace resources typically pass a shorter length (e.g. 8).
#[must_use]
pub fn make_random(len: usize) -> String {
    (0..len).map(|_| fastrand::alphanumeric()).collect()
}

/// Seedable name generator for deterministic tests.
///
/// Production code uses [`make_random`]; this exists so tests can pin the
/// random stream.
#[derive(Debug)]
pub struct NameGenerator {
    rng: fastrand::Rng,
}

impl NameGenerator {
    /// Create a generator seeded from entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Create a generator with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Draw a random alphanumeric name of the given length.
    pub fn generate(&mut self, len: usize) -> String {
        (0..len).map(|_| self.rng.alphanumeric()).collect()
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}
