//! Object identifier generation.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Number of random bytes in an identifier (24 hexadecimal digits).
const ID_BYTES: usize = 12;

/// Produces fresh 24-digit uppercase hexadecimal identifiers.
///
/// Each [`Document`](crate::Document) owns its own generator; uniqueness is
/// checked against that document only.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// A generator seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A deterministic generator, for reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One random candidate, not checked against anything.
    pub fn candidate(&mut self) -> String {
        let mut bytes = [0u8; ID_BYTES];
        self.rng.fill_bytes(&mut bytes);
        hex::encode_upper(bytes)
    }

    /// Draw candidates until one is not `taken`.
    pub fn generate(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.candidate();
            if !taken(&id) {
                return id;
            }
            tracing::trace!(%id, "identifier collision, drawing again");
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
