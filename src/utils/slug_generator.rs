//! Random slug generation.

use rand::Rng;

/// Length of generated slugs.
pub const SLUG_LENGTH: usize = 5;

/// URL-safe alphabet for generated slugs.
///
/// Lowercase only, so a generated slug is already in its stored form.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of fresh slugs.
///
/// Generation has no side effects; collision handling belongs to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait SlugGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generates fixed-length random slugs from the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomSlugGenerator {
    length: usize,
}

impl RandomSlugGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomSlugGenerator {
    fn default() -> Self {
        Self::new(SLUG_LENGTH)
    }
}

impl SlugGenerator for RandomSlugGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();

        (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}
