//! A deterministic pseudo-random byte generator reproducing the legacy
//! "SHA1PRNG" algorithm: seed bytes are hashed with SHA-1, and the resulting
//! seed state is expanded into an arbitrarily long byte stream by hashing it
//! together with a 64 bit counter.
//!
//! **This generator is not cryptographically secure.** The algorithm is
//! historically weak: its counter is hashed in the clear, and some analyses
//! recover internal state from its output. This crate reproduces its exact
//! external behavior for interoperability with systems that depend on it. Do
//! not use it for new designs.
//!
//! # Usage
//! Create an instance with [`Sha1Prng::new`] (or [`Sha1Prng::with_entropy`]
//! for a custom [`EntropySource`]), feed it seed material with
//! [`Sha1Prng::seed`] and fill buffers with [`Sha1Prng::next_bytes`], or
//! obtain an array with [`Sha1Prng::get_random_bytes`].
//!
//! # Examples
//! Reproducible output from a fixed seed:
//! ```
//! use sha1_prng::Sha1Prng;
//!
//! let mut a = Sha1Prng::new();
//! let mut b = Sha1Prng::new();
//! a.seed(b"fixed seed");
//! b.seed(b"fixed ");
//! b.seed(b"seed");
//!
//! let mut out = [0u8; 50];
//! a.next_bytes(&mut out).unwrap();
//! assert_eq!(out, b.get_random_bytes::<50>().unwrap());
//! ```
//!
//! Without a seed, the generator seeds itself from the OS RNG on first use:
//! ```
//! use sha1_prng::Sha1Prng;
//!
//! let mut rng = Sha1Prng::new();
//! let bytes = rng.get_random_bytes::<20>().unwrap();
//! ```
//!
//! # Determinism & Portability
//! Unlike many PRNGs, the output is fully portable: it is defined in terms of
//! SHA-1 alone. The `k`-th 20 byte block of output (counting from 0 over the
//! lifetime of the instance) is
//!
//! ```text
//! SHA-1(seed bytes absorbed so far || big-endian u64 k)
//! ```
//!
//! Calling [`Sha1Prng::seed`] again appends to the seed material. The counter
//! keeps running, and undelivered bytes of the current block are dropped.
//!
//! # Crate Features
//! - `getrandom` (default): Enable dependency on the [`getrandom` crate]. This
//!   provides [`OsEntropy`], used for self-seeding by [`Sha1Prng::new`].
//! - `rand-core`: Enable dependency on the [`rand_core` crate]. This enables
//!   implementations of `RngCore` and `SeedableRng` for [`Sha1Prng`], and
//!   [`RngEntropy`]. `CryptoRng` is deliberately not implemented.
//!
//! # Design
//! The generator keeps an unfinished SHA-1 computation over all seed bytes:
//! the chaining value over completed 64 byte blocks, plus the partially
//! filled block, held as 16 big-endian words, and the total seed length.
//!
//! When output is requested after (re)seeding, that state is finalized once:
//! the chaining value and the partial block are copied, and the SHA-1
//! padding is laid out around the 8 counter bytes each round will append.
//! Every round then packs the counter and the `0x80` padding flag after the
//! last seed byte, compresses, and emits the 20 byte digest.
//!
//! With `b` seed bytes pending in the partial block, the tail needs 17 bytes
//! (8 counter bytes, the flag and the 8 byte length). For `b < 48` a single
//! block suffices; otherwise the length goes into a second block:
//!
//! ```ascii
//!  b < 48:   │ seed (b) │ counter (8) │ 80 │ 00 .. 00 │ bit length (8) │
//!            └───────────────────────── block ─────────────────────────┘
//!
//!  b >= 48:  │ seed (b) │ counter and 80, as far as they fit │
//!            └─────────────────── block ───────────────────┘
//!            │ rest of counter and 80, if any │ 00 .. 00 │ bit length (8) │
//!            └────────────────────── second block ──────────────────────┘
//! ```
//!
//! The bit length is `8 * (seed length + 8)`, so each round is a standard
//! SHA-1 digest.
//!
//! [`getrandom` crate]: https://crates.io/crates/getrandom
//! [`rand_core` crate]: https://crates.io/crates/rand_core
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]
#![forbid(unsafe_code)]
#![deny(future_incompatible, rust_2018_idioms)]
#![warn(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

#[cfg(test)]
extern crate alloc;

const WORD_BYTES: usize = 4;
const FRAME_WORDS: usize = 16;
const FRAME_BYTES: usize = FRAME_WORDS * WORD_BYTES;
const DIGEST_WORDS: usize = 5;
const COUNTER_BYTES: usize = 8;
const LENGTH_BYTES: usize = 8;
const PADDING_FLAG: u8 = 0x80;
/// Pending byte counts below this leave room for the counter, the padding
/// flag and the length trailer in the same block.
const SINGLE_BLOCK_LIMIT: usize = FRAME_BYTES - COUNTER_BYTES - LENGTH_BYTES;

/// Number of output bytes produced per round, and the size of the self-seed.
pub const DIGEST_BYTES: usize = DIGEST_WORDS * WORD_BYTES;

#[allow(clippy::assertions_on_constants)]
const _: () = assert!(DIGEST_BYTES == 20 && SINGLE_BLOCK_LIMIT == 48);

/// Packing of bytes into big-endian words at arbitrary byte offsets.
mod packing;

/// Module containing the seed frame, the SHA-1 chaining value and the seed
/// accumulator built from them.
mod internal_state;
use internal_state::SeedState;

/// Finalization of the seed state and the counter rounds.
mod expansion;
use expansion::{Expansion, OutputCarry};

mod entropy;
pub use entropy::EntropySource;
#[cfg(feature = "getrandom")]
pub use entropy::OsEntropy;
#[cfg(feature = "rand-core")]
pub use entropy::RngEntropy;

mod error;
pub use error::Error;

/// Where the generator is in its seed/output cycle.
enum EngineState {
    /// Nothing absorbed yet; output will self-seed from the entropy source.
    Uninitialized,
    /// Seed material absorbed since the last finalization.
    Seeded,
    /// Finalized; output is expanded from this snapshot.
    Expanding(Expansion),
}

/// The SHA1PRNG generator.
///
/// Deterministic given its seed material, and portable. Not safe for
/// concurrent use; every operation takes `&mut self`.
///
/// # Examples
/// ```
/// use sha1_prng::Sha1Prng;
///
/// let mut rng = Sha1Prng::new();
/// rng.seed(b"seed material");
/// let mut buf = [0u8; 33];
/// rng.next_bytes(&mut buf).unwrap();
/// ```
pub struct Sha1Prng<E> {
    seed_state: SeedState,
    counter: u64,
    carry: OutputCarry,
    engine: EngineState,
    entropy: E,
}

impl<E: EntropySource> Sha1Prng<E> {
    /// Create a new unseeded instance. If output is requested before any call
    /// to [`Self::seed`], 20 bytes from `entropy` are used as seed.
    pub fn with_entropy(entropy: E) -> Self {
        Self {
            seed_state: SeedState::new(),
            counter: 0,
            carry: OutputCarry::empty(),
            engine: EngineState::Uninitialized,
            entropy,
        }
    }

    /// Append `seed` to the seed material. Can be called at any time; the
    /// next output request refinalizes the seed and drops undelivered bytes
    /// of the current round. An empty `seed` does nothing at all.
    pub fn seed(&mut self, seed: &[u8]) {
        if seed.is_empty() {
            return;
        }
        if let EngineState::Expanding(_) = self.engine {
            log::trace!("reseeding, pending output discarded");
        }
        self.seed_state.absorb(seed);
        self.carry.discard();
        self.engine = EngineState::Seeded;
    }

    /// Append 20 bytes from the OS RNG to the seed material.
    #[cfg(feature = "getrandom")]
    #[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
    pub fn seed_with_getrandom(&mut self) -> Result<(), Error> {
        let mut buffer = zeroize::Zeroizing::new([0u8; DIGEST_BYTES]);
        getrandom::fill(&mut buffer[..])?;
        self.seed(&buffer[..]);
        Ok(())
    }

    /// Fill `dest` with pseudo-random bytes.
    ///
    /// Fails only if the generator was never seeded and its entropy source
    /// fails; the generator is left untouched in that case. An empty `dest`
    /// is a no-op and never consults the entropy source.
    pub fn next_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        if dest.is_empty() {
            return Ok(());
        }
        self.ensure_expanding()?;

        let Self {
            counter,
            carry,
            engine,
            ..
        } = self;
        if let EngineState::Expanding(expansion) = engine {
            let mut written = carry.take_into(dest);
            while written < dest.len() {
                carry.refill(expansion.round(*counter));
                *counter = counter.wrapping_add(1);
                written += carry.take_into(&mut dest[written..]);
            }
        }
        Ok(())
    }

    /// Output an array `[u8; N]` filled with pseudo-random bytes.
    pub fn get_random_bytes<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut out = [0; N];
        self.next_bytes(&mut out)?;
        Ok(out)
    }

    /// Finalize the seed state unless that already happened since the last
    /// seed call, seeding from the entropy source first if nothing was seeded.
    fn ensure_expanding(&mut self) -> Result<(), Error> {
        match self.engine {
            EngineState::Expanding(_) => return Ok(()),
            EngineState::Uninitialized => self.self_seed()?,
            EngineState::Seeded => {}
        }
        self.carry.discard();
        self.engine = EngineState::Expanding(Expansion::begin(&self.seed_state));
        Ok(())
    }

    fn self_seed(&mut self) -> Result<(), Error> {
        log::debug!("no seed supplied, seeding from entropy source");
        let mut buffer = zeroize::Zeroizing::new([0u8; DIGEST_BYTES]);
        self.entropy.fill_entropy(&mut buffer[..])?;
        self.seed(&buffer[..]);
        Ok(())
    }
}

#[cfg(feature = "getrandom")]
impl Sha1Prng<OsEntropy> {
    /// Create a new unseeded instance that seeds itself from the OS RNG if
    /// output is requested before any call to [`Self::seed`].
    pub fn new() -> Self {
        Self::with_entropy(OsEntropy)
    }

    /// Create a new instance, seeded with 20 bytes from the OS RNG.
    #[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
    pub fn new_from_getrandom() -> Result<Self, Error> {
        let mut rng = Self::new();
        rng.seed_with_getrandom()?;
        Ok(rng)
    }
}

impl<E: EntropySource + Default> Default for Sha1Prng<E> {
    fn default() -> Self {
        Self::with_entropy(E::default())
    }
}

#[cfg(feature = "rand-core")]
mod rng_traits {
    use super::{EntropySource, Sha1Prng, DIGEST_BYTES};
    use rand_core::{impls, RngCore, SeedableRng};

    #[cfg_attr(docsrs, doc(cfg(feature = "rand-core")))]
    impl<E: EntropySource> RngCore for Sha1Prng<E> {
        fn next_u32(&mut self) -> u32 {
            impls::next_u32_via_fill(self)
        }

        fn next_u64(&mut self) -> u64 {
            impls::next_u64_via_fill(self)
        }

        /// Equivalent to [`Sha1Prng::next_bytes`].
        ///
        /// # Panics
        /// If the generator was never seeded and its entropy source fails.
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            if let Err(err) = self.next_bytes(dest) {
                panic!("SHA1PRNG self-seeding failed: {err}");
            }
        }
    }

    #[cfg_attr(docsrs, doc(cfg(feature = "rand-core")))]
    impl<E: EntropySource + Default> SeedableRng for Sha1Prng<E> {
        type Seed = [u8; DIGEST_BYTES];

        /// Equivalent to a fresh instance followed by [`Sha1Prng::seed`].
        fn from_seed(seed: Self::Seed) -> Self {
            let mut rng = Self::default();
            rng.seed(&seed);
            rng
        }
    }
}
