use crate::Error;

/// A source of fresh, unpredictable bytes.
///
/// [`Sha1Prng`](crate::Sha1Prng) consults it once, to seed itself when output
/// is requested before any seed material was supplied.
pub trait EntropySource {
    /// Entirely fill `dest` with unpredictable bytes.
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Error>;
}

impl<E: EntropySource + ?Sized> EntropySource for &mut E {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        (**self).fill_entropy(dest)
    }
}

/// The OS RNG (e.g. the `getrandom` syscall on linux), via the
/// [`getrandom` crate](https://crates.io/crates/getrandom).
#[cfg(feature = "getrandom")]
#[cfg_attr(docsrs, doc(cfg(feature = "getrandom")))]
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

#[cfg(feature = "getrandom")]
impl EntropySource for OsEntropy {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        getrandom::fill(dest)?;
        Ok(())
    }
}

/// Use any [`rand_core::RngCore`] as entropy source. It should be a
/// cryptographically secure RNG.
#[cfg(feature = "rand-core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand-core")))]
#[derive(Clone, Debug, Default)]
pub struct RngEntropy<R>(pub R);

#[cfg(feature = "rand-core")]
impl<R: rand_core::RngCore> EntropySource for RngEntropy<R> {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.0.fill_bytes(dest);
        Ok(())
    }
}
