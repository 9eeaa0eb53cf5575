/// Errors returned by [`Sha1Prng`](crate::Sha1Prng).
///
/// Output generation itself cannot fail. The only runtime error comes from the
/// entropy source consulted when output is requested before any seed was
/// supplied, or when explicitly seeding from the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The entropy source could not deliver seeding material.
    #[error("entropy source failure (os error: {raw_os_error:?})")]
    Entropy {
        /// The OS error code, if the failure came from the OS.
        raw_os_error: Option<i32>,
    },
}

#[cfg(feature = "getrandom")]
impl From<getrandom::Error> for Error {
    fn from(err: getrandom::Error) -> Self {
        Self::Entropy {
            raw_os_error: err.raw_os_error(),
        }
    }
}
