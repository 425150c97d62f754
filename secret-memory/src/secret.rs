use std::fmt;

use rand::{Fill as Randomize, Rng};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Storage for secret key material.
///
/// The storage is wiped when the value is dropped and whenever it is
/// re-randomized. [fmt::Debug] never reveals the contents.
///
/// # Examples
///
/// ```
/// use fastopen_secret_memory::Secret;
///
/// let zero = Secret::<16>::zero();
/// assert_eq!(zero.secret(), &[0u8; 16]);
///
/// let copy = Secret::<16>::from_slice(&[0x13; 16]);
/// assert_eq!(copy.secret(), &[0x13; 16]);
/// assert_eq!(format!("{copy:?}"), "<SECRET>");
/// ```
pub struct Secret<const N: usize> {
    storage: [u8; N],
}

impl<const N: usize> Secret<N> {
    /// Returns a new [Secret] that is zero initialized
    pub fn zero() -> Self {
        Self { storage: [0u8; N] }
    }

    /// Returns a new [Secret] holding a copy of `slice`
    ///
    /// Panics if `slice` is not exactly `N` bytes long; callers validate
    /// untrusted lengths before constructing a secret.
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut new_self = Self::zero();
        new_self.secret_mut().copy_from_slice(slice);
        new_self
    }

    /// Returns a new [Secret] filled from the thread-local CSPRNG
    pub fn random() -> Self {
        let mut new_self = Self::zero();
        new_self.randomize();
        new_self
    }

    /// Overwrites an existing [Secret] with fresh random bytes
    pub fn randomize(&mut self) {
        self.try_fill(&mut rand::thread_rng()).unwrap()
    }

    /// Borrows the data
    pub fn secret(&self) -> &[u8; N] {
        &self.storage
    }

    /// Borrows the data mutably
    pub fn secret_mut(&mut self) -> &mut [u8; N] {
        &mut self.storage
    }
}

impl<const N: usize> Randomize for Secret<N> {
    fn try_fill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), rand::Error> {
        // Wipe first so the zeroize barriers apply even if the fill
        // below is interrupted by a panic.
        self.zeroize();
        self.storage.try_fill(rng)
    }
}

impl<const N: usize> ZeroizeOnDrop for Secret<N> {}
impl<const N: usize> Zeroize for Secret<N> {
    fn zeroize(&mut self) {
        self.storage.zeroize()
    }
}

impl<const N: usize> Drop for Secret<N> {
    fn drop(&mut self) {
        self.zeroize()
    }
}

impl<const N: usize> Clone for Secret<N> {
    fn clone(&self) -> Self {
        Self::from_slice(self.secret())
    }
}

/// The Debug implementation of [Secret] does not reveal the secret data,
/// instead a placeholder `<SECRET>` is used
impl<const N: usize> fmt::Debug for Secret<N> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str("<SECRET>")
    }
}
