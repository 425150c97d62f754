use std::borrow::Borrow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use rand::{Fill as Randomize, Rng};

use crate::debug::debug_crypto_array;

/// A fixed-size byte value that may be known to the public, such as a
/// derived cookie.
///
/// # Examples
///
/// ```
/// use fastopen_secret_memory::Public;
///
/// let a = Public::new([1u8; 8]);
/// let b = Public::<8>::from_slice(&[1u8; 8]);
/// assert_eq!(a, b);
/// assert_ne!(a, Public::zero());
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Public<const N: usize> {
    pub value: [u8; N],
}

impl<const N: usize> Public<N> {
    /// Create a new [Public] from a byte array
    pub fn new(value: [u8; N]) -> Self {
        Self { value }
    }

    /// Create a new [Public] from a byte slice; panics unless the slice
    /// is exactly `N` bytes long
    pub fn from_slice(value: &[u8]) -> Self {
        let mut new_self = Self::zero();
        new_self.value.copy_from_slice(value);
        new_self
    }

    /// Create a zero initialized [Public]
    pub fn zero() -> Self {
        Self { value: [0u8; N] }
    }

    /// Create a random initialized [Public]
    pub fn random() -> Self {
        let mut new_self = Self::zero();
        new_self.randomize();
        new_self
    }

    /// Randomize all bytes in an existing [Public]
    pub fn randomize(&mut self) {
        self.try_fill(&mut rand::thread_rng()).unwrap()
    }
}

impl<const N: usize> Randomize for Public<N> {
    fn try_fill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), rand::Error> {
        self.value.try_fill(rng)
    }
}

impl<const N: usize> fmt::Debug for Public<N> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        debug_crypto_array(&self.value, fmt)
    }
}

impl<const N: usize> Deref for Public<N> {
    type Target = [u8; N];

    fn deref(&self) -> &[u8; N] {
        &self.value
    }
}

impl<const N: usize> DerefMut for Public<N> {
    fn deref_mut(&mut self) -> &mut [u8; N] {
        &mut self.value
    }
}

impl<const N: usize> Borrow<[u8; N]> for Public<N> {
    fn borrow(&self) -> &[u8; N] {
        &self.value
    }
}

impl<const N: usize> Borrow<[u8]> for Public<N> {
    fn borrow(&self) -> &[u8] {
        &self.value
    }
}
