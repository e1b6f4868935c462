//! Seeds and the per-run random stream.
//!
//! Every generation run owns one [`StdRng`] built from a [`Seed`]; stages borrow it
//! mutably in a fixed order. The helpers below turn raw `u32`/`u64` draws into the
//! ranges the generator needs so that the sequence of draws stays explicit.
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generation seed given either as a number or as free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Seed {
    Number(u64),
    Text(String),
}

impl Seed {
    /// Numeric value used to seed the stream.
    ///
    /// Text that parses as an unsigned integer maps to that integer, so `"42"` and
    /// `42` produce the same settlement. Other text is hashed with FNV-1a.
    pub fn value(&self) -> u64 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(text) => text
                .trim()
                .parse::<u64>()
                .unwrap_or_else(|_| stable_hash(text.as_bytes())),
        }
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Seed::Number(value)
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Number(value as u64)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Seed::Text(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{n}"),
            Seed::Text(t) => write!(f, "{t:?}"),
        }
    }
}

/// Deterministic stream for one generation run.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// 64-bit FNV-1a; stable across platforms and releases.
pub fn stable_hash(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, b| (h ^ *b as u64).wrapping_mul(PRIME))
}

/// Derive an independent seed from `seed` and a label.
pub fn derive_seed(seed: u64, label: &str) -> u64 {
    let mut bytes = seed.to_le_bytes().to_vec();
    bytes.extend_from_slice(label.as_bytes());
    stable_hash(&bytes)
}

/// Uniform float in `[0, 1)`.
#[inline]
pub fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Uniform float in `[lo, hi)`.
#[inline]
pub fn range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + rand01(rng) * (hi - lo)
}

/// Uniform float in `[-amount, amount)`.
#[inline]
pub fn symmetric<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    range(rng, -amount, amount)
}

/// `value` scaled by a uniform factor in `[1 - fraction, 1 + fraction)`.
#[inline]
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, value: f32, fraction: f32) -> f32 {
    value * (1.0 + symmetric(rng, fraction))
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub fn index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0, "index over empty range");
    (rng.next_u64() % len as u64) as usize
}

/// Uniform integer in `lo..=hi`.
#[inline]
pub fn int_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: usize, hi: usize) -> usize {
    if hi <= lo {
        return lo;
    }
    lo + index(rng, hi - lo + 1)
}

/// True with probability `p`.
#[inline]
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rand01(rng) < p
}

/// Uniformly chosen element, `None` for an empty slice.
pub fn choose<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[index(rng, items.len())])
    }
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = index(rng, i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Returns the same word forever.
    pub(crate) struct FixedRng {
        pub value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = std::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_stays_below_one() {
        let mut rng = FixedRng { value: u32::MAX };
        let v = rand01(&mut rng);
        assert!(v < 1.0);
        assert!(v > 0.999);
        let mut zero = FixedRng { value: 0 };
        assert_eq!(rand01(&mut zero), 0.0);
    }

    #[test]
    fn numeric_text_matches_number() {
        assert_eq!(Seed::from("42").value(), Seed::from(42u64).value());
        assert_eq!(Seed::from(" 7 ").value(), 7);
        assert_ne!(Seed::from("oakvale").value(), Seed::from("oakdale").value());
        assert_eq!(
            Seed::from("oakvale").value(),
            Seed::from(String::from("oakvale")).value()
        );
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(stable_hash(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn int_inclusive_covers_both_ends() {
        let mut rng = seeded_rng(9);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = int_inclusive(&mut rng, 2, 4);
            assert!((2..=4).contains(&v));
            seen[v - 2] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(int_inclusive(&mut rng, 5, 5), 5);
    }

    #[test]
    fn shuffle_is_a_permutation_and_deterministic() {
        let mut a: Vec<u32> = (0..16).collect();
        let mut b = a.clone();
        shuffle(&mut seeded_rng(3), &mut a);
        shuffle(&mut seeded_rng(3), &mut b);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn choose_handles_empty() {
        let mut rng = seeded_rng(1);
        let empty: [u8; 0] = [];
        assert!(choose(&mut rng, &empty).is_none());
        assert_eq!(choose(&mut rng, &[5]), Some(&5));
    }

    #[test]
    fn jitter_stays_within_fraction() {
        let mut rng = seeded_rng(11);
        for _ in 0..100 {
            let v = jitter(&mut rng, 10.0, 0.1);
            assert!((9.0..11.0).contains(&v));
        }
    }
}
