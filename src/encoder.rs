//! Gamma encoding of ranked choices into integers.
//!
//! A choice of `k` options out of `n` is encoded in a mixed-radix system over falling
//! factorials: all selections with fewer than `k` entries come first (`offsets`), and
//! within length `k` the digits are weighted by `factor(b, i)` with `b = n - k`.
//!
//! The code is a bijection over *relative* digit sequences, where digit `j` counts among
//! the options not chosen by digits `0..j` and thus lies in `[0, n - j)`. Ranked lists of
//! absolute option indices go through [`to_relative_answers()`] first;
//! [`GammaEncoder::encode_ranking()`] does this in one step.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Result, ZeusError};
use crate::types::Choice;

/// Default number of entries each memo table may hold before it is cleared
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

/// Encoder between choices and plaintext integers
pub trait ChoiceEncoder {
    /// Encodes `choices` made among `nr_options` options.
    ///
    /// Each choice is read as an index into the options still left after the earlier
    /// choices, and `decode` returns choices in that relative form. A ranking of absolute
    /// option indices therefore does not come back from `decode(encode(..))` unchanged;
    /// use [`GammaEncoder::encode_ranking()`] and [`GammaEncoder::decode_ranking()`] for
    /// those.
    fn encode(&self, choices: &[usize], nr_options: usize) -> Result<BigUint>;

    /// Decodes a value produced by [`Self::encode()`] with the same `nr_options`.
    fn decode(&self, value: &BigUint, nr_options: usize) -> Result<Choice>;
}

/// Memo tables for the falling-factorial terms used by [`GammaEncoder`].
///
/// Each table is cleared once it reaches `capacity` entries.
#[derive(Clone, Debug)]
pub struct GammaCache {
    capacity: usize,
    /// `(n, k)` -> `n! / k!`
    terms: HashMap<(usize, usize), BigUint>,
    /// `(b, i)` -> `(b + 1) * ... * (b + i - 1)`
    factors: HashMap<(usize, usize), BigUint>,
    /// `n` -> cumulative counts of selections of size `0..=n`
    offsets: HashMap<usize, Arc<Vec<BigUint>>>,
}

impl Default for GammaCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl GammaCache {
    pub fn with_capacity(capacity: usize) -> Self {
        GammaCache {
            capacity: capacity.max(1),
            terms: HashMap::new(),
            factors: HashMap::new(),
            offsets: HashMap::new(),
        }
    }

    /// Total number of memoized entries
    pub fn len(&self) -> usize {
        self.terms.len() + self.factors.len() + self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.terms.clear();
        self.factors.clear();
        self.offsets.clear();
    }

    fn insert<K: std::hash::Hash + Eq, V>(map: &mut HashMap<K, V>, capacity: usize, key: K, value: V) {
        if map.len() >= capacity {
            log::debug!("gamma cache table reached {capacity} entries, clearing");
            map.clear();
        }
        map.insert(key, value);
    }

    /// `term(n, k) = n * (n - 1) * ... * (k + 1)`, or 1 if `k >= n`
    fn term(&mut self, n: usize, k: usize) -> BigUint {
        if k >= n {
            return BigUint::one();
        }
        if let Some(term) = self.terms.get(&(n, k)) {
            return term.clone();
        }

        // Walk up to the closest memoized term(n, m) with m > k
        let mut m = k + 1;
        let mut term = loop {
            if m >= n {
                break BigUint::one();
            }
            if let Some(term) = self.terms.get(&(n, m)) {
                break term.clone();
            }
            m += 1;
        };
        while m > k {
            term *= m;
            m -= 1;
            Self::insert(&mut self.terms, self.capacity, (n, m), term.clone());
        }
        term
    }

    /// `factor(b, i) = (b + 1) * (b + 2) * ... * (b + i - 1)`, or 1 if `i <= 1`
    fn factor(&mut self, b: usize, i: usize) -> BigUint {
        if i <= 1 {
            return BigUint::one();
        }
        if let Some(factor) = self.factors.get(&(b, i)) {
            return factor.clone();
        }

        // Walk down to the closest memoized factor(b, j) with j < i
        let mut j = i - 1;
        let mut factor = loop {
            if j <= 1 {
                j = 1;
                break BigUint::one();
            }
            if let Some(factor) = self.factors.get(&(b, j)) {
                break factor.clone();
            }
            j -= 1;
        };
        while j < i {
            factor *= BigUint::from(b) + j;
            j += 1;
            Self::insert(&mut self.factors, self.capacity, (b, j), factor.clone());
        }
        factor
    }

    /// `offsets(n)[i]`: number of ordered selections of at most `i` options out of `n`
    fn offsets(&mut self, n: usize) -> Arc<Vec<BigUint>> {
        if let Some(offsets) = self.offsets.get(&n) {
            return Arc::clone(offsets);
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut sum = BigUint::zero();
        for i in 0..=n {
            sum += self.term(n, n - i);
            offsets.push(sum.clone());
        }
        let offsets = Arc::new(offsets);
        Self::insert(&mut self.offsets, self.capacity, n, Arc::clone(&offsets));
        offsets
    }
}

/// Zeus gamma encoder with an owned, thread-safe memo cache.
#[derive(Debug, Default)]
pub struct GammaEncoder {
    cache: Mutex<GammaCache>,
}

impl GammaEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_cache(GammaCache::with_capacity(capacity))
    }

    /// Creates an encoder around an existing (e.g. pre-warmed or isolated) cache.
    pub fn with_cache(cache: GammaCache) -> Self {
        GammaEncoder {
            cache: Mutex::new(cache),
        }
    }

    /// Number of entries currently memoized
    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Encodes a ranked list of distinct absolute option indices.
    pub fn encode_ranking(&self, choices: &[usize], nr_options: usize) -> Result<BigUint> {
        let relative = to_relative_answers(choices, nr_options)?;
        Ok(self.gamma_encode(&relative, nr_options))
    }

    /// Inverse of [`Self::encode_ranking()`].
    pub fn decode_ranking(&self, value: &BigUint, nr_options: usize) -> Result<Choice> {
        let relative = self.decode(value, nr_options)?;
        to_absolute_answers(&relative, nr_options)
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, GammaCache> {
        // The cache only holds derived values, so a poisoned lock is still usable
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn gamma_encode(&self, digits: &[usize], nr_options: usize) -> BigUint {
        if nr_options == 0 || digits.is_empty() {
            return BigUint::zero();
        }

        let k = digits.len();
        let b = nr_options - k;
        let mut cache = self.lock_cache();
        let offsets = cache.offsets(nr_options);

        let mut sum = offsets[k - 1].clone();
        for (i, &digit) in (1..=k).zip(digits.iter().rev()) {
            sum += cache.factor(b, i) * digit;
        }
        sum
    }
}

impl ChoiceEncoder for GammaEncoder {
    /// Raw gamma encoding of relative digits; see [`ChoiceEncoder::encode()`].
    ///
    /// # Errors
    ///
    /// `EncodingOutOfRange` if more choices than options are given or an index repeats.
    fn encode(&self, choices: &[usize], nr_options: usize) -> Result<BigUint> {
        if choices.len() > nr_options {
            return Err(ZeusError::EncodingOutOfRange(format!(
                "{} choices exceed {} options",
                choices.len(),
                nr_options
            )));
        }
        let mut seen = HashSet::with_capacity(choices.len());
        if let Some(duplicate) = choices.iter().find(|&&choice| !seen.insert(choice)) {
            return Err(ZeusError::EncodingOutOfRange(format!(
                "choice {duplicate} appears more than once"
            )));
        }
        Ok(self.gamma_encode(choices, nr_options))
    }

    /// # Errors
    ///
    /// `EncodingOutOfRange` if `value` is not below the number of all encodable choices.
    fn decode(&self, value: &BigUint, nr_options: usize) -> Result<Choice> {
        if value.is_zero() {
            return Ok(Vec::new());
        }

        let mut cache = self.lock_cache();
        let offsets = cache.offsets(nr_options);
        let k = bisect_right(&offsets, value, 1);
        if k > nr_options {
            return Err(ZeusError::EncodingOutOfRange(format!(
                "value does not encode a choice among {nr_options} options"
            )));
        }

        let mut remainder = value - &offsets[k - 1];
        let b = nr_options - k;
        let mut choices = Vec::with_capacity(k);
        for i in (1..=k).rev() {
            let (digit, rest) = remainder.div_rem(&cache.factor(b, i));
            let digit = digit.to_usize().ok_or_else(|| {
                ZeusError::EncodingOutOfRange("decoded choice does not fit an index".to_string())
            })?;
            choices.push(digit);
            remainder = rest;
        }
        Ok(choices)
    }
}

/// Index at which `x` would be inserted into the sorted `sorted[lo..]`, after any equal entries
fn bisect_right(sorted: &[BigUint], x: &BigUint, lo: usize) -> usize {
    let (mut lo, mut hi) = (lo, sorted.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if x < &sorted[mid] {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Converts distinct absolute option indices into relative digits, each counted among
/// the options not chosen before it.
///
/// # Errors
///
/// `EncodingOutOfRange` for an index `>= nr_options`, a repeated index, or more choices
/// than options.
pub fn to_relative_answers(choices: &[usize], nr_options: usize) -> Result<Choice> {
    if choices.len() > nr_options {
        return Err(ZeusError::EncodingOutOfRange(format!(
            "{} choices exceed {} options",
            choices.len(),
            nr_options
        )));
    }
    let mut remaining: Vec<usize> = (0..nr_options).collect();
    choices
        .iter()
        .map(|&choice| {
            let index = remaining.binary_search(&choice).map_err(|_| {
                ZeusError::EncodingOutOfRange(format!(
                    "choice {choice} is repeated or not below {nr_options}"
                ))
            })?;
            remaining.remove(index);
            Ok(index)
        })
        .collect()
}

/// Inverse of [`to_relative_answers()`].
pub fn to_absolute_answers(relative: &[usize], nr_options: usize) -> Result<Choice> {
    let mut remaining: Vec<usize> = (0..nr_options).collect();
    relative
        .iter()
        .map(|&index| {
            if index >= remaining.len() {
                return Err(ZeusError::EncodingOutOfRange(format!(
                    "relative choice {index} exceeds {} remaining options",
                    remaining.len()
                )));
            }
            Ok(remaining.remove(index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const FIRST_HUNDRED_OF_300: &str = "131cf3263a45182a2186f53a6beae088cc27ac4919969aaedf466760b2c30850705dff5d87f5e9324901382a6b3fd5a61fecfe506f5bbd117ad2c62ec5f555c24c2839038291ebfc1316817973c7ebe47ef1e252dd4d8dcd5ee8d6deec17671ad4db08";

    #[test]
    fn test_reference_vectors() {
        let encoder = GammaEncoder::new();
        assert_eq!(encoder.encode(&[1, 2], 2).unwrap(), BigUint::from(6u32));
        assert_eq!(
            encoder.encode(&[150, 10, 125], 300).unwrap(),
            BigUint::from(13_458_406u32)
        );

        let first_hundred: Vec<usize> = (0..100).collect();
        let encoded = encoder.encode(&first_hundred, 300).unwrap();
        assert_eq!(format!("{encoded:x}"), FIRST_HUNDRED_OF_300);
        assert_eq!(encoder.decode(&encoded, 300).unwrap(), first_hundred);
    }

    #[test]
    fn test_empty_choice() {
        let encoder = GammaEncoder::new();
        for n in [0, 1, 2, 10, 300] {
            assert_eq!(encoder.encode(&[], n).unwrap(), BigUint::zero());
            assert!(encoder.decode(&BigUint::zero(), n).unwrap().is_empty());
        }
    }

    #[test]
    fn test_single_choices() {
        let encoder = GammaEncoder::new();
        for choice in 0..5 {
            let encoded = encoder.encode(&[choice], 5).unwrap();
            assert_eq!(encoded, BigUint::from(choice + 1));
            assert_eq!(encoder.decode(&encoded, 5).unwrap(), vec![choice]);
        }
    }

    #[test]
    fn test_invalid_choices() {
        let encoder = GammaEncoder::new();
        assert!(matches!(
            encoder.encode(&[0, 1, 2], 2),
            Err(ZeusError::EncodingOutOfRange(_))
        ));
        assert!(matches!(
            encoder.encode(&[3, 3], 5),
            Err(ZeusError::EncodingOutOfRange(_))
        ));
        assert!(encoder.encode(&[0], 0).is_err());
    }

    #[test]
    fn test_decode_rejects_out_of_range_values() {
        let encoder = GammaEncoder::new();
        // 5 options admit 1 + 5 + 20 + 60 + 120 + 120 = 326 selections, encoded as 0..326
        let last = encoder.encode_ranking(&[4, 3, 2, 1, 0], 5).unwrap();
        assert_eq!(last, BigUint::from(325u32));
        assert_eq!(encoder.decode_ranking(&last, 5).unwrap(), vec![4, 3, 2, 1, 0]);
        assert!(matches!(
            encoder.decode(&BigUint::from(326u32), 5),
            Err(ZeusError::EncodingOutOfRange(_))
        ));
        assert!(encoder.decode(&BigUint::one(), 0).is_err());
    }

    #[test]
    fn test_encoding_is_a_bijection_on_small_sets() {
        let encoder = GammaEncoder::new();
        let n = 4;
        // 1 + 4 + 12 + 24 + 24 selections
        let total = 65u32;
        let mut seen = HashSet::new();
        for value in 0..total {
            let value = BigUint::from(value);
            let ranking = encoder.decode_ranking(&value, n).unwrap();
            assert_eq!(encoder.encode_ranking(&ranking, n).unwrap(), value);
            assert!(seen.insert(ranking));
        }
    }

    #[test]
    fn test_ranking_round_trip() {
        let encoder = GammaEncoder::new();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(1..40);
            let k = rng.gen_range(0..=n);
            let mut options: Vec<usize> = (0..n).collect();
            options.shuffle(&mut rng);
            let ranking = &options[..k];

            let encoded = encoder.encode_ranking(ranking, n).unwrap();
            assert_eq!(encoder.decode_ranking(&encoded, n).unwrap(), ranking);
        }
    }

    #[test]
    fn test_raw_encoding_reads_relative_digits() {
        let encoder = GammaEncoder::new();
        // the ranking 2 > 0 > 1 is not its own digit sequence
        let raw = encoder.encode(&[2, 0, 1], 3).unwrap();
        assert_eq!(raw, BigUint::from(15u32));
        assert_eq!(encoder.decode(&raw, 3).unwrap(), vec![2, 1, 0]);

        // its relative digits are [2, 0, 0]
        let ranked = encoder.encode_ranking(&[2, 0, 1], 3).unwrap();
        assert_eq!(ranked, BigUint::from(14u32));
        assert_eq!(encoder.decode(&ranked, 3).unwrap(), vec![2, 0, 0]);
        assert_eq!(encoder.decode_ranking(&ranked, 3).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn test_relative_answers() {
        assert_eq!(to_relative_answers(&[2, 0, 1], 3).unwrap(), vec![2, 0, 0]);
        assert_eq!(to_absolute_answers(&[2, 0, 0], 3).unwrap(), vec![2, 0, 1]);
        assert!(to_relative_answers(&[3], 3).is_err());
        assert!(to_relative_answers(&[1, 1], 3).is_err());
        assert!(to_absolute_answers(&[0, 2], 2).is_err());
    }

    #[test]
    fn test_cache_is_bounded_and_injectable() {
        let encoder = GammaEncoder::with_capacity(8);
        let first_hundred: Vec<usize> = (0..100).collect();
        let bounded = encoder.encode(&first_hundred, 300).unwrap();
        // each of the three tables holds at most 8 entries
        assert!(encoder.cached_entries() <= 24);
        assert_eq!(
            bounded,
            GammaEncoder::new().encode(&first_hundred, 300).unwrap()
        );

        encoder.clear_cache();
        assert_eq!(encoder.cached_entries(), 0);

        let isolated = GammaEncoder::with_cache(GammaCache::default());
        isolated.encode(&[1, 2], 2).unwrap();
        assert!(isolated.cached_entries() > 0);
    }

    #[test]
    fn test_encoder_is_shareable_across_threads() {
        let encoder = Arc::new(GammaEncoder::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let encoder = Arc::clone(&encoder);
                std::thread::spawn(move || {
                    let ranking: Vec<usize> = (t..t + 10).collect();
                    let encoded = encoder.encode_ranking(&ranking, 50).unwrap();
                    assert_eq!(encoder.decode_ranking(&encoded, 50).unwrap(), ranking);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
