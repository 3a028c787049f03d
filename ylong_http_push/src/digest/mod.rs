// Copyright (c) 2023 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! [Cache digest] of resources known to a client.
//!
//! [Cache digest]: https://datatracker.ietf.org/doc/html/draft-ietf-httpbis-cache-digest
//!
//! # What is a cache digest
//! A cache digest is a compact and probabilistic summary of the resources a
//! client already holds. Resource identifiers are quantized into a domain of
//! `N * P` integers ([`quantize`]), the sorted set of integers is packed with
//! a Golomb-Rice code of modulus `P` ([`golomb`]), and the bytes travel in a
//! cookie ([`cookie`]).
//!
//! Two different resources may share an integer. The server then believes the
//! client already has both, which only means one of them is not pushed.
//!
//! [`quantize`]: quantize
//! [`golomb`]: golomb
//! [`cookie`]: cookie

pub mod cookie;
pub mod golomb;
mod quantize;

use std::collections::btree_set::Iter;
use std::collections::BTreeSet;

pub use quantize::Quantizer;

use crate::digest::cookie::DigestCookie;
use crate::digest::golomb::{GolombDecodeError, GolombDecoder, GolombEncoder};
use crate::error::PushError;

/// An ordered, duplicate free set of quantized resource identities.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::CacheDigest;
///
/// let digest = CacheDigest::from_values([104, 65, 65]);
/// assert_eq!(digest.len(), 2);
/// assert_eq!(digest.to_cookie(6).value(), "gU4");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheDigest {
    values: BTreeSet<u64>,
}

impl CacheDigest {
    /// Creates a new, empty `CacheDigest`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `CacheDigest` holding `values`.
    pub fn from_values<I: IntoIterator<Item = u64>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Decodes Golomb-Rice coded digest bytes.
    pub fn decode(src: &[u8], decoder: &GolombDecoder) -> Result<Self, GolombDecodeError> {
        decoder.decode(src).map(Self::from_values)
    }

    /// Decodes the textual value of a digest cookie.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::digest::golomb::GolombDecoder;
    /// use ylong_http_push::digest::CacheDigest;
    ///
    /// let digest = CacheDigest::from_cookie_value("gU4", &GolombDecoder::new(6)).unwrap();
    /// assert_eq!(digest.iter().copied().collect::<Vec<_>>(), vec![65, 104]);
    /// ```
    pub fn from_cookie_value(value: &str, decoder: &GolombDecoder) -> Result<Self, PushError> {
        let bytes = cookie::unwrap_value(value)?;
        Ok(Self::decode(&bytes, decoder)?)
    }

    /// Encodes the digest with `fixed_bits` remainder bits.
    pub fn encode(&self, fixed_bits: u32) -> Vec<u8> {
        let values: Vec<u64> = self.values.iter().copied().collect();
        let mut dst = Vec::new();
        GolombEncoder::new(fixed_bits).encode(&values, &mut dst);
        dst
    }

    /// Encodes the digest and wraps it into a `DigestCookie`.
    pub fn to_cookie(&self, fixed_bits: u32) -> DigestCookie {
        DigestCookie::wrap(&self.encode(fixed_bits))
    }

    /// Checks whether `value` is in the digest.
    pub fn contains(&self, value: u64) -> bool {
        self.values.contains(&value)
    }

    /// Adds `value`, returning whether it was absent.
    pub fn insert(&mut self, value: u64) -> bool {
        self.values.insert(value)
    }

    /// Adds every value of `other`.
    pub fn merge(&mut self, other: &CacheDigest) {
        self.values.extend(other.values.iter().copied());
    }

    /// Gets the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks whether the digest holds no value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates the values in ascending order.
    pub fn iter(&self) -> Iter<'_, u64> {
        self.values.iter()
    }
}

impl FromIterator<u64> for CacheDigest {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self::from_values(iter)
    }
}

#[cfg(test)]
mod ut_cache_digest {
    use super::golomb::GolombDecoder;
    use super::{CacheDigest, Quantizer};
    use crate::ErrorKind;

    fn digest_of(resources: &[&str], modulus: u64) -> CacheDigest {
        let quantizer = Quantizer::new(resources.len() as u64 * modulus);
        resources
            .iter()
            .map(|r| quantizer.quantize(r.as_bytes()))
            .collect()
    }

    /// UT test cases for `CacheDigest::to_cookie`.
    ///
    /// # Brief
    /// 1. Quantizes lists of resources with `N` set to the list length.
    /// 2. Converts the digests to cookies.
    /// 3. Checks the cookie values.
    #[test]
    fn ut_cache_digest_to_cookie() {
        macro_rules! cookie_test_case {
            ($resources: expr, $p: expr, $bits: expr => $value: literal) => {
                assert_eq!(digest_of(&$resources, $p).to_cookie($bits).value(), $value);
            };
        }

        cookie_test_case!(["/static/example.js"], 64, 6 => "JA");
        cookie_test_case!(["/js/jquery-1.9.1.min.js", "/assets/style.css"], 64, 6 => "gU4");
        cookie_test_case!(
            [
                "/js/jquery-1.9.1.min.js",
                "/assets/style.css",
                "/static/logo.jpg",
                "/static/cover.jpg",
            ],
            64,
            6 => "gU54MA"
        );
        cookie_test_case!(
            [
                "/js/jquery-1.9.1.min.js",
                "/assets/style.css",
                "/static/logo.jpg",
                "/static/cover.jpg",
            ],
            1024,
            10 => "MMOJEkWo"
        );

        // 20 resources need at least 20 * 7 bits.
        let many: Vec<String> = (1..=20).map(|i| format!("/static/example{i}.jpg")).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        let cookie = digest_of(&many, 64).to_cookie(6);
        assert_eq!(cookie.value(), "FmDhUxQHeuwQYINoQrxmr1g_iw");
        assert_eq!(cookie.unwrap().unwrap().len(), 19);
    }

    /// UT test cases for `CacheDigest::from_cookie_value`.
    ///
    /// # Brief
    /// 1. Decodes valid and malformed cookie values.
    /// 2. Checks the values and error kinds.
    #[test]
    fn ut_cache_digest_from_cookie_value() {
        let decoder = GolombDecoder::new(6);
        let digest = CacheDigest::from_cookie_value("gU54MA", &decoder).unwrap();
        assert_eq!(
            digest.iter().copied().collect::<Vec<_>>(),
            vec![65, 104, 134, 140]
        );
        assert!(CacheDigest::from_cookie_value("", &decoder)
            .unwrap()
            .is_empty());

        let err = CacheDigest::from_cookie_value("gU54M", &decoder).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::Decode);
        // 0xff: a unary run running off the end.
        let err = CacheDigest::from_cookie_value("_w", &decoder).unwrap_err();
        assert_eq!(err.error_kind(), ErrorKind::Decode);
    }

    /// UT test cases for `CacheDigest` set operations.
    ///
    /// # Brief
    /// 1. Inserts and merges values.
    /// 2. Checks membership and length.
    #[test]
    fn ut_cache_digest_set() {
        let mut digest = CacheDigest::new();
        assert!(digest.is_empty());
        assert!(digest.insert(7));
        assert!(!digest.insert(7));
        digest.merge(&CacheDigest::from_values([1, 7, 9]));
        assert_eq!(digest.len(), 3);
        assert!(digest.contains(9));
        assert!(!digest.contains(8));
        assert_eq!(digest.iter().copied().collect::<Vec<_>>(), vec![1, 7, 9]);
    }
}
