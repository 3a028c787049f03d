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

//! Mapping of resource identifiers into the digest domain.

use md5::{Digest, Md5};

/// Maps a resource identifier to an integer in `[0, domain)`.
///
/// The value is the last 4 bytes of the `MD5` of the identifier, read in
/// big-endian order, modulo `domain`. It is stable across processes.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::Quantizer;
///
/// let quantizer = Quantizer::new(64);
/// assert_eq!(quantizer.quantize(b"/static/example.js"), 18);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantizer {
    domain: u64,
}

impl Quantizer {
    /// Creates a `Quantizer` for `[0, domain)`. A `domain` of zero is treated
    /// as one.
    pub fn new(domain: u64) -> Self {
        Self {
            domain: domain.max(1),
        }
    }

    /// Gets the exclusive upper bound of quantized values.
    pub fn domain(&self) -> u64 {
        self.domain
    }

    /// Quantizes `resource`.
    pub fn quantize(&self, resource: &[u8]) -> u64 {
        let hash = Md5::digest(resource);
        let tail = [hash[12], hash[13], hash[14], hash[15]];
        u64::from(u32::from_be_bytes(tail)) % self.domain
    }
}
