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

//! Push configure module.

use crate::error::PushError;

const DEFAULT_MODULUS: u32 = 1 << 6;
const DEFAULT_CAPACITY: u32 = 10;
const MAX_DOMAIN: u64 = 1 << 32;

/// Immutable options of a [`CachePusher`].
///
/// `modulus` is the Golomb-Rice parameter `P`, `capacity` is the expected
/// number of digest elements `N`. Quantized values lie in `[0, N * P)`.
///
/// [`CachePusher`]: crate::CachePusher
///
/// # Examples
///
/// ```
/// use ylong_http_push::PushConfig;
///
/// let config = PushConfig::builder()
///     .modulus(1 << 6)
///     .capacity(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.fixed_bits(), 6);
/// assert_eq!(config.domain(), 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushConfig {
    modulus: u32,
    capacity: u32,
    dry_run: bool,
    max_unary_run: u64,
}

impl PushConfig {
    /// Creates a `PushConfigBuilder`.
    pub fn builder() -> PushConfigBuilder {
        PushConfigBuilder::new()
    }

    /// Gets the modulus `P`.
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// Gets the expected element count `N`.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Gets the remainder width `log2(P)`.
    pub fn fixed_bits(&self) -> u32 {
        self.modulus.trailing_zeros()
    }

    /// Gets the exclusive upper bound `N * P` of quantized values.
    pub fn domain(&self) -> u64 {
        u64::from(self.capacity) * u64::from(self.modulus)
    }

    /// Checks whether push dispatch is skipped.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Gets the longest unary run accepted when decoding inbound digests.
    pub fn max_unary_run(&self) -> u64 {
        self.max_unary_run
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            modulus: DEFAULT_MODULUS,
            capacity: DEFAULT_CAPACITY,
            dry_run: false,
            max_unary_run: u64::from(DEFAULT_CAPACITY),
        }
    }
}

/// A builder which is used to construct a [`PushConfig`].
///
/// [`PushConfig`]: PushConfig
///
/// # Examples
///
/// ```
/// use ylong_http_push::PushConfigBuilder;
///
/// let config = PushConfigBuilder::new()
///     .modulus(1 << 10)
///     .capacity(20)
///     .dry_run(true)
///     .build()
///     .unwrap();
/// assert!(config.is_dry_run());
/// ```
#[derive(Clone, Debug)]
pub struct PushConfigBuilder {
    modulus: u32,
    capacity: u32,
    dry_run: bool,
    max_unary_run: Option<u64>,
}

impl PushConfigBuilder {
    /// Creates a new, default `PushConfigBuilder`.
    pub fn new() -> Self {
        Self {
            modulus: DEFAULT_MODULUS,
            capacity: DEFAULT_CAPACITY,
            dry_run: false,
            max_unary_run: None,
        }
    }

    /// Sets the modulus `P`. It must be a power of two.
    pub fn modulus(mut self, modulus: u32) -> Self {
        self.modulus = modulus;
        self
    }

    /// Sets the expected element count `N`. It must not be zero.
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Skips push dispatch while still deciding and writing the digest.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the longest unary run accepted when decoding inbound digests.
    ///
    /// Defaults to `N`, since no delta of a digest built with this config
    /// reaches `N * P`. Inbound values below `(max_unary_run + 1) * P` are
    /// accepted, so raising it also accepts digests built with a larger `N`.
    pub fn max_unary_run(mut self, max_run: u64) -> Self {
        self.max_unary_run = Some(max_run);
        self
    }

    /// Validates the options and builds a `PushConfig`.
    pub fn build(self) -> Result<PushConfig, PushError> {
        if !self.modulus.is_power_of_two() {
            return err_from_msg!(Build, "modulus must be a power of two");
        }
        if self.capacity == 0 {
            return err_from_msg!(Build, "capacity must not be zero");
        }
        if u64::from(self.capacity) * u64::from(self.modulus) > MAX_DOMAIN {
            return err_from_msg!(Build, "capacity * modulus must not exceed 2^32");
        }
        if self.max_unary_run == Some(0) {
            return err_from_msg!(Build, "max unary run must not be zero");
        }
        Ok(PushConfig {
            modulus: self.modulus,
            capacity: self.capacity,
            dry_run: self.dry_run,
            max_unary_run: self
                .max_unary_run
                .unwrap_or_else(|| u64::from(self.capacity)),
        })
    }
}

impl Default for PushConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod ut_push_config {
    use super::{PushConfig, PushConfigBuilder};
    use crate::ErrorKind;

    /// UT test cases for `PushConfigBuilder::build`.
    ///
    /// # Brief
    /// 1. Builds configs with valid options.
    /// 2. Checks the derived values.
    #[test]
    fn ut_push_config_build() {
        let config = PushConfigBuilder::new().build().unwrap();
        assert_eq!(config, PushConfig::default());
        assert_eq!(config.modulus(), 64);
        assert_eq!(config.capacity(), 10);
        assert_eq!(config.max_unary_run(), 10);
        assert!(!config.is_dry_run());

        let config = PushConfig::builder()
            .modulus(1)
            .capacity(3)
            .max_unary_run(100)
            .build()
            .unwrap();
        assert_eq!(config.fixed_bits(), 0);
        assert_eq!(config.domain(), 3);
        assert_eq!(config.max_unary_run(), 100);

        let config = PushConfig::builder()
            .modulus(1 << 31)
            .capacity(2)
            .build()
            .unwrap();
        assert_eq!(config.fixed_bits(), 31);
        assert_eq!(config.domain(), 1 << 32);
    }

    /// UT test cases for invalid options of `PushConfigBuilder`.
    ///
    /// # Brief
    /// 1. Builds configs with invalid options.
    /// 2. Checks that every build fails with `ErrorKind::Build`.
    #[test]
    fn ut_push_config_build_invalid() {
        let cases = [
            PushConfig::builder().modulus(0),
            PushConfig::builder().modulus(48),
            PushConfig::builder().capacity(0),
            PushConfig::builder().modulus(1 << 31).capacity(3),
            PushConfig::builder().max_unary_run(0),
        ];
        for builder in cases {
            let err = builder.build().unwrap_err();
            assert_eq!(err.error_kind(), ErrorKind::Build);
        }
    }
}
