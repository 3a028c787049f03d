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

//! Cookie transport of a cache digest.
//!
//! The digest bytes travel as the value of a cookie named
//! [`DIGEST_COOKIE_NAME`], encoded with the URL-safe base64 alphabet and
//! without padding, so the value needs no escaping in `Cookie` and
//! `Set-Cookie` headers.
//!
//! ```text
//! Set-Cookie: x-cache-digest=gU54MA; Path=/
//! Cookie: session=BAh7CiIKZmxhc2hJ; x-cache-digest=gU54MA
//! ```
//!
//! [`DIGEST_COOKIE_NAME`]: DIGEST_COOKIE_NAME

use core::fmt::{Display, Formatter};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

/// Name of the cookie carrying the cache digest.
pub const DIGEST_COOKIE_NAME: &str = "x-cache-digest";

/// Path attribute of the cookie carrying the cache digest.
pub const DIGEST_COOKIE_PATH: &str = "/";

/// Possible errors when unwrapping a digest cookie value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestDecodeError {
    /// The value is not valid unpadded URL-safe base64.
    #[error("invalid digest cookie text: {0}")]
    InvalidText(#[from] base64::DecodeError),
}

/// The outbound cookie carrying a cache digest.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::DigestCookie;
///
/// let cookie = DigestCookie::wrap(&[0x81, 0x4e, 0x78, 0x30]);
/// assert_eq!(cookie.value(), "gU54MA");
/// assert_eq!(cookie.to_string(), "x-cache-digest=gU54MA; Path=/");
/// assert_eq!(cookie.unwrap().unwrap(), vec![0x81, 0x4e, 0x78, 0x30]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestCookie {
    value: String,
}

impl DigestCookie {
    /// Wraps digest bytes into a `DigestCookie`.
    pub fn wrap(bytes: &[u8]) -> Self {
        Self {
            value: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Unwraps the digest bytes carried by this cookie.
    pub fn unwrap(&self) -> Result<Vec<u8>, DigestDecodeError> {
        unwrap_value(&self.value)
    }

    /// Gets the cookie name.
    pub fn name(&self) -> &'static str {
        DIGEST_COOKIE_NAME
    }

    /// Gets the cookie path.
    pub fn path(&self) -> &'static str {
        DIGEST_COOKIE_PATH
    }

    /// Gets the cookie value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Formats the cookie as a `Set-Cookie` header value.
impl Display for DigestCookie {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}={}; Path={}", self.name(), self.value, self.path())
    }
}

/// Converts the textual value of a digest cookie back to digest bytes.
///
/// A value enclosed in double quotes is accepted.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::unwrap_value;
///
/// assert_eq!(unwrap_value("JA").unwrap(), vec![0x24]);
/// assert!(unwrap_value("J").is_err());
/// ```
pub fn unwrap_value(value: &str) -> Result<Vec<u8>, DigestDecodeError> {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    Ok(URL_SAFE_NO_PAD.decode(value)?)
}

/// Iterator over the `name=value` pairs of a `Cookie` header value.
///
/// Pairs without `=` are skipped. Names and values are trimmed.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::CookiePairs;
///
/// let mut pairs = CookiePairs::new("session=abc; x-cache-digest=JA");
/// assert_eq!(pairs.next(), Some(("session", "abc")));
/// assert_eq!(pairs.next(), Some(("x-cache-digest", "JA")));
/// assert_eq!(pairs.next(), None);
/// ```
pub struct CookiePairs<'a> {
    inner: core::str::Split<'a, char>,
}

impl<'a> CookiePairs<'a> {
    /// Creates a `CookiePairs` over a single `Cookie` header value.
    pub fn new(header: &'a str) -> Self {
        Self {
            inner: header.split(';'),
        }
    }
}

impl<'a> Iterator for CookiePairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for pair in self.inner.by_ref() {
            if let Some((name, value)) = pair.split_once('=') {
                let name = name.trim();
                if !name.is_empty() {
                    return Some((name, value.trim()));
                }
            }
        }
        None
    }
}

/// Collects the values of every digest cookie found in `headers`, in order.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::digest_values;
///
/// let headers = ["a=1; x-cache-digest=JA", "x-cache-digest=KA"];
/// assert_eq!(digest_values(&headers), vec!["JA", "KA"]);
/// ```
pub fn digest_values<'a>(headers: &[&'a str]) -> Vec<&'a str> {
    headers
        .iter()
        .flat_map(|header| CookiePairs::new(*header))
        .filter(|(name, _)| *name == DIGEST_COOKIE_NAME)
        .map(|(_, value)| value)
        .collect()
}

/// Checks whether a `Set-Cookie` header value sets the digest cookie.
///
/// Response implementations use it to replace an earlier digest cookie of
/// the same response while leaving unrelated cookies untouched.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::is_digest_set_cookie;
///
/// assert!(is_digest_set_cookie("x-cache-digest=JA; Path=/"));
/// assert!(!is_digest_set_cookie("session=BAh7CiIKZmxhc2hJ; Path=/"));
/// ```
pub fn is_digest_set_cookie(header: &str) -> bool {
    header
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(name, _)| name.trim() == DIGEST_COOKIE_NAME)
        .unwrap_or(false)
}
