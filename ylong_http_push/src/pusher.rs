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

//! Interfaces of the host transport.
//!
//! The controller does not implement `HTTP/2` server push itself. A server
//! implements [`PushResponse`] for its response writer and [`PushRequest`] for
//! its request, and the controller drives them.
//!
//! [`PushResponse`]: PushResponse
//! [`PushRequest`]: PushRequest

use crate::digest::cookie::DigestCookie;
use crate::error::PushError;

/// Initiates pushes against the current response.
pub trait Pusher {
    /// Pushes the resource at `target`, sending a `PUSH_PROMISE` built from
    /// `options`.
    ///
    /// Returns a `PushError` of kind `Unsupported` if the peer disabled push,
    /// `Canceled` if the response is already finished, and any other kind if
    /// only this resource could not be pushed.
    fn push(&mut self, target: &str, options: &PushOptions) -> Result<(), PushError>;
}

/// Whether a response can push resources.
pub enum PushCapability<'a> {
    /// The response can push through the given `Pusher`.
    Supported(&'a mut dyn Pusher),

    /// The transport can not push, for example `HTTP/1.1`.
    Unsupported,
}

impl PushCapability<'_> {
    /// Checks whether pushes are supported.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }
}

/// A response being written, as seen by the push controller.
pub trait PushResponse {
    /// Gets the push capability of this response.
    fn push_capability(&mut self) -> PushCapability<'_>;

    /// Adds a `Set-Cookie` header for `cookie`.
    ///
    /// A digest cookie set earlier on the same response must be replaced,
    /// other `Set-Cookie` headers must be kept. See
    /// [`is_digest_set_cookie`].
    ///
    /// [`is_digest_set_cookie`]: crate::digest::cookie::is_digest_set_cookie
    fn set_cookie(&mut self, cookie: &DigestCookie);

    /// Checks whether the response is already finished or its request was
    /// canceled.
    fn is_finished(&self) -> bool {
        false
    }
}

/// A request, as seen by the push controller.
pub trait PushRequest {
    /// Gets the values of all `Cookie` headers of the request.
    fn cookie_headers(&self) -> Vec<&str>;
}

impl PushRequest for str {
    fn cookie_headers(&self) -> Vec<&str> {
        vec![self]
    }
}

impl PushRequest for [&str] {
    fn cookie_headers(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl PushRequest for [String] {
    fn cookie_headers(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

/// Options of the requests promised by pushes.
///
/// # Examples
///
/// ```
/// use ylong_http_push::PushOptions;
///
/// let options = PushOptions::new()
///     .method("HEAD")
///     .header("accept-encoding", "gzip");
/// assert_eq!(options.request_method(), "HEAD");
/// assert_eq!(
///     options.request_headers(),
///     &[("accept-encoding".to_string(), "gzip".to_string())]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushOptions {
    method: String,
    headers: Vec<(String, String)>,
}

impl PushOptions {
    /// Creates a new, default `PushOptions` with method `GET` and no header.
    pub fn new() -> Self {
        Self {
            method: String::from("GET"),
            headers: Vec::new(),
        }
    }

    /// Sets the method of the promised request.
    pub fn method<T: Into<String>>(mut self, method: T) -> Self {
        self.method = method.into();
        self
    }

    /// Adds a header to the promised request.
    pub fn header<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Gets the method of the promised request.
    pub fn request_method(&self) -> &str {
        &self.method
    }

    /// Gets the extra headers of the promised request.
    pub fn request_headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl Default for PushOptions {
    fn default() -> Self {
        Self::new()
    }
}
