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

//! Cache aware push decisions.

use std::collections::BTreeSet;

use crate::config::PushConfig;
use crate::digest::cookie::digest_values;
use crate::digest::golomb::GolombDecoder;
use crate::digest::{CacheDigest, Quantizer};
use crate::error::{ErrorKind, PushError};
use crate::pusher::{PushCapability, PushOptions, PushRequest, PushResponse};
use crate::state::PushState;

/// Decides which resources to push so that resources a client already cached
/// on an earlier visit are not pushed again.
///
/// The client's cache is learned from the digest cookie of the request, and
/// every response carries the updated digest in a `Set-Cookie` header.
///
/// `CachePusher` is immutable and can be shared between concurrent requests.
///
/// # Examples
///
/// ```
/// use ylong_http_push::digest::cookie::DigestCookie;
/// use ylong_http_push::{
///     CachePusher, PushCapability, PushError, PushOptions, PushResponse, PushState, Pusher,
/// };
///
/// #[derive(Default)]
/// struct Response {
///     promised: Vec<String>,
///     set_cookie: Option<String>,
/// }
///
/// impl Pusher for Response {
///     fn push(&mut self, target: &str, _options: &PushOptions) -> Result<(), PushError> {
///         self.promised.push(target.to_string());
///         Ok(())
///     }
/// }
///
/// impl PushResponse for Response {
///     fn push_capability(&mut self) -> PushCapability<'_> {
///         PushCapability::Supported(self)
///     }
///
///     fn set_cookie(&mut self, cookie: &DigestCookie) {
///         self.set_cookie = Some(cookie.to_string());
///     }
/// }
///
/// let pusher = CachePusher::new(1 << 6, 4).unwrap();
/// let mut state = PushState::new();
/// let mut response = Response::default();
///
/// // The client already has the first two resources.
/// let report = pusher
///     .push(
///         &mut response,
///         "x-cache-digest=gU4",
///         &mut state,
///         &[
///             "/js/jquery-1.9.1.min.js",
///             "/assets/style.css",
///             "/static/logo.jpg",
///             "/static/cover.jpg",
///         ],
///     )
///     .unwrap();
///
/// assert_eq!(report.pushed(), &["/static/logo.jpg", "/static/cover.jpg"]);
/// assert_eq!(response.promised, report.pushed());
/// assert_eq!(
///     response.set_cookie.as_deref(),
///     Some("x-cache-digest=gU54MA; Path=/")
/// );
/// ```
#[derive(Clone, Debug)]
pub struct CachePusher {
    config: PushConfig,
    quantizer: Quantizer,
    decoder: GolombDecoder,
}

impl CachePusher {
    /// Creates a `CachePusher` with modulus `P` and expected element count
    /// `N`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::CachePusher;
    ///
    /// assert!(CachePusher::new(1 << 6, 10).is_ok());
    /// assert!(CachePusher::new(100, 10).is_err());
    /// ```
    pub fn new(modulus: u32, capacity: u32) -> Result<Self, PushError> {
        let config = PushConfig::builder()
            .modulus(modulus)
            .capacity(capacity)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Creates a `CachePusher` with a validated `PushConfig`.
    ///
    /// Inbound values are accepted below `(max_unary_run + 1) * P`, so a
    /// raised unary run limit also admits digests built with a larger `N`.
    pub fn with_config(config: PushConfig) -> Self {
        let quantizer = Quantizer::new(config.domain());
        let inbound_domain = config
            .max_unary_run()
            .saturating_add(1)
            .saturating_mul(u64::from(config.modulus()));
        let decoder = GolombDecoder::new(config.fixed_bits())
            .max_unary_run(config.max_unary_run())
            .domain(inbound_domain);
        Self {
            config,
            quantizer,
            decoder,
        }
    }

    /// Gets the `PushConfig` of this `CachePusher`.
    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Quantizes a resource identifier into the digest domain.
    pub fn quantize(&self, resource: &str) -> u64 {
        self.quantizer.quantize(resource.as_bytes())
    }

    /// Builds the digest of a list of resources.
    pub fn digest_of<T: AsRef<str>>(&self, resources: &[T]) -> CacheDigest {
        resources
            .iter()
            .map(|resource| self.quantize(resource.as_ref()))
            .collect()
    }

    /// Pushes the resources the client does not know yet, with default
    /// `PushOptions`.
    ///
    /// See [`CachePusher::push_with_options`].
    ///
    /// [`CachePusher::push_with_options`]: CachePusher::push_with_options
    pub fn push<S, R, T>(
        &self,
        response: &mut S,
        request: &R,
        state: &mut PushState,
        resources: &[T],
    ) -> Result<PushReport, PushError>
    where
        S: PushResponse + ?Sized,
        R: PushRequest + ?Sized,
        T: AsRef<str>,
    {
        self.push_with_options(response, request, state, resources, &PushOptions::new())
    }

    /// Pushes the resources the client does not know yet.
    ///
    /// On the first call for a request, `state` is initialized from the digest
    /// cookies of `request`; malformed digests count as empty. A resource is
    /// skipped if its quantized value is known or was pushed earlier in the
    /// same call, and pushed otherwise. Pushed resources join the known
    /// digest, which is then written to `response` as a `Set-Cookie` header.
    ///
    /// Returns an `Unsupported` error if the response can not push, and a
    /// `Canceled` error if it is already finished. Neither writes the cookie,
    /// except that a peer disabling push after some resources were pushed
    /// still gets the digest of those resources. Other push failures are
    /// collected in the returned `PushReport`, the failed resources stay
    /// unknown.
    pub fn push_with_options<S, R, T>(
        &self,
        response: &mut S,
        request: &R,
        state: &mut PushState,
        resources: &[T],
        options: &PushOptions,
    ) -> Result<PushReport, PushError>
    where
        S: PushResponse + ?Sized,
        R: PushRequest + ?Sized,
        T: AsRef<str>,
    {
        if response.is_finished() {
            return Err(PushError::canceled());
        }
        if !response.push_capability().is_supported() {
            return Err(PushError::unsupported());
        }

        let known = state.known_or_init(|| self.load_digest(request));
        let mut report = PushReport::default();
        let mut candidates = Vec::new();
        for resource in resources {
            let resource = resource.as_ref();
            let value = self.quantize(resource);
            if known.contains(value) {
                tracing::debug!(resource, value, "skip resource known to the client");
                report.skipped.push(resource.to_string());
            } else {
                candidates.push((resource, value));
            }
        }

        let (pushed, terminal) = self.dispatch(response, &candidates, options, &mut report);

        let known = state.known_or_init(CacheDigest::new);
        for value in pushed {
            known.insert(value);
        }
        let cookie = known.to_cookie(self.config.fixed_bits());
        state.replace_last_pushed(report.pushed.clone());

        if let Some(err) = terminal {
            // The response headers are still open when the peer refuses a
            // push, not when the response is finished.
            if err.error_kind() == ErrorKind::Unsupported && !report.pushed.is_empty() {
                tracing::debug!(cookie = cookie.value(), "write cache digest cookie");
                response.set_cookie(&cookie);
            }
            return Err(err);
        }
        tracing::debug!(
            pushed = report.pushed.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            cookie = cookie.value(),
            "write cache digest cookie"
        );
        response.set_cookie(&cookie);
        Ok(report)
    }

    fn load_digest<R: PushRequest + ?Sized>(&self, request: &R) -> CacheDigest {
        let headers = request.cookie_headers();
        let mut digest = CacheDigest::new();
        for value in digest_values(&headers) {
            match CacheDigest::from_cookie_value(value, &self.decoder) {
                Ok(inbound) => digest.merge(&inbound),
                Err(e) => tracing::warn!(error = %e, value, "discard malformed cache digest"),
            }
        }
        digest
    }

    // Returns the values pushed and the error that stopped the dispatch, if
    // any. A value pushed once is skipped for the rest of the call, a failed
    // one is retried by the next candidate sharing it.
    fn dispatch<S: PushResponse + ?Sized>(
        &self,
        response: &mut S,
        candidates: &[(&str, u64)],
        options: &PushOptions,
        report: &mut PushReport,
    ) -> (BTreeSet<u64>, Option<PushError>) {
        let mut pushed = BTreeSet::new();
        if self.config.is_dry_run() {
            for (resource, value) in candidates {
                if pushed.insert(*value) {
                    tracing::debug!(resource, "dry run, skip push dispatch");
                    report.pushed.push(resource.to_string());
                } else {
                    report.skipped.push(resource.to_string());
                }
            }
            return (pushed, None);
        }

        let pusher = match response.push_capability() {
            PushCapability::Supported(pusher) => pusher,
            PushCapability::Unsupported => return (pushed, Some(PushError::unsupported())),
        };
        for (resource, value) in candidates {
            if pushed.contains(value) {
                tracing::debug!(resource, value, "skip resource pushed earlier in this call");
                report.skipped.push(resource.to_string());
                continue;
            }
            match pusher.push(resource, options) {
                Ok(()) => {
                    tracing::debug!(resource, "pushed resource");
                    pushed.insert(*value);
                    report.pushed.push(resource.to_string());
                }
                Err(e) if e.is_terminal() => {
                    tracing::debug!(resource, error = %e, "push aborted");
                    return (pushed, Some(e));
                }
                Err(e) => {
                    tracing::warn!(resource, error = %e, "failed to push resource");
                    report.failed.push((resource.to_string(), e));
                }
            }
        }
        (pushed, None)
    }
}

/// Outcome of a single push call.
#[derive(Debug, Default)]
pub struct PushReport {
    pushed: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<(String, PushError)>,
}

impl PushReport {
    /// Gets the resources pushed by the call, in call order.
    pub fn pushed(&self) -> &[String] {
        &self.pushed
    }

    /// Gets the resources skipped because the client knows them or a resource
    /// with the same digest value was pushed earlier in the call.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Gets the resources whose push failed, with the cause.
    pub fn failed(&self) -> &[(String, PushError)] {
        &self.failed
    }

    /// Checks whether any push failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
