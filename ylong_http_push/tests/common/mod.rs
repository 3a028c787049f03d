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

#![allow(dead_code)]

use ylong_http_push::digest::cookie::{is_digest_set_cookie, DigestCookie};
use ylong_http_push::{
    ErrorKind, PushCapability, PushError, PushOptions, PushRequest, PushResponse, Pusher,
};

pub const JQUERY: &str = "/js/jquery-1.9.1.min.js";
pub const STYLE: &str = "/assets/style.css";
pub const LOGO: &str = "/static/logo.jpg";
pub const COVER: &str = "/static/cover.jpg";

pub const ASSETS: [&str; 4] = [JQUERY, STYLE, LOGO, COVER];

/// Installs a `tracing` subscriber writing to the test output, controlled by
/// `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// How the mock transport answers push attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Http2,
    Http1,
    Finished,
    /// The peer disables push after the given number of promises.
    DisableAfter(usize),
}

/// A response writer recording promises and `Set-Cookie` headers.
pub struct MockResponse {
    pub transport: Transport,
    pub promised: Vec<(String, PushOptions)>,
    pub set_cookies: Vec<String>,
    pub reject: Vec<String>,
}

impl MockResponse {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            promised: Vec::new(),
            set_cookies: Vec::new(),
            reject: Vec::new(),
        }
    }

    pub fn rejecting(mut self, target: &str) -> Self {
        self.reject.push(target.to_string());
        self
    }

    pub fn promised_targets(&self) -> Vec<&str> {
        self.promised.iter().map(|(t, _)| t.as_str()).collect()
    }

    pub fn digest_cookie(&self) -> Option<&str> {
        self.set_cookies
            .iter()
            .find(|c| is_digest_set_cookie(c))
            .map(String::as_str)
    }
}

impl Pusher for MockResponse {
    fn push(&mut self, target: &str, options: &PushOptions) -> Result<(), PushError> {
        if let Transport::DisableAfter(n) = self.transport {
            if self.promised.len() >= n {
                return Err(PushError::unsupported());
            }
        }
        if self.reject.iter().any(|r| r == target) {
            return Err(PushError::from_error(
                ErrorKind::Push,
                "stream limit reached",
            ));
        }
        self.promised.push((target.to_string(), options.clone()));
        Ok(())
    }
}

impl PushResponse for MockResponse {
    fn push_capability(&mut self) -> PushCapability<'_> {
        match self.transport {
            Transport::Http1 => PushCapability::Unsupported,
            _ => PushCapability::Supported(self),
        }
    }

    fn set_cookie(&mut self, cookie: &DigestCookie) {
        self.set_cookies.retain(|c| !is_digest_set_cookie(c));
        self.set_cookies.push(cookie.to_string());
    }

    fn is_finished(&self) -> bool {
        self.transport == Transport::Finished
    }
}

/// A request carrying raw `Cookie` header values.
pub struct MockRequest {
    pub cookies: Vec<String>,
}

impl MockRequest {
    pub fn new(cookies: &[&str]) -> Self {
        Self {
            cookies: cookies.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl PushRequest for MockRequest {
    fn cookie_headers(&self) -> Vec<&str> {
        self.cookies.iter().map(String::as_str).collect()
    }
}
