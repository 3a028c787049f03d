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

//! `ylong_http_push` decides which resources an `HTTP/2` server pushes, so
//! that resources already cached by a client are not pushed again.
//!
//! The client's cache is tracked with a [cache digest] cookie. Every response
//! that pushes resources also sets the cookie to the digest of everything the
//! client is known to hold, and the next request sends it back.
//!
//! # Usage
//! A server implements [`PushResponse`] and [`PushRequest`] for its own
//! response and request types, creates one [`CachePusher`] and calls
//! [`CachePusher::push`] with a fresh [`PushState`] for every request.
//!
//! ```
//! use ylong_http_push::digest::cookie::{is_digest_set_cookie, DigestCookie};
//! use ylong_http_push::{
//!     CachePusher, PushCapability, PushError, PushOptions, PushResponse, PushState, Pusher,
//! };
//!
//! #[derive(Default)]
//! struct Response {
//!     promised: Vec<String>,
//!     set_cookies: Vec<String>,
//! }
//!
//! impl Pusher for Response {
//!     fn push(&mut self, target: &str, _options: &PushOptions) -> Result<(), PushError> {
//!         self.promised.push(target.to_string());
//!         Ok(())
//!     }
//! }
//!
//! impl PushResponse for Response {
//!     fn push_capability(&mut self) -> PushCapability<'_> {
//!         PushCapability::Supported(self)
//!     }
//!
//!     fn set_cookie(&mut self, cookie: &DigestCookie) {
//!         self.set_cookies.retain(|c| !is_digest_set_cookie(c));
//!         self.set_cookies.push(cookie.to_string());
//!     }
//! }
//!
//! let pusher = CachePusher::new(1 << 6, 1).unwrap();
//!
//! // First visit, nothing is cached.
//! let mut response = Response::default();
//! pusher
//!     .push(&mut response, "", &mut PushState::new(), &["/static/example.jpg"])
//!     .unwrap();
//! assert_eq!(response.promised, vec!["/static/example.jpg"]);
//! assert_eq!(response.set_cookies, vec!["x-cache-digest=KA; Path=/"]);
//!
//! // Second visit, the client sends the digest back.
//! let mut response = Response::default();
//! pusher
//!     .push(
//!         &mut response,
//!         "x-cache-digest=KA",
//!         &mut PushState::new(),
//!         &["/static/example.jpg"],
//!     )
//!     .unwrap();
//! assert!(response.promised.is_empty());
//! ```
//!
//! [cache digest]: digest

#[macro_use]
mod error;

mod config;
mod controller;
pub mod digest;
mod pusher;
mod state;

pub use config::{PushConfig, PushConfigBuilder};
pub use controller::{CachePusher, PushReport};
pub use error::{ErrorKind, PushError};
pub use pusher::{PushCapability, PushOptions, PushRequest, PushResponse, Pusher};
pub use state::PushState;
