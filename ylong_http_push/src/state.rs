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

//! Request scoped push state.

use crate::digest::CacheDigest;

/// Push state of a single request.
///
/// A request handler creates one `PushState` per request and passes it to
/// every [`CachePusher::push`] call of that request, so later calls see the
/// resources pushed by earlier ones. It must not be shared between requests.
///
/// [`CachePusher::push`]: crate::CachePusher::push
///
/// # Examples
///
/// ```
/// use ylong_http_push::PushState;
///
/// let state = PushState::new();
/// assert!(!state.is_initialized());
/// assert!(state.last_pushed().is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PushState {
    known: Option<CacheDigest>,
    last_pushed: Vec<String>,
}

impl PushState {
    /// Creates a new, uninitialized `PushState`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether the inbound digest has been read.
    pub fn is_initialized(&self) -> bool {
        self.known.is_some()
    }

    /// Gets the resources known to the client so far: the inbound digest and
    /// everything pushed earlier in this request.
    pub fn known(&self) -> Option<&CacheDigest> {
        self.known.as_ref()
    }

    /// Gets the resources pushed by the most recent push call.
    pub fn last_pushed(&self) -> &[String] {
        &self.last_pushed
    }

    pub(crate) fn known_or_init<F>(&mut self, init: F) -> &mut CacheDigest
    where
        F: FnOnce() -> CacheDigest,
    {
        self.known.get_or_insert_with(init)
    }

    pub(crate) fn replace_last_pushed(&mut self, pushed: Vec<String>) {
        self.last_pushed = pushed;
    }
}
