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

//! Definition of `PushError` which includes errors that may occur in this
//! crate.

use core::fmt::{Debug, Display, Formatter};
use std::error;

use crate::digest::cookie::DigestDecodeError;
use crate::digest::golomb::GolombDecodeError;

/// The structure encapsulates errors that can be encountered when deciding
/// and dispatching server pushes.
///
/// # Examples
///
/// ```
/// use ylong_http_push::{ErrorKind, PushError};
///
/// let error = PushError::unsupported();
/// assert_eq!(error.error_kind(), ErrorKind::Unsupported);
/// ```
pub struct PushError {
    kind: ErrorKind,
    cause: Cause,
}

impl PushError {
    /// Creates an `Unsupported` error, used when the underlying transport
    /// cannot push resources.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::PushError;
    ///
    /// let unsupported = PushError::unsupported();
    /// ```
    pub fn unsupported() -> Self {
        Self {
            kind: ErrorKind::Unsupported,
            cause: Cause::Msg("server push is not supported by the transport"),
        }
    }

    /// Creates a `Canceled` error, used when the request was canceled or the
    /// response has already been completed.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::PushError;
    ///
    /// let canceled = PushError::canceled();
    /// ```
    pub fn canceled() -> Self {
        Self {
            kind: ErrorKind::Canceled,
            cause: Cause::Msg("response is already finished"),
        }
    }

    /// Creates an `Other` error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::PushError;
    ///
    /// fn error(error: std::io::Error) {
    ///     let other = PushError::other(error);
    /// }
    /// ```
    pub fn other<T>(cause: T) -> Self
    where
        T: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self {
            kind: ErrorKind::Other,
            cause: Cause::Other(cause.into()),
        }
    }

    /// Creates an error of the given kind caused by `err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::{ErrorKind, PushError};
    ///
    /// let error = PushError::from_error(ErrorKind::Push, "stream limit reached");
    /// assert_eq!(error.error_kind(), ErrorKind::Push);
    /// ```
    pub fn from_error<T>(kind: ErrorKind, err: T) -> Self
    where
        T: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self {
            kind,
            cause: Cause::Other(err.into()),
        }
    }

    /// Gets the `ErrorKind` of this `PushError`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::{ErrorKind, PushError};
    ///
    /// let canceled = PushError::canceled();
    /// assert_eq!(canceled.error_kind(), ErrorKind::Canceled);
    /// ```
    pub fn error_kind(&self) -> ErrorKind {
        self.kind
    }

    /// Checks whether this error ends the current push decision instead of
    /// being recorded against a single resource.
    ///
    /// # Examples
    ///
    /// ```
    /// use ylong_http_push::PushError;
    ///
    /// assert!(PushError::unsupported().is_terminal());
    /// assert!(!PushError::other("missing file").is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported | ErrorKind::Canceled)
    }
}

impl PushError {
    pub(crate) fn from_str(kind: ErrorKind, msg: &'static str) -> Self {
        Self {
            kind,
            cause: Cause::Msg(msg),
        }
    }
}

impl From<GolombDecodeError> for PushError {
    fn from(err: GolombDecodeError) -> Self {
        PushError::from_error(ErrorKind::Decode, err)
    }
}

impl From<DigestDecodeError> for PushError {
    fn from(err: DigestDecodeError) -> Self {
        PushError::from_error(ErrorKind::Decode, err)
    }
}

impl Debug for PushError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut builder = f.debug_struct("PushError");
        builder.field("ErrorKind", &self.kind);
        builder.field("Cause", &self.cause);
        builder.finish()
    }
}

impl Display for PushError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.kind.as_str())?;
        write!(f, ": {}", self.cause)?;
        Ok(())
    }
}

impl error::Error for PushError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.cause {
            Cause::Other(ref err) => Some(err.as_ref()),
            Cause::Msg(_) => None,
        }
    }
}

/// Error kinds which can indicate the type of `PushError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Errors for building a push configuration.
    Build,

    /// The transport can not push resources.
    Unsupported,

    /// The request was canceled or the response is already finished.
    Canceled,

    /// Errors for pushing a single resource.
    Push,

    /// Errors for decoding a cache digest.
    Decode,

    /// Other error kinds.
    Other,
}

impl ErrorKind {
    /// Gets the string info of this `ErrorKind`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ylong_http_push::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::Unsupported.as_str(), "Unsupported Error");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Build => "Build Error",
            Self::Unsupported => "Unsupported Error",
            Self::Canceled => "Canceled Error",
            Self::Push => "Push Error",
            Self::Decode => "Decode Error",
            Self::Other => "Other Error",
        }
    }
}

pub(crate) enum Cause {
    Msg(&'static str),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl Debug for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Msg(msg) => write!(f, "{}", msg),
            Self::Other(err) => Debug::fmt(err, f),
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Msg(msg) => write!(f, "{}", msg),
            Self::Other(err) => Display::fmt(err, f),
        }
    }
}

macro_rules! err_from_msg {
    ($kind: ident, $msg: literal) => {{
        use crate::error::{ErrorKind, PushError};

        Err(PushError::from_str(ErrorKind::$kind, $msg))
    }};
}

#[cfg(test)]
mod ut_push_error {
    use std::error::Error;

    use crate::digest::golomb::GolombDecodeError;
    use crate::{ErrorKind, PushError};

    /// UT test cases for `ErrorKind::as_str`.
    ///
    /// # Brief
    /// 1. Transfer ErrorKind to str a by calling `ErrorKind::as_str`.
    /// 2. Checks if the results are correct.
    #[test]
    fn ut_err_as_str() {
        assert_eq!(ErrorKind::Build.as_str(), "Build Error");
        assert_eq!(ErrorKind::Unsupported.as_str(), "Unsupported Error");
        assert_eq!(ErrorKind::Canceled.as_str(), "Canceled Error");
        assert_eq!(ErrorKind::Push.as_str(), "Push Error");
        assert_eq!(ErrorKind::Decode.as_str(), "Decode Error");
        assert_eq!(ErrorKind::Other.as_str(), "Other Error");
    }

    /// UT test cases for `PushError` constructors.
    ///
    /// # Brief
    /// 1. Calls `PushError::unsupported`, `PushError::canceled` and
    ///    `PushError::other`.
    /// 2. Checks the kinds and whether they are terminal.
    #[test]
    fn ut_err_kind() {
        let unsupported = PushError::unsupported();
        assert_eq!(unsupported.error_kind(), ErrorKind::Unsupported);
        assert!(unsupported.is_terminal());

        let canceled = PushError::canceled();
        assert_eq!(canceled.error_kind(), ErrorKind::Canceled);
        assert!(canceled.is_terminal());

        let other = PushError::other(canceled);
        assert_eq!(other.error_kind(), ErrorKind::Other);
        assert!(!other.is_terminal());
        assert!(other.source().is_some());
    }

    /// UT test cases for `Display` of `PushError`.
    ///
    /// # Brief
    /// 1. Converts a `GolombDecodeError` into a `PushError`.
    /// 2. Checks the kind and the formatted message.
    #[test]
    fn ut_err_display() {
        let err = PushError::from(GolombDecodeError::Truncated);
        assert_eq!(err.error_kind(), ErrorKind::Decode);
        assert_eq!(
            format!("{err}"),
            "Decode Error: golomb-rice stream ends inside a code"
        );
        assert_eq!(
            format!("{}", PushError::unsupported()),
            "Unsupported Error: server push is not supported by the transport"
        );
    }
}
