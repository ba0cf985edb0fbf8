// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur in the library.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub(crate) fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (Internal, internal),
    (InvalidBounds, invalid_bounds),
    (InvalidPageToken, invalid_page_token),
    (InvariantViolation, invariant_violation),
    (MalformedSample, malformed_sample),
    (NanValue, nan_value)
);

/// An error that can occur while normalizing, aggregating or paginating
/// component data.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human readable description of the error.
    pub fn description(&self) -> &str {
        &self.desc
    }

    /// Returns the error with `prefix` prepended to its description.
    pub(crate) fn with_prefix(self, prefix: impl std::fmt::Display) -> Self {
        Self {
            kind: self.kind,
            desc: format!("{prefix}{}", self.desc),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::malformed_sample("Sample for DcPower has no timestamp.");
        assert_eq!(err.kind(), ErrorKind::MalformedSample);
        assert_eq!(err.description(), "Sample for DcPower has no timestamp.");
        assert_eq!(
            err.to_string(),
            "MalformedSample: Sample for DcPower has no timestamp."
        );
        assert_eq!(ErrorKind::NanValue.to_string(), "NanValue");
    }
}
