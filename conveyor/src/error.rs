//! Error types and result definitions for pipeline operations.
//!
//! Provides an error system with classification and aggregation for pipeline
//! operations. The [`ConveyorError`] type supports single errors, errors with
//! additional detail, and multiple aggregated errors for the case where more
//! than one worker fails during the same run.

use std::borrow::Cow;
use std::error;
use std::fmt;
use std::sync::Arc;

/// Convenient result type for pipeline operations using [`ConveyorError`] as the error type.
pub type ConveyorResult<T> = Result<T, ConveyorError>;

/// Detailed payload stored for single [`ConveyorError`] instances.
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
}

/// Main error type for pipeline operations.
///
/// [`ConveyorError`] can represent a single error, an error with additional
/// detail, or multiple aggregated errors. Cancelled waits are deliberately
/// not errors; they travel through
/// [`ShutdownResult`](crate::concurrency::shutdown::ShutdownResult) instead.
#[derive(Debug, Clone)]
pub struct ConveyorError {
    repr: ErrorRepr,
}

/// Internal representation of error data.
#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Single error payload.
    Single(ErrorPayload),
    /// Multiple aggregated errors.
    ///
    /// This variant is mainly useful to capture multiple worker failures.
    Many(Vec<ConveyorError>),
}

/// Specific categories of errors that can occur during pipeline operations.
///
/// The taxonomy is small and non-fatal by design: the only failure modes are
/// invalid configuration before the run starts and worker panics during it.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The pipeline configuration failed validation.
    InvalidConfig,
    /// The pipeline was asked to perform an operation incompatible with its state.
    InvalidState,
    /// The producer worker task panicked or was aborted.
    ProducerWorkerPanic,
    /// A consumer worker task panicked or was aborted.
    ConsumerWorkerPanic,
    /// Uncategorized error.
    Unknown,
}

impl ConveyorError {
    /// Returns the [`ErrorKind`] of this error.
    ///
    /// For multiple errors, returns the kind of the first error or
    /// [`ErrorKind::Unknown`] if the error list is empty.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.kind,
            ErrorRepr::Many(ref errors) => errors
                .first()
                .map(|err| err.kind())
                .unwrap_or(ErrorKind::Unknown),
        }
    }

    /// Returns all [`ErrorKind`]s present in this error.
    ///
    /// For single errors, returns a vector with one element. For multiple
    /// errors, returns a flattened vector of all error kinds.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self.repr {
            ErrorRepr::Single(ref payload) => vec![payload.kind],
            ErrorRepr::Many(ref errors) => {
                errors.iter().flat_map(|err| err.kinds()).collect()
            }
        }
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload.detail.as_deref(),
            ErrorRepr::Many(ref errors) => errors.iter().find_map(|err| err.detail()),
        }
    }

    /// Attaches a source error, preserving the original failure for callers
    /// that walk the [`error::Error::source`] chain.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        if let ErrorRepr::Single(ref mut payload) = self.repr {
            payload.source = Some(Arc::new(source));
        }

        self
    }
}

impl fmt::Display for ConveyorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            ErrorRepr::Single(ref payload) => {
                write!(f, "{:?}: {}", payload.kind, payload.description)?;
                if let Some(detail) = &payload.detail {
                    write!(f, " ({detail})")?;
                }

                Ok(())
            }
            ErrorRepr::Many(ref errors) => {
                write!(f, "{} errors occurred:", errors.len())?;
                for err in errors {
                    write!(f, " [{err}]")?;
                }

                Ok(())
            }
        }
    }
}

impl error::Error for ConveyorError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.repr {
            ErrorRepr::Single(ref payload) => payload
                .source
                .as_ref()
                .map(|source| source.as_ref() as &(dyn error::Error + 'static)),
            ErrorRepr::Many(_) => None,
        }
    }
}

impl From<(ErrorKind, &'static str)> for ConveyorError {
    fn from((kind, description): (ErrorKind, &'static str)) -> Self {
        Self {
            repr: ErrorRepr::Single(ErrorPayload {
                kind,
                description: Cow::Borrowed(description),
                detail: None,
                source: None,
            }),
        }
    }
}

impl From<(ErrorKind, &'static str, String)> for ConveyorError {
    fn from((kind, description, detail): (ErrorKind, &'static str, String)) -> Self {
        Self {
            repr: ErrorRepr::Single(ErrorPayload {
                kind,
                description: Cow::Borrowed(description),
                detail: Some(Cow::Owned(detail)),
                source: None,
            }),
        }
    }
}

impl From<Vec<ConveyorError>> for ConveyorError {
    fn from(errors: Vec<ConveyorError>) -> Self {
        Self {
            repr: ErrorRepr::Many(errors),
        }
    }
}
