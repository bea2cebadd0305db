use lectio_corpus::CorpusError;
use lectio_domain::modules::ModuleId;
use std::borrow::Cow;

/// Error type for the passage lookup pipeline.
///
/// The variants form the closed set of failure codes the REST layer maps to
/// status codes; everything a lookup can fail with funnels into one of them.
#[derive(Debug, thiserror::Error)]
pub enum PassageError {
    /// The reference cannot be parsed or does not resolve under the chosen
    /// versification.
    #[error("no such key `{reference}` under versification `{versification}`")]
    NoSuchKey { reference: Cow<'static, str>, versification: Cow<'static, str> },

    /// The requested module initials are not installed.
    #[error("module `{module}` is not installed")]
    ModuleNotFound { module: ModuleId },

    /// Module data exists but could not be read.
    #[error("failed to read module data: {message}")]
    ModuleReadFailed { message: Cow<'static, str> },

    /// The lookup exceeded its deadline.
    #[error("the lookup exceeded its deadline")]
    TimedOut,

    /// The client went away before the lookup finished.
    #[error("the lookup was cancelled")]
    Cancelled,

    /// A request parameter is malformed (non-numeric ordinal, bad direction).
    #[error("{message}")]
    InvalidArgument { message: Cow<'static, str> },
}

impl PassageError {
    #[must_use]
    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Stable machine-readable code carried in error payloads.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoSuchKey { .. } => "NO_SUCH_KEY",
            Self::ModuleNotFound { .. } => "MODULE_NOT_FOUND",
            Self::ModuleReadFailed { .. } => "MODULE_READ_FAILED",
            Self::TimedOut => "TIMED_OUT",
            Self::Cancelled => "CANCELLED",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}

impl From<CorpusError> for PassageError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::NoSuchKey { reference, versification } => {
                Self::NoSuchKey { reference, versification }
            }
            CorpusError::ModuleNotFound { module } => Self::ModuleNotFound { module },
            CorpusError::UnknownScheme { versification } => Self::ModuleReadFailed {
                message: format!("versification `{versification}` is not registered").into(),
            },
            CorpusError::ReadFailed { module, message } => {
                Self::ModuleReadFailed { message: format!("{module}: {message}").into() }
            }
        }
    }
}
