use lectio_domain::modules::ModuleId;
use std::borrow::Cow;

/// Error type for catalog, versification and verse-store access.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// The reference cannot be parsed or does not resolve under the chosen
    /// versification.
    #[error("no such key `{reference}` under versification `{versification}`")]
    NoSuchKey { reference: Cow<'static, str>, versification: Cow<'static, str> },

    /// The referenced module initials are not installed.
    #[error("module `{module}` is not installed")]
    ModuleNotFound { module: ModuleId },

    /// The versification scheme itself is unknown.
    #[error("unknown versification scheme `{versification}`")]
    UnknownScheme { versification: Cow<'static, str> },

    /// The underlying verse data could not be read.
    #[error("failed to read `{module}`: {message}")]
    ReadFailed { module: ModuleId, message: Cow<'static, str> },
}
