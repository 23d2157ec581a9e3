use crate::types::Rcode;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// A simple type alias so as to DRY.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no inner DNS resolvers were provided")]
    NoResolvers,

    #[error("inner DNS resolver at position {index} is missing")]
    MissingResolver { index: usize },

    #[error("no inner DNS resolver was provided to follow referrals with")]
    MissingInner,

    /// Every resolver in a race failed. Holds one error per resolver, in the
    /// order they finished.
    #[error("all {} resolvers failed", .0.len())]
    AllFailed(Vec<Error>),

    #[error("gave up after following {0} referrals")]
    TooManyReferrals(usize),

    #[error("resolver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("resolution was cancelled")]
    Cancelled,

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("query failed with rcode: {0}")]
    Response(Rcode),

    #[error("no usable records for '{0}'")]
    NoRecords(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// The errors bundled by [`Error::AllFailed`], or an empty slice.
    pub fn failures(&self) -> &[Error] {
        match self {
            Error::AllFailed(errors) => errors,
            _ => &[],
        }
    }
}

/// Lets [`Resolver`](crate::clients::Resolver) implementations outside this
/// crate report a failure as a plain message, held as [`Error::Other`].
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg.into())
    }
}

/// See `From<String>`.
impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.into())
    }
}

/// Returns early with a [`std::io::Error`] of the given kind.
///
/// ```rust,ignore
/// bail!(InvalidData, "invalid Type({})", r#type);
/// ```
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($arg:tt)*) => {{
        return Err(std::io::Error::new(
            std::io::ErrorKind::$kind,
            format!($($arg)*),
        ).into());
    }}
}
