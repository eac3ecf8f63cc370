use std::error::Error;

type BoxedError = Box<dyn Error + Send + Sync>;

/// An error returned by a failing pipeline [`Transform`](crate::Transform).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(BoxedError);

impl TransformError {
    /// Creates a transform error from any error or message.
    pub fn new(error: impl Into<BoxedError>) -> Self {
        Self(error.into())
    }

    /// Returns the underlying error.
    pub fn into_inner(self) -> BoxedError {
        self.0
    }
}

/// An error returned by a failing [`Transport`](crate::Transport) operation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(BoxedError);

impl TransportError {
    /// Creates a transport error from any error or message.
    pub fn new(error: impl Into<BoxedError>) -> Self {
        Self(error.into())
    }

    /// Returns the underlying error.
    pub fn into_inner(self) -> BoxedError {
        self.0
    }
}

impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        Self::new(error)
    }
}

/// An error returned from capturing an event.
///
/// Events dropped by the pipeline are a successful outcome and never produce an error.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A transform in the pipeline failed.
    #[error("transform `{stage}` failed")]
    Transform {
        /// The name of the failing transform.
        stage: String,
        /// The error returned by the transform.
        #[source]
        source: TransformError,
    },

    /// The transport failed to send the event.
    #[error("failed to send event")]
    Transport(#[from] TransportError),
}
