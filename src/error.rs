// Error types shared by the CLI. Each variant maps to one message the user
// sees; the dispatcher prints them and carries on, nothing here ends the
// process with a failure status.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TobsmgError {
    #[error("Please set the server url with `tobsmg --server <server-url>`")]
    MissingServerUrl,

    #[error("Auth Token is missing\nPlease run `tobsmg --login <email> <password>`")]
    MissingToken,

    #[error("Email or Password is missing")]
    MissingCredentials,

    #[error("Can't Find Image File: {}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't upload non-image file: {}", path.display())]
    NotAnImage { path: PathBuf },

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body did not have the `{result:{data:{value}}}` shape.
    #[error("unexpected response from server: {0}")]
    InvalidResponse(String),

    #[error("Authentication Failed: Please try again")]
    AuthenticationFailed,

    #[error("failed to write {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TobsmgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_points_at_login() {
        let msg = TobsmgError::MissingToken.to_string();
        assert!(msg.contains("Auth Token is missing"));
        assert!(msg.contains("--login <email> <password>"));
    }

    #[test]
    fn file_errors_name_the_path() {
        let err = TobsmgError::FileUnreadable {
            path: PathBuf::from("/tmp/cat.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Can't Find Image File: /tmp/cat.png");

        let err = TobsmgError::NotAnImage {
            path: PathBuf::from("/tmp/notes.txt"),
        };
        assert_eq!(err.to_string(), "Can't upload non-image file: /tmp/notes.txt");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: TobsmgError = io_err.into();
        assert!(matches!(err, TobsmgError::Io(_)));
    }
}
