use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Sesame.
#[derive(Debug, Error)]
pub enum SesameError {
    // --- State errors ---
    #[error("Cannot create; a cave or lock already exists for {0}")]
    CaveExists(PathBuf),

    #[error("Cannot open; no cave found at {0}")]
    CaveNotFound(PathBuf),

    #[error("Cannot {0}; the cave is not open")]
    NotOpen(&'static str),

    #[error("Cannot {0}; the cave is already open")]
    AlreadyOpen(&'static str),

    #[error("Cannot {0}; the cave is locked")]
    Locked(&'static str),

    #[error("Cannot unlock; the cave is not locked")]
    NotLocked,

    // --- Validation errors ---
    #[error("There must be exactly {0} words")]
    WrongWordCount(usize),

    #[error("Unrecognised word used")]
    UnknownWord,

    #[error("{0} cannot be empty")]
    Blank(&'static str),

    #[error("Service and/or user already exists")]
    EntryExists,

    #[error("Unable to find that service and/or user")]
    EntryNotFound,

    #[error("Service '{0}' has more than one user; please specify which")]
    Ambiguous(String),

    #[error("Cannot {0} the sesame service")]
    Sentinel(&'static str),

    #[error("Base conversion failure")]
    Conversion,

    #[error("Unexpected dictionary: {0}")]
    Dictionary(String),

    // --- Crypto errors ---
    #[error("Decryption failed: wrong phrase, wrong code or corrupted data")]
    Crypto,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Integrity errors ---
    #[error("Checksum failure")]
    ChecksumMismatch,

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Coarse classification of a [`SesameError`].
///
/// Authentication and decryption failures report `Validation`, the same
/// kind as a mistyped phrase, so callers cannot tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    State,
    Validation,
    Integrity,
    Io,
    Config,
}

impl SesameError {
    /// Which family of failure this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CaveExists(_)
            | Self::CaveNotFound(_)
            | Self::NotOpen(_)
            | Self::AlreadyOpen(_)
            | Self::Locked(_)
            | Self::NotLocked => ErrorKind::State,

            Self::WrongWordCount(_)
            | Self::UnknownWord
            | Self::Blank(_)
            | Self::EntryExists
            | Self::EntryNotFound
            | Self::Ambiguous(_)
            | Self::Sentinel(_)
            | Self::Conversion
            | Self::Crypto
            | Self::EncryptionFailed(_)
            | Self::KeyDerivationFailed(_)
            | Self::SerializationError(_)
            | Self::CommandFailed(_) => ErrorKind::Validation,

            Self::ChecksumMismatch => ErrorKind::Integrity,

            Self::Io(_) => ErrorKind::Io,

            Self::Dictionary(_) | Self::ConfigError(_) => ErrorKind::Config,
        }
    }
}

/// Convenience type alias for Sesame results.
pub type Result<T> = std::result::Result<T, SesameError>;
