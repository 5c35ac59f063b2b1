use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at byte {offset}")]
pub struct ParserError {
    pub(crate) source: SyntaxError,
    pub(crate) offset: u64,
}

impl ParserError {
    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &SyntaxError {
        &self.source
    }

    /// Stream offset of the offending byte, counted since the last reset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid method")]
    InvalidMethod,
    #[error("invalid request target")]
    InvalidUrl,
    #[error("invalid HTTP version")]
    InvalidVersion,
    #[error("invalid status code")]
    InvalidStatus,
    #[error("invalid character {0:#04x} in header name")]
    InvalidHeaderToken(u8),
    #[error("invalid character {0:#04x} in header value")]
    InvalidHeaderValue(u8),
    #[error("invalid content-length")]
    InvalidContentLength,
    #[error("duplicate content-length")]
    DuplicateContentLength,
    #[error("invalid transfer-encoding")]
    InvalidTransferEncoding,
    #[error("content-length together with transfer-encoding")]
    AmbiguousBodyLength,
    #[error("invalid chunk size")]
    InvalidChunkSize,
    #[error("expected line feed")]
    ExpectedLineFeed,
    #[error("header section exceeds {limit} bytes")]
    HeadersTooLarge { limit: usize },
    #[error("declared body length exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },
    #[error("data after connection close")]
    DataAfterClose,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
