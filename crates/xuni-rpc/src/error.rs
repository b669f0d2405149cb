//! RPC error types.

use thiserror::Error;

/// Errors surfaced by the wallet and daemon clients.
///
/// Validation and alias-resolution failures short-circuit an operation
/// before any request is sent. Transport and remote errors are surfaced
/// verbatim; the client never retries on its own.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A field failed its shape check. Displays as `{field}{expected}`,
    /// e.g. `paymentId must be 64-digit hexadecimal string`.
    #[error("{field}{expected}")]
    Validation {
        field: String,
        expected: &'static str,
    },

    /// Input was neither a valid address nor alias-shaped (contains no `.`).
    #[error("{input} is not a valid address or alias")]
    InvalidAddressOrAlias { input: String },

    /// A TXT lookup failed or returned no usable record.
    #[error("could not resolve alias {alias}: {reason}")]
    AliasResolution { alias: String, reason: String },

    /// `mixIn` outside the allowed range.
    #[error("2 <= mixIn <= 10")]
    MixinOutOfRange,

    /// `reserveSize` outside the allowed range.
    #[error("0 <= reserveSize <= 255")]
    ReserveSizeOutOfRange,

    /// Neither `firstBlockIndex` nor `blockHash` was given.
    #[error("either firstBlockIndex or blockHash is required")]
    MissingBlockRef,

    /// Transport or socket failure.
    #[error("RPC server error")]
    Http { source: reqwest::Error },

    /// The request exceeded the configured timeout.
    #[error("RPC timeout")]
    Timeout,

    /// The response body was not valid JSON, or did not match the
    /// expected result shape.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The remote service returned a structured error envelope; its
    /// message is passed through unchanged.
    #[error("{message}")]
    Rpc { code: i64, message: String },
}

impl RpcError {
    pub(crate) fn validation(field: &str, expected: &'static str) -> Self {
        RpcError::Validation {
            field: field.to_string(),
            expected,
        }
    }
}

/// Literal message tails appended to a field name in validation errors.
pub(crate) mod expect {
    pub const HEX: &str = " must be a hexadecimal string";
    pub const HEX64: &str = " must be 64-digit hexadecimal string";
    pub const ADDR: &str = " must be 99-character string beginning with Xuni";
    pub const TRANSFERS: &str =
        " must be a non-empty array of transfer objects { address, amount, message? }";
    pub const ADDR_ARRAY: &str =
        " must be an array of addresses each of which must be 99-character string beginning with Xuni";
    pub const HEX64_ARRAY: &str =
        " must be an array of 64-digit hexadecimal strings";
    pub const SCHEME: &str = " must begin with http(s)://";
}
