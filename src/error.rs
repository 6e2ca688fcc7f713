use snafu::Snafu;

use crate::convert::FieldError;
use crate::field::FieldId;
use crate::header::HeaderError;
use crate::types::{Mid, Revision};

/// Errors reported while resolving, parsing or packing a message.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// The package header can't be decoded.
    #[snafu(display("Malformed header: {source}"))]
    MalformedHeader { source: HeaderError },
    /// The package holds a byte outside of ASCII.
    #[snafu(display("Non-ASCII byte at position {position}"))]
    NonAsciiPackage { position: usize },
    /// No message type in the chain has this MID.
    #[snafu(display("Unrecognized message type, MID {mid}"))]
    UnrecognizedMessageType { mid: Mid },
    /// The message type has no layout for this revision.
    #[snafu(display("MID {mid} does not support revision {revision}"))]
    UnsupportedRevision { mid: Mid, revision: Revision },
    /// A field slice couldn't be decoded or encoded.
    #[snafu(display("Malformed field {field} of MID {mid}: {source}"))]
    MalformedField {
        mid: Mid,
        field: FieldId,
        source: FieldError,
    },
    /// The field isn't part of the current revision.
    #[snafu(display("MID {mid} revision {revision} has no field {field}"))]
    UnknownField {
        mid: Mid,
        revision: Revision,
        field: FieldId,
    },
    /// Two message types in one chain declare the same MID.
    #[snafu(display("Duplicate message type, MID {mid}"))]
    DuplicateMessageId { mid: Mid },
    /// A field table breaks the layout rules.
    #[snafu(display("Invalid layout of MID {mid} revision {revision}: {reason}"))]
    InvalidLayout {
        mid: Mid,
        revision: Revision,
        reason: &'static str,
    },
    /// The package resolves to another message type than the one asked for.
    #[snafu(display("Expected MID {expected}, found MID {found}"))]
    TypeMismatch { expected: Mid, found: Mid },
}
