//! The 20 character preamble shared by every Open Protocol package.
//!
//! ```text
//! LLLL MMMM RRR N SS PP QQ T U
//!  |    |    |  |  |  |  |  | '- message part number
//!  |    |    |  |  |  |  |  '--- number of message parts
//!  |    |    |  |  |  |  '------ sequence number
//!  |    |    |  |  |  '--------- spindle id
//!  |    |    |  |  '------------ station id
//!  |    |    |  '--------------- no ack flag
//!  |    |    '------------------ revision
//!  |    '----------------------- MID
//!  '---------------------------- total length
//! ```
//!
//! Everything after the MID may be left blank (spaces). Blank fields decode to
//! `None` and encode back to spaces.

use arrayvec::ArrayVec;
use nom::bytes::complete::{take, take_while_m_n};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::tuple;
use nom::IResult;
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::types::{self, Mid, Revision};

/// Width of the header on the wire.
pub const HEADER_LEN: usize = 20;

pub(crate) type HeaderBytes = ArrayVec<u8, HEADER_LEN>;

/// Error type for this module
#[derive(Debug, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderError {
    /// Fewer than [`HEADER_LEN`] characters were supplied.
    #[snafu(display("Header needs {} characters, got {len}", HEADER_LEN))]
    TooShort { len: usize },
    /// A numeric header field holds something other than digits.
    #[snafu(display("Header field {field} is not numeric"))]
    NotNumeric { field: &'static str },
    /// The no ack flag is neither `0`, `1` nor blank.
    #[snafu(display("Invalid no ack flag"))]
    InvalidFlag,
    /// The MID or revision is out of range.
    #[snafu(display("Header field out of range: {source}"))]
    OutOfRange { source: types::Error },
    /// The length field doesn't match the package length.
    #[snafu(display("Header declares length {declared}, package is {actual} characters"))]
    LengthMismatch { declared: usize, actual: usize },
    /// A value doesn't fit the width of its header field.
    #[snafu(display("Header field {field} overflows its width"))]
    Overflow { field: &'static str },
}

/// Routing metadata at the front of every package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Total package length, header included.
    pub length: usize,
    pub mid: Mid,
    /// `None` when the wire field is blank, which means revision 1.
    pub revision: Option<Revision>,
    pub no_ack: Option<bool>,
    pub station_id: Option<u8>,
    pub spindle_id: Option<u8>,
    pub sequence_number: Option<u8>,
    pub message_parts: Option<u8>,
    pub message_part_number: Option<u8>,
}

impl Header {
    /// A header for `mid` with every optional field blank.
    pub const fn new(mid: Mid) -> Self {
        Self {
            length: HEADER_LEN,
            mid,
            revision: None,
            no_ack: None,
            station_id: None,
            spindle_id: None,
            sequence_number: None,
            message_parts: None,
            message_part_number: None,
        }
    }

    /// The revision used for layout lookup.
    pub fn effective_revision(&self) -> Revision {
        self.revision.map_or(crate::types::rev(1), Revision::effective)
    }

    /// Decode the header at the front of `raw`. Bytes after the header are ignored.
    pub fn decode(raw: &[u8]) -> Result<Self, HeaderError> {
        ensure!(raw.len() >= HEADER_LEN, TooShortSnafu { len: raw.len() });
        let (_, fields) = split_fields(raw).map_err(|_| HeaderError::TooShort { len: raw.len() })?;
        let (length, mid, revision, no_ack, station, spindle, sequence, parts, part_number) =
            fields;

        let length = numeric(length, "length")?.with_context(|| NotNumericSnafu {
            field: "length",
        })?;
        let mid = numeric(mid, "mid")?.with_context(|| NotNumericSnafu { field: "mid" })?;
        let mid = Mid::new(mid).context(OutOfRangeSnafu)?;
        let revision = match numeric(revision, "revision")? {
            Some(r) => Some(Revision::new(r).context(OutOfRangeSnafu)?),
            None => None,
        };
        let no_ack = match no_ack {
            b"0" => Some(false),
            b"1" => Some(true),
            b" " => None,
            _ => return InvalidFlagSnafu.fail(),
        };

        Ok(Self {
            length: length as usize,
            mid,
            revision,
            no_ack,
            station_id: small(station, "station_id")?,
            spindle_id: small(spindle, "spindle_id")?,
            sequence_number: small(sequence, "sequence_number")?,
            message_parts: small(parts, "message_parts")?,
            message_part_number: small(part_number, "message_part_number")?,
        })
    }

    /// Encode the header into its fixed width wire form.
    pub fn encode(&self) -> Result<HeaderBytes, HeaderError> {
        let mut buf = HeaderBytes::new();
        push_number(&mut buf, Some(self.length as u32), 4, "length")?;
        buf.extend(self.mid.to_bytes());
        match self.revision {
            Some(r) => buf.extend(r.to_bytes()),
            None => buf.extend(*b"   "),
        }
        buf.push(match self.no_ack {
            Some(true) => b'1',
            Some(false) => b'0',
            None => b' ',
        });
        push_number(&mut buf, self.station_id.map(u32::from), 2, "station_id")?;
        push_number(&mut buf, self.spindle_id.map(u32::from), 2, "spindle_id")?;
        push_number(
            &mut buf,
            self.sequence_number.map(u32::from),
            2,
            "sequence_number",
        )?;
        push_number(&mut buf, self.message_parts.map(u32::from), 1, "message_parts")?;
        push_number(
            &mut buf,
            self.message_part_number.map(u32::from),
            1,
            "message_part_number",
        )?;
        Ok(buf)
    }
}

type Fields<'a> = (
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
    &'a [u8],
);

fn split_fields(raw: &[u8]) -> IResult<&[u8], Fields<'_>> {
    tuple((
        take(4usize),
        take(4usize),
        take(3usize),
        take(1usize),
        take(2usize),
        take(2usize),
        take(2usize),
        take(1usize),
        take(1usize),
    ))(raw)
}

/// All blank is `None`, all digits is `Some`, anything else fails.
fn numeric(raw: &[u8], field: &'static str) -> Result<Option<u32>, HeaderError> {
    if raw.iter().all(|&c| c == b' ') {
        return Ok(None);
    }
    let (_, value) = digits(raw).ok().context(NotNumericSnafu { field })?;
    Ok(Some(value))
}

fn digits(raw: &[u8]) -> IResult<&[u8], u32> {
    let width = raw.len();
    all_consuming(map_res(
        map_res(
            take_while_m_n(width, width, |c: u8| c.is_ascii_digit()),
            core::str::from_utf8,
        ),
        |s: &str| s.parse::<u32>(),
    ))(raw)
}

fn small(raw: &[u8], field: &'static str) -> Result<Option<u8>, HeaderError> {
    // at most two digits, always fits
    Ok(numeric(raw, field)?.map(|v| v as u8))
}

fn push_number(
    buf: &mut HeaderBytes,
    value: Option<u32>,
    width: usize,
    field: &'static str,
) -> Result<(), HeaderError> {
    match value {
        None => (0..width).for_each(|_| buf.push(b' ')),
        Some(v) => {
            let text = format!("{:0width$}", v, width = width);
            ensure!(text.len() == width, OverflowSnafu { field });
            buf.extend(text.bytes());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{mid, rev};

    #[test]
    fn test_decode_blank_header() {
        let h = Header::decode(b"00200129            ").unwrap();
        assert_eq!(h.length, 20);
        assert_eq!(h.mid, mid(129));
        assert_eq!(h.revision, None);
        assert_eq!(h.effective_revision(), rev(1));
        assert_eq!(h.no_ack, None);
        assert_eq!(h.station_id, None);
        assert_eq!(&h.encode().unwrap()[..], b"00200129            ");
    }

    #[test]
    fn test_decode_full_header() {
        let raw = b"00570002003101020312";
        let h = Header::decode(raw).unwrap();
        assert_eq!(h.length, 57);
        assert_eq!(h.mid, mid(2));
        assert_eq!(h.revision, Some(rev(3)));
        assert_eq!(h.no_ack, Some(true));
        assert_eq!(h.station_id, Some(1));
        assert_eq!(h.spindle_id, Some(2));
        assert_eq!(h.sequence_number, Some(3));
        assert_eq!(h.message_parts, Some(1));
        assert_eq!(h.message_part_number, Some(2));
        assert_eq!(&h.encode().unwrap()[..], &raw[..]);
    }

    #[test]
    fn test_revision_zero() {
        let h = Header::decode(b"00200001000         ").unwrap();
        assert_eq!(h.revision, Some(rev(0)));
        assert_eq!(h.effective_revision(), rev(1));
    }

    #[test]
    fn test_trailing_body_ignored() {
        let h = Header::decode(b"00290129002         010302123").unwrap();
        assert_eq!(h.length, 29);
        assert_eq!(h.revision, Some(rev(2)));
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            Header::decode(b"0020012"),
            Err(HeaderError::TooShort { len: 7 })
        );
        assert_eq!(
            Header::decode(b"00x00129            "),
            Err(HeaderError::NotNumeric { field: "length" })
        );
        assert_eq!(
            Header::decode(b"0020    001         "),
            Err(HeaderError::NotNumeric { field: "mid" })
        );
        assert_eq!(
            Header::decode(b"00200 29001         "),
            Err(HeaderError::NotNumeric { field: "mid" })
        );
        assert_eq!(
            Header::decode(b"002001290a1         "),
            Err(HeaderError::NotNumeric { field: "revision" })
        );
        assert_eq!(
            Header::decode(b"00200129001x        "),
            Err(HeaderError::InvalidFlag)
        );
        assert!(matches!(
            Header::decode(b"00200000001         "),
            Err(HeaderError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_encode_overflow() {
        let mut h = Header::new(mid(1));
        h.length = 10_000;
        assert_eq!(h.encode(), Err(HeaderError::Overflow { field: "length" }));
        h.length = 20;
        h.station_id = Some(100);
        assert_eq!(
            h.encode(),
            Err(HeaderError::Overflow { field: "station_id" })
        );
    }
}
