//! Converters between fixed-width wire slices and typed values.
//!
//! Every converter is a stateless unit struct. [`Converter::decode`] receives
//! exactly the slice of one field, [`Converter::encode`] produces exactly the
//! width it is asked for, or fails.

use core::marker::PhantomData;

use chrono::NaiveDateTime;
use nom::bytes::complete::take_while_m_n;
use nom::combinator::{all_consuming, map_res};
use nom::sequence::tuple;
use nom::IResult;
use snafu::{ensure, OptionExt, Snafu};

use crate::field::Padding;
use crate::types::Mid;

/// Error type for this module
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum FieldError {
    /// The slice should hold digits.
    #[snafu(display("Expected a number, found {raw:?}"))]
    NotNumeric { raw: String },
    /// The code doesn't belong to the enumeration.
    #[snafu(display("Unknown code {code}"))]
    UnknownCode { code: u32 },
    #[snafu(display("Invalid timestamp {raw:?}"))]
    InvalidTimestamp { raw: String },
    /// A sub-record list slice isn't a whole number of items.
    #[snafu(display("Length {len} is not a multiple of item width {item_width}"))]
    PartialItem { len: usize, item_width: usize },
    #[snafu(display("Invalid sub-record {raw:?}"))]
    InvalidItem { raw: String },
    /// The number is outside the range of the value type.
    #[snafu(display("Value {value} out of range"))]
    OutOfRange { value: u32 },
    /// The value needs more characters than the field has.
    #[snafu(display("Value needs more than {width} characters"))]
    Overflow { width: usize },
    /// The package ends before the field does.
    #[snafu(display("Field ends at {needed}, package has {available} characters"))]
    Truncated { needed: usize, available: usize },
    /// The two digit field ordinal doesn't match the field position.
    #[snafu(display("Expected field ordinal {expected:02}, found {found:?}"))]
    WrongOrdinal { expected: usize, found: String },
}

/// Bidirectional mapping between a wire slice and a value.
pub trait Converter {
    type Value;

    fn decode(&self, raw: &str) -> Result<Self::Value, FieldError>;

    /// Encode `value`. `width` is `None` for counted lists, whose width
    /// follows from the value itself.
    fn encode(
        &self,
        value: &Self::Value,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError>;
}

fn pad(text: &str, width: Option<usize>, padding: Padding) -> Result<String, FieldError> {
    match width {
        Some(width) => padding.apply(text, width).context(OverflowSnafu { width }),
        None => Ok(text.to_owned()),
    }
}

/// Unsigned integers, normally left-padded with `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConverter;

impl Converter for IntConverter {
    type Value = u32;

    fn decode(&self, raw: &str) -> Result<u32, FieldError> {
        let digits = raw.trim_matches(' ');
        ensure!(
            !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit()),
            NotNumericSnafu { raw }
        );
        digits.parse().ok().context(NotNumericSnafu { raw })
    }

    fn encode(
        &self,
        value: &u32,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        pad(&value.to_string(), width, padding)
    }
}

/// A message id, as referenced by acknowledgements and errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MidConverter;

impl Converter for MidConverter {
    type Value = Mid;

    fn decode(&self, raw: &str) -> Result<Mid, FieldError> {
        let value = IntConverter.decode(raw)?;
        Mid::new(value).ok().context(OutOfRangeSnafu { value })
    }

    fn encode(
        &self,
        value: &Mid,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        IntConverter.encode(&u32::from(**value), width, padding)
    }
}

/// A single `0` or `1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl Converter for BoolConverter {
    type Value = bool;

    fn decode(&self, raw: &str) -> Result<bool, FieldError> {
        match raw.trim_matches(' ') {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => NotNumericSnafu { raw }.fail(),
        }
    }

    fn encode(
        &self,
        value: &bool,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        pad(if *value { "1" } else { "0" }, width, padding)
    }
}

/// Free text, decoded without its trailing blanks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

impl Converter for TextConverter {
    type Value = String;

    fn decode(&self, raw: &str) -> Result<String, FieldError> {
        Ok(raw.trim_end_matches(' ').to_owned())
    }

    fn encode(
        &self,
        value: &String,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        pad(value, width, padding)
    }
}

/// A closed set of labels carried as an integer code.
pub trait WireEnum: Sized + Copy {
    fn code(self) -> u32;
    fn from_code(code: u32) -> Option<Self>;
}

pub struct EnumConverter<E>(PhantomData<E>);

impl<E> EnumConverter<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: WireEnum> Converter for EnumConverter<E> {
    type Value = E;

    fn decode(&self, raw: &str) -> Result<E, FieldError> {
        let code = IntConverter.decode(raw)?;
        E::from_code(code).context(UnknownCodeSnafu { code })
    }

    fn encode(
        &self,
        value: &E,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        IntConverter.encode(&value.code(), width, padding)
    }
}

/// Wire form of timestamps, `YYYY-MM-DD:HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d:%H:%M:%S";
pub const TIMESTAMP_LEN: usize = 19;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampConverter;

impl Converter for TimestampConverter {
    type Value = NaiveDateTime;

    fn decode(&self, raw: &str) -> Result<NaiveDateTime, FieldError> {
        ensure!(raw.len() == TIMESTAMP_LEN, InvalidTimestampSnafu { raw });
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .ok()
            .context(InvalidTimestampSnafu { raw })
    }

    fn encode(
        &self,
        value: &NaiveDateTime,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        pad(&value.format(TIMESTAMP_FORMAT).to_string(), width, padding)
    }
}

/// A fixed width tuple inside a list field.
pub trait SubRecord: Sized {
    const WIDTH: usize;

    fn decode(raw: &str) -> Result<Self, FieldError>;
    /// Appends exactly [`SubRecord::WIDTH`] characters, or fails.
    fn encode(&self, out: &mut String) -> Result<(), FieldError>;
}

/// An ordered sequence of sub-records. The number of items is never encoded
/// in the list itself.
pub struct ListConverter<R>(PhantomData<R>);

impl<R> ListConverter<R> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<R> Default for ListConverter<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SubRecord> ListConverter<R> {
    pub const ITEM_WIDTH: usize = R::WIDTH;
}

impl<R: SubRecord> Converter for ListConverter<R> {
    type Value = Vec<R>;

    /// Blank items, used to fill fixed size lists, are skipped.
    fn decode(&self, raw: &str) -> Result<Vec<R>, FieldError> {
        ensure!(
            raw.len() % R::WIDTH == 0,
            PartialItemSnafu {
                len: raw.len(),
                item_width: R::WIDTH
            }
        );
        raw.as_bytes()
            .chunks(R::WIDTH)
            .filter(|item| !item.iter().all(|&c| c == b' '))
            .map(|item| {
                let item = core::str::from_utf8(item)
                    .ok()
                    .context(InvalidItemSnafu { raw })?;
                R::decode(item)
            })
            .collect()
    }

    fn encode(
        &self,
        value: &Vec<R>,
        width: Option<usize>,
        padding: Padding,
    ) -> Result<String, FieldError> {
        let mut out = String::with_capacity(value.len() * R::WIDTH);
        for item in value {
            item.encode(&mut out)?;
        }
        pad(&out, width, padding)
    }
}

/// `<3 digit number><1 digit status>`, the shape shared by relays and digital inputs.
fn number_status(raw: &str) -> IResult<&str, (u16, bool)> {
    all_consuming(tuple((
        map_res(take_while_m_n(3, 3, |c: char| c.is_ascii_digit()), |s: &str| {
            s.parse::<u16>()
        }),
        map_res(take_while_m_n(1, 1, |c: char| c == '0' || c == '1'), |s: &str| {
            Ok::<_, ()>(s == "1")
        }),
    )))(raw)
}

fn push_number_status(out: &mut String, number: u16, status: bool) -> Result<(), FieldError> {
    ensure!(number <= 999, OverflowSnafu { width: 3usize });
    out.push_str(&format!("{:03}{}", number, u8::from(status)));
    Ok(())
}

/// Status of one relay of an IO device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relay {
    pub number: u16,
    pub status: bool,
}

impl SubRecord for Relay {
    const WIDTH: usize = 4;

    fn decode(raw: &str) -> Result<Self, FieldError> {
        let (_, (number, status)) = number_status(raw)
            .ok()
            .context(InvalidItemSnafu { raw })?;
        Ok(Self { number, status })
    }

    fn encode(&self, out: &mut String) -> Result<(), FieldError> {
        push_number_status(out, self.number, self.status)
    }
}

/// Status of one digital input of an IO device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitalInput {
    pub number: u16,
    pub status: bool,
}

impl SubRecord for DigitalInput {
    const WIDTH: usize = 4;

    fn decode(raw: &str) -> Result<Self, FieldError> {
        let (_, (number, status)) = number_status(raw)
            .ok()
            .context(InvalidItemSnafu { raw })?;
        Ok(Self { number, status })
    }

    fn encode(&self, out: &mut String) -> Result<(), FieldError> {
        push_number_status(out, self.number, self.status)
    }
}
