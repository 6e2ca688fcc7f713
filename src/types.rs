//! This module defines range-checked types for message ids and revisions,
//! meant to keep out-of-range values away from the fixed-width header.

use snafu::{ensure, OptionExt, Snafu};

use core::convert::{TryFrom, TryInto};
use core::fmt;
use core::ops::Deref;

/// Error type for this module
#[derive(Debug, Snafu, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The value isn't a valid MID.
    #[snafu(display("Invalid MID"))]
    InvalidMid,
    /// The value isn't a valid revision.
    #[snafu(display("Invalid revision"))]
    InvalidRevision,
}

const fn invalid_mid() -> InvalidMidSnafu {
    InvalidMidSnafu
}

const fn invalid_revision() -> InvalidRevisionSnafu {
    InvalidRevisionSnafu
}

/// `Mid` is a range-checked \[1, 9999\] integer identifying a message type.
///
/// ## Example
/// ```
/// use openproto_mid::Mid;
/// let m = Mid::new(215).unwrap();
/// assert_eq!(m.to_string(), "0215");
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct Mid(u16);

/// Create a new [`Mid`], panics if it is out of range.
pub const fn mid(m: u16) -> Mid {
    if m >= 1 && m <= 9999 {
        Mid(m)
    } else {
        panic!("Invalid MID.")
    }
}

impl Mid {
    /// Create a new MID, checking that it is in \[1, 9999\].
    /// # Errors
    /// Returns [`Error::InvalidMid`] if `mid` is out of range.
    pub fn new(mid: impl TryInto<u16>) -> Result<Self, Error> {
        let mid = mid.try_into().ok().with_context(invalid_mid)?;
        ensure!((1..=9999).contains(&mid), invalid_mid());
        Ok(Self(mid))
    }

    pub(crate) fn to_bytes(self) -> [u8; 4] {
        digits(u32::from(self.0))
    }
}

impl Deref for Mid {
    type Target = u16;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<u16> for Mid {
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Mid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl TryFrom<u16> for Mid {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// `Revision` is a range-checked \[0, 999\] integer selecting one layout of a
/// message type.
///
/// On the wire revision `000` is an alias of revision 1, see [`Revision::effective`].
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct Revision(u16);

/// Create a new [`Revision`], panics if it is out of range.
pub const fn rev(r: u16) -> Revision {
    if r <= 999 {
        Revision(r)
    } else {
        panic!("Invalid revision.")
    }
}

impl Revision {
    /// Create a new revision, checking that it is in \[0, 999\].
    /// # Errors
    /// Returns [`Error::InvalidRevision`] if `revision` is out of range.
    pub fn new(revision: impl TryInto<u16>) -> Result<Self, Error> {
        let revision = revision.try_into().ok().with_context(invalid_revision)?;
        ensure!(revision <= 999, invalid_revision());
        Ok(Self(revision))
    }

    /// The revision a layout is looked up by. Revision 0 means revision 1.
    pub const fn effective(self) -> Self {
        if self.0 == 0 {
            Revision(1)
        } else {
            self
        }
    }

    pub(crate) fn to_bytes(self) -> [u8; 3] {
        let d = digits(u32::from(self.0));
        [d[1], d[2], d[3]]
    }
}

impl Deref for Revision {
    type Target = u16;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq<u16> for Revision {
    fn eq(&self, other: &u16) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl TryFrom<u16> for Revision {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

fn digits(mut x: u32) -> [u8; 4] {
    let mut buf = [0; 4];
    for c in buf.iter_mut().rev() {
        *c = b'0' + (x % 10) as u8;
        x /= 10;
    }
    buf
}
