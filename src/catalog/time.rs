//! Controller clock, MID 0080 to 0082.

use chrono::NaiveDateTime;

use crate::convert::TimestampConverter;
use crate::error::Error;
use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
use crate::message::MessageType;
use crate::types::rev;

pub static TYPES: &[&MessageType] = &[&READ_TIME_REQUEST, &READ_TIME_REPLY, &SET_TIME];

/// Field id of the timestamp in [`ReadTimeReply`] and [`SetTime`].
pub const TIME: FieldId = FieldId(0);

const TIME_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::fixed(TIME, 20, 19).converted_by::<TimestampConverter>()];

message!(
    ReadTimeRequest,
    READ_TIME_REQUEST,
    80,
    "Read time upload request",
    &[RevisionLayout::new(rev(1), &[])]
);

message!(
    /// The controller's current time.
    ReadTimeReply,
    READ_TIME_REPLY,
    81,
    "Read time upload reply",
    &[RevisionLayout::new(rev(1), TIME_FIELDS)]
);

message!(
    /// Sets the controller clock.
    SetTime,
    SET_TIME,
    82,
    "Set time",
    &[RevisionLayout::new(rev(1), TIME_FIELDS)]
);

impl ReadTimeReply {
    pub fn time(&self) -> Result<NaiveDateTime, Error> {
        self.0.get(TIME, &TimestampConverter)
    }

    pub fn set_time(&mut self, time: NaiveDateTime) -> Result<(), Error> {
        self.0.set(TIME, &TimestampConverter, &time)
    }
}

impl SetTime {
    pub fn at(time: NaiveDateTime) -> Result<Self, Error> {
        let mut m = Self::new();
        m.0.set(TIME, &TimestampConverter, &time)?;
        Ok(m)
    }

    pub fn time(&self) -> Result<NaiveDateTime, Error> {
        self.0.get(TIME, &TimestampConverter)
    }
}
