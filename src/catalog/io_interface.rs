//! IO device status, MID 0214 and 0215.
//!
//! Revision 1 of the reply carries eight relays and eight digital inputs in
//! fixed width lists. Revision 2 announces the number of items in a count
//! field in front of each list.

use crate::convert::{DigitalInput, IntConverter, ListConverter, Relay, SubRecord};
use crate::error::Error;
use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
use crate::message::MessageType;
use crate::types::rev;

pub static TYPES: &[&MessageType] = &[&IO_DEVICE_STATUS_REQUEST, &IO_DEVICE_STATUS_REPLY];

/// Number of items in the fixed lists of revision 1.
pub const FIXED_LIST_ITEMS: usize = 8;

const REQUEST_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::fixed(
    IoDeviceStatusRequest::IO_DEVICE_ID,
    20,
    2,
)
.left_padded('0')
.converted_by::<IntConverter>()];

message!(
    /// Asks for the relay and digital input status of one IO device.
    IoDeviceStatusRequest,
    IO_DEVICE_STATUS_REQUEST,
    214,
    "IO device status request",
    &[
        RevisionLayout::new(rev(1), REQUEST_FIELDS),
        RevisionLayout::new(rev(2), REQUEST_FIELDS),
    ]
);

impl IoDeviceStatusRequest {
    pub const IO_DEVICE_ID: FieldId = FieldId(0);

    pub fn for_device(io_device_id: u32) -> Result<Self, Error> {
        let mut m = Self::new();
        m.0.set(Self::IO_DEVICE_ID, &IntConverter, &io_device_id)?;
        Ok(m)
    }

    pub fn io_device_id(&self) -> Result<u32, Error> {
        self.0.get(Self::IO_DEVICE_ID, &IntConverter)
    }
}

const DEVICE_ID: FieldDescriptor = FieldDescriptor::fixed(IoDeviceStatusReply::IO_DEVICE_ID, 20, 2)
    .left_padded('0')
    .converted_by::<IntConverter>();

const REPLY_REV_1: &[FieldDescriptor] = &[
    DEVICE_ID,
    FieldDescriptor::fixed(
        IoDeviceStatusReply::RELAY_LIST,
        24,
        FIXED_LIST_ITEMS * Relay::WIDTH,
    )
    .converted_by::<ListConverter<Relay>>(),
    FieldDescriptor::fixed(
        IoDeviceStatusReply::DIGITAL_INPUT_LIST,
        58,
        FIXED_LIST_ITEMS * DigitalInput::WIDTH,
    )
    .converted_by::<ListConverter<DigitalInput>>(),
];

const REPLY_REV_2: &[FieldDescriptor] = &[
    DEVICE_ID,
    FieldDescriptor::fixed(IoDeviceStatusReply::NUMBER_OF_RELAYS, 24, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
    FieldDescriptor::counted(
        IoDeviceStatusReply::RELAY_LIST,
        28,
        IoDeviceStatusReply::NUMBER_OF_RELAYS,
        Relay::WIDTH,
    )
    .converted_by::<ListConverter<Relay>>(),
    FieldDescriptor::fixed(IoDeviceStatusReply::NUMBER_OF_DIGITAL_INPUTS, 0, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
    FieldDescriptor::counted(
        IoDeviceStatusReply::DIGITAL_INPUT_LIST,
        0,
        IoDeviceStatusReply::NUMBER_OF_DIGITAL_INPUTS,
        DigitalInput::WIDTH,
    )
    .converted_by::<ListConverter<DigitalInput>>(),
];

message!(
    /// Relay and digital input status of one IO device.
    IoDeviceStatusReply,
    IO_DEVICE_STATUS_REPLY,
    215,
    "IO device status reply",
    &[
        RevisionLayout::numbered(rev(1), REPLY_REV_1),
        RevisionLayout::numbered(rev(2), REPLY_REV_2),
    ]
);

impl IoDeviceStatusReply {
    pub const IO_DEVICE_ID: FieldId = FieldId(0);
    pub const RELAY_LIST: FieldId = FieldId(1);
    pub const DIGITAL_INPUT_LIST: FieldId = FieldId(2);
    /// Revision 2 only. Written by [`pack`](crate::Message::pack).
    pub const NUMBER_OF_RELAYS: FieldId = FieldId(3);
    /// Revision 2 only. Written by [`pack`](crate::Message::pack).
    pub const NUMBER_OF_DIGITAL_INPUTS: FieldId = FieldId(4);

    pub fn io_device_id(&self) -> Result<u32, Error> {
        self.0.get(Self::IO_DEVICE_ID, &IntConverter)
    }

    pub fn set_io_device_id(&mut self, io_device_id: u32) -> Result<(), Error> {
        self.0.set(Self::IO_DEVICE_ID, &IntConverter, &io_device_id)
    }

    pub fn relays(&self) -> Result<Vec<Relay>, Error> {
        self.0.get(Self::RELAY_LIST, &ListConverter::new())
    }

    /// Fails if more than [`FIXED_LIST_ITEMS`] relays are set at revision 1.
    pub fn set_relays(&mut self, relays: Vec<Relay>) -> Result<(), Error> {
        self.0.set(Self::RELAY_LIST, &ListConverter::new(), &relays)
    }

    pub fn digital_inputs(&self) -> Result<Vec<DigitalInput>, Error> {
        self.0.get(Self::DIGITAL_INPUT_LIST, &ListConverter::new())
    }

    pub fn set_digital_inputs(&mut self, inputs: Vec<DigitalInput>) -> Result<(), Error> {
        self.0
            .set(Self::DIGITAL_INPUT_LIST, &ListConverter::new(), &inputs)
    }

    /// The relay count as on the wire. Revision 2 only.
    pub fn number_of_relays(&self) -> Result<u32, Error> {
        self.0.get(Self::NUMBER_OF_RELAYS, &IntConverter)
    }

    pub fn number_of_digital_inputs(&self) -> Result<u32, Error> {
        self.0.get(Self::NUMBER_OF_DIGITAL_INPUTS, &IntConverter)
    }
}
