//! Application link messages, MID 0001 to 0005.

use crate::convert::{IntConverter, MidConverter, TextConverter};
use crate::error::Error;
use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
use crate::message::MessageType;
use crate::types::{rev, Mid};

pub static TYPES: &[&MessageType] = &[
    &COMMUNICATION_START,
    &COMMUNICATION_START_ACKNOWLEDGE,
    &COMMUNICATION_STOP,
    &COMMAND_ERROR,
    &COMMAND_ACCEPTED,
];

const NO_DATA: &[FieldDescriptor] = &[];

message!(
    /// Sent by the integrator to enable the communication. The revision
    /// requests a protocol level; the message itself carries no data.
    CommunicationStart,
    COMMUNICATION_START,
    1,
    "Application communication start",
    &[
        RevisionLayout::new(rev(1), NO_DATA),
        RevisionLayout::new(rev(2), NO_DATA),
        RevisionLayout::new(rev(3), NO_DATA),
        RevisionLayout::new(rev(4), NO_DATA),
        RevisionLayout::new(rev(5), NO_DATA),
        RevisionLayout::new(rev(6), NO_DATA),
    ]
);

const CELL_ID: FieldDescriptor =
    FieldDescriptor::fixed(CommunicationStartAcknowledge::CELL_ID, 20, 4)
        .left_padded('0')
        .converted_by::<IntConverter>();
const CHANNEL_ID: FieldDescriptor =
    FieldDescriptor::fixed(CommunicationStartAcknowledge::CHANNEL_ID, 26, 2)
        .left_padded('0')
        .converted_by::<IntConverter>();
const CONTROLLER_NAME: FieldDescriptor =
    FieldDescriptor::fixed(CommunicationStartAcknowledge::CONTROLLER_NAME, 30, 25);
const SUPPLIER_CODE: FieldDescriptor =
    FieldDescriptor::fixed(CommunicationStartAcknowledge::SUPPLIER_CODE, 57, 3);

const ACK_REV_1: &[FieldDescriptor] = &[CELL_ID, CHANNEL_ID, CONTROLLER_NAME];
const ACK_REV_2: &[FieldDescriptor] = &[CELL_ID, CHANNEL_ID, CONTROLLER_NAME, SUPPLIER_CODE];
const ACK_REV_3: &[FieldDescriptor] = &[
    CELL_ID,
    CHANNEL_ID,
    CONTROLLER_NAME,
    SUPPLIER_CODE,
    FieldDescriptor::fixed(CommunicationStartAcknowledge::OPEN_PROTOCOL_VERSION, 62, 19),
    FieldDescriptor::fixed(CommunicationStartAcknowledge::CONTROLLER_SOFTWARE_VERSION, 83, 19),
    FieldDescriptor::fixed(CommunicationStartAcknowledge::TOOL_SOFTWARE_VERSION, 104, 19),
];

message!(
    /// The controller's answer to [`CommunicationStart`].
    CommunicationStartAcknowledge,
    COMMUNICATION_START_ACKNOWLEDGE,
    2,
    "Application communication start acknowledge",
    &[
        RevisionLayout::numbered(rev(1), ACK_REV_1),
        RevisionLayout::numbered(rev(2), ACK_REV_2),
        RevisionLayout::numbered(rev(3), ACK_REV_3),
    ]
);

impl CommunicationStartAcknowledge {
    pub const CELL_ID: FieldId = FieldId(0);
    pub const CHANNEL_ID: FieldId = FieldId(1);
    pub const CONTROLLER_NAME: FieldId = FieldId(2);
    /// Revision 2 and later.
    pub const SUPPLIER_CODE: FieldId = FieldId(3);
    /// Revision 3 and later.
    pub const OPEN_PROTOCOL_VERSION: FieldId = FieldId(4);
    pub const CONTROLLER_SOFTWARE_VERSION: FieldId = FieldId(5);
    pub const TOOL_SOFTWARE_VERSION: FieldId = FieldId(6);

    pub fn cell_id(&self) -> Result<u32, Error> {
        self.0.get(Self::CELL_ID, &IntConverter)
    }

    pub fn set_cell_id(&mut self, cell_id: u32) -> Result<(), Error> {
        self.0.set(Self::CELL_ID, &IntConverter, &cell_id)
    }

    pub fn channel_id(&self) -> Result<u32, Error> {
        self.0.get(Self::CHANNEL_ID, &IntConverter)
    }

    pub fn set_channel_id(&mut self, channel_id: u32) -> Result<(), Error> {
        self.0.set(Self::CHANNEL_ID, &IntConverter, &channel_id)
    }

    pub fn controller_name(&self) -> Result<String, Error> {
        self.0.get(Self::CONTROLLER_NAME, &TextConverter)
    }

    pub fn set_controller_name(&mut self, name: impl Into<String>) -> Result<(), Error> {
        self.0.set(Self::CONTROLLER_NAME, &TextConverter, &name.into())
    }

    pub fn supplier_code(&self) -> Result<String, Error> {
        self.0.get(Self::SUPPLIER_CODE, &TextConverter)
    }

    pub fn set_supplier_code(&mut self, code: impl Into<String>) -> Result<(), Error> {
        self.0.set(Self::SUPPLIER_CODE, &TextConverter, &code.into())
    }

    /// Text field of revision 3, by id.
    pub fn version(&self, field: FieldId) -> Result<String, Error> {
        self.0.get(field, &TextConverter)
    }

    pub fn set_version(&mut self, field: FieldId, version: impl Into<String>) -> Result<(), Error> {
        self.0.set(field, &TextConverter, &version.into())
    }
}

message!(
    /// Disables the communication.
    CommunicationStop,
    COMMUNICATION_STOP,
    3,
    "Application communication stop",
    &[RevisionLayout::new(rev(1), NO_DATA)]
);

const COMMAND_ERROR_REV_1: &[FieldDescriptor] = &[
    FieldDescriptor::fixed(CommandError::REQUEST_MID, 20, 4)
        .left_padded('0')
        .converted_by::<MidConverter>(),
    FieldDescriptor::fixed(CommandError::ERROR_CODE, 24, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
];

message!(
    /// Negative answer to a request.
    CommandError,
    COMMAND_ERROR,
    4,
    "Application communication negative acknowledge",
    &[RevisionLayout::new(rev(1), COMMAND_ERROR_REV_1)]
);

impl CommandError {
    pub const REQUEST_MID: FieldId = FieldId(0);
    pub const ERROR_CODE: FieldId = FieldId(1);

    /// An error answer to `request`.
    pub fn for_request(request: Mid, error_code: u32) -> Result<Self, Error> {
        let mut m = Self::new();
        m.0.set(Self::REQUEST_MID, &MidConverter, &request)?;
        m.0.set(Self::ERROR_CODE, &IntConverter, &error_code)?;
        Ok(m)
    }

    /// The MID of the rejected request.
    pub fn request_mid(&self) -> Result<Mid, Error> {
        self.0.get(Self::REQUEST_MID, &MidConverter)
    }

    pub fn error_code(&self) -> Result<u32, Error> {
        self.0.get(Self::ERROR_CODE, &IntConverter)
    }
}

const COMMAND_ACCEPTED_REV_1: &[FieldDescriptor] = &[FieldDescriptor::fixed(
    CommandAccepted::MID_ACCEPTED,
    20,
    4,
)
.left_padded('0')
.converted_by::<MidConverter>()];

message!(
    /// Positive answer to a request.
    CommandAccepted,
    COMMAND_ACCEPTED,
    5,
    "Application communication positive acknowledge",
    &[RevisionLayout::new(rev(1), COMMAND_ACCEPTED_REV_1)]
);

impl CommandAccepted {
    pub const MID_ACCEPTED: FieldId = FieldId(0);

    pub fn for_request(request: Mid) -> Result<Self, Error> {
        let mut m = Self::new();
        m.0.set(Self::MID_ACCEPTED, &MidConverter, &request)?;
        Ok(m)
    }

    pub fn mid_accepted(&self) -> Result<Mid, Error> {
        self.0.get(Self::MID_ACCEPTED, &MidConverter)
    }
}
