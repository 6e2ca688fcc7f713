//! Automatic/manual mode subscription, MID 0400 to 0403, and the AutoDisable
//! settings, MID 0410 and 0411.

use crate::convert::{EnumConverter, IntConverter, WireEnum};
use crate::error::Error;
use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
use crate::message::MessageType;
use crate::types::rev;

pub static TYPES: &[&MessageType] = &[
    &AUTOMATIC_MANUAL_MODE_SUBSCRIBE,
    &AUTOMATIC_MANUAL_MODE_UPLOAD,
    &AUTOMATIC_MANUAL_MODE_ACKNOWLEDGE,
    &AUTOMATIC_MANUAL_MODE_UNSUBSCRIBE,
    &AUTO_DISABLE_SETTINGS_REQUEST,
    &AUTO_DISABLE_SETTINGS_REPLY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomaticManualMode {
    Manual,
    Automatic,
}

impl WireEnum for AutomaticManualMode {
    fn code(self) -> u32 {
        match self {
            Self::Manual => 0,
            Self::Automatic => 1,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Manual),
            1 => Some(Self::Automatic),
            _ => None,
        }
    }
}

const NO_DATA: &[RevisionLayout] = &[RevisionLayout::new(rev(1), &[])];

message!(
    AutomaticManualModeSubscribe,
    AUTOMATIC_MANUAL_MODE_SUBSCRIBE,
    400,
    "Automatic/Manual mode subscribe",
    NO_DATA
);

const UPLOAD_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::fixed(
    AutomaticManualModeUpload::MODE,
    20,
    1,
)
.converted_by::<EnumConverter<AutomaticManualMode>>()];

message!(
    /// Sent on every mode change once subscribed.
    AutomaticManualModeUpload,
    AUTOMATIC_MANUAL_MODE_UPLOAD,
    401,
    "Automatic/Manual mode upload",
    &[RevisionLayout::new(rev(1), UPLOAD_FIELDS)]
);

impl AutomaticManualModeUpload {
    pub const MODE: FieldId = FieldId(0);

    pub fn in_mode(mode: AutomaticManualMode) -> Result<Self, Error> {
        let mut m = Self::new();
        m.set_mode(mode)?;
        Ok(m)
    }

    pub fn mode(&self) -> Result<AutomaticManualMode, Error> {
        self.0.get(Self::MODE, &EnumConverter::new())
    }

    pub fn set_mode(&mut self, mode: AutomaticManualMode) -> Result<(), Error> {
        self.0.set(Self::MODE, &EnumConverter::new(), &mode)
    }
}

message!(
    AutomaticManualModeAcknowledge,
    AUTOMATIC_MANUAL_MODE_ACKNOWLEDGE,
    402,
    "Automatic/Manual mode upload acknowledge",
    NO_DATA
);

message!(
    AutomaticManualModeUnsubscribe,
    AUTOMATIC_MANUAL_MODE_UNSUBSCRIBE,
    403,
    "Automatic/Manual mode unsubscribe",
    NO_DATA
);

message!(
    AutoDisableSettingsRequest,
    AUTO_DISABLE_SETTINGS_REQUEST,
    410,
    "AutoDisable settings request",
    NO_DATA
);

const SETTINGS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::fixed(AutoDisableSettingsReply::AUTO_DISABLE_SETTING, 20, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
    FieldDescriptor::fixed(AutoDisableSettingsReply::CURRENT_BATCH, 24, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
];

message!(
    /// The AutoDisable setting of the controller and the batch it applies to.
    AutoDisableSettingsReply,
    AUTO_DISABLE_SETTINGS_REPLY,
    411,
    "AutoDisable settings reply",
    &[RevisionLayout::numbered(rev(1), SETTINGS_FIELDS)]
);

impl AutoDisableSettingsReply {
    pub const AUTO_DISABLE_SETTING: FieldId = FieldId(0);
    pub const CURRENT_BATCH: FieldId = FieldId(1);

    pub fn auto_disable_setting(&self) -> Result<u32, Error> {
        self.0.get(Self::AUTO_DISABLE_SETTING, &IntConverter)
    }

    pub fn set_auto_disable_setting(&mut self, setting: u32) -> Result<(), Error> {
        self.0.set(Self::AUTO_DISABLE_SETTING, &IntConverter, &setting)
    }

    pub fn current_batch(&self) -> Result<u32, Error> {
        self.0.get(Self::CURRENT_BATCH, &IntConverter)
    }

    pub fn set_current_batch(&mut self, batch: u32) -> Result<(), Error> {
        self.0.set(Self::CURRENT_BATCH, &IntConverter, &batch)
    }
}
