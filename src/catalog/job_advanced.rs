//! Advanced job messages.

use crate::convert::IntConverter;
use crate::error::Error;
use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
use crate::message::MessageType;
use crate::types::rev;

pub static TYPES: &[&MessageType] = &[&JOB_BATCH_DECREMENT];

const REV_2: &[FieldDescriptor] = &[
    FieldDescriptor::fixed(JobBatchDecrement::CHANNEL_ID, 20, 2)
        .left_padded('0')
        .converted_by::<IntConverter>(),
    FieldDescriptor::fixed(JobBatchDecrement::PARAMETER_SET_ID, 24, 3)
        .left_padded('0')
        .converted_by::<IntConverter>(),
];

message!(
    /// Decrements the batch counter of the running job. Revision 1 decrements
    /// the batch of the current parameter set, revision 2 names channel and
    /// parameter set explicitly.
    JobBatchDecrement,
    JOB_BATCH_DECREMENT,
    129,
    "Job batch decrement",
    &[
        RevisionLayout::new(rev(1), &[]),
        RevisionLayout::numbered(rev(2), REV_2),
    ]
);

impl JobBatchDecrement {
    pub const CHANNEL_ID: FieldId = FieldId(0);
    pub const PARAMETER_SET_ID: FieldId = FieldId(1);

    /// A revision 2 decrement for `parameter_set_id` on `channel_id`.
    pub fn for_parameter_set(channel_id: u32, parameter_set_id: u32) -> Result<Self, Error> {
        let mut m = Self::new();
        m.set_channel_id(channel_id)?;
        m.set_parameter_set_id(parameter_set_id)?;
        Ok(m)
    }

    pub fn channel_id(&self) -> Result<u32, Error> {
        self.0.get(Self::CHANNEL_ID, &IntConverter)
    }

    pub fn set_channel_id(&mut self, channel_id: u32) -> Result<(), Error> {
        self.0.set(Self::CHANNEL_ID, &IntConverter, &channel_id)
    }

    pub fn parameter_set_id(&self) -> Result<u32, Error> {
        self.0.get(Self::PARAMETER_SET_ID, &IntConverter)
    }

    pub fn set_parameter_set_id(&mut self, parameter_set_id: u32) -> Result<(), Error> {
        self.0
            .set(Self::PARAMETER_SET_ID, &IntConverter, &parameter_set_id)
    }
}
