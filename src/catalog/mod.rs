//! Message type declarations, grouped as in the protocol documentation, and
//! the [`MessageCatalog`] that assembles them into a [`DispatchChain`].
//!
//! ## Example
//! ```
//! use openproto_mid::catalog::{JobBatchDecrement, MessageCatalog};
//!
//! let chain = MessageCatalog::new().job_advanced().build().unwrap();
//! let m: JobBatchDecrement = chain.parse_as("00290129002         010302123").unwrap();
//! assert_eq!(m.parameter_set_id().unwrap(), 123);
//! ```

use crate::dispatch::DispatchChain;
use crate::error::Error;
use crate::message::MessageType;

/// Declare the typed wrapper of a message type.
macro_rules! message {
    ($(#[$meta:meta])* $name:ident, $static:ident, $mid:expr, $title:expr, $revisions:expr) => {
        pub static $static: $crate::message::MessageType =
            $crate::message::MessageType::new($crate::types::mid($mid), $title, $revisions);

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name($crate::message::MessageDescriptor);

        impl $name {
            /// A blank message at the highest supported revision.
            pub fn new() -> Self {
                Self($crate::message::MessageDescriptor::new(&$static))
            }

            /// A blank message at `revision`.
            pub fn with_revision(
                revision: $crate::types::Revision,
            ) -> Result<Self, $crate::error::Error> {
                Ok(Self(
                    $crate::message::MessageDescriptor::new(&$static).with_revision(revision)?,
                ))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $crate::message::Message for $name {
            fn message_type() -> &'static $crate::message::MessageType {
                &$static
            }

            fn from_descriptor(descriptor: $crate::message::MessageDescriptor) -> Self {
                Self(descriptor)
            }

            fn descriptor(&self) -> &$crate::message::MessageDescriptor {
                &self.0
            }

            fn descriptor_mut(&mut self) -> &mut $crate::message::MessageDescriptor {
                &mut self.0
            }

            fn into_descriptor(self) -> $crate::message::MessageDescriptor {
                self.0
            }
        }
    };
}

pub mod automatic_manual_mode;
pub mod communication;
pub mod io_interface;
pub mod job_advanced;
pub mod time;

pub use automatic_manual_mode::{
    AutoDisableSettingsReply, AutoDisableSettingsRequest, AutomaticManualMode,
    AutomaticManualModeAcknowledge, AutomaticManualModeSubscribe, AutomaticManualModeUnsubscribe,
    AutomaticManualModeUpload,
};
pub use communication::{
    CommandAccepted, CommandError, CommunicationStart, CommunicationStartAcknowledge,
    CommunicationStop,
};
pub use io_interface::{IoDeviceStatusReply, IoDeviceStatusRequest};
pub use job_advanced::JobBatchDecrement;
pub use time::{ReadTimeReply, ReadTimeRequest, SetTime};

/// An ordered selection of message types to build a [`DispatchChain`] from.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    selected: Vec<&'static MessageType>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message type declared in this crate.
    pub fn all() -> Self {
        Self::new()
            .communication()
            .time()
            .job_advanced()
            .io_interface()
            .automatic_manual_mode()
    }

    /// Add one message type.
    pub fn with(mut self, message_type: &'static MessageType) -> Self {
        self.selected.push(message_type);
        self
    }

    pub fn with_all<I>(self, types: I) -> Self
    where
        I: IntoIterator<Item = &'static MessageType>,
    {
        types.into_iter().fold(self, Self::with)
    }

    pub fn communication(self) -> Self {
        self.with_all(communication::TYPES.iter().copied())
    }

    pub fn time(self) -> Self {
        self.with_all(time::TYPES.iter().copied())
    }

    pub fn job_advanced(self) -> Self {
        self.with_all(job_advanced::TYPES.iter().copied())
    }

    pub fn io_interface(self) -> Self {
        self.with_all(io_interface::TYPES.iter().copied())
    }

    pub fn automatic_manual_mode(self) -> Self {
        self.with_all(automatic_manual_mode::TYPES.iter().copied())
    }

    pub fn selected(&self) -> &[&'static MessageType] {
        &self.selected
    }

    /// Build the chain. Fails with [`Error::DuplicateMessageId`] if a message
    /// type was selected twice.
    pub fn build(&self) -> Result<DispatchChain, Error> {
        DispatchChain::build(self.selected.iter().copied())
    }
}
