//! Message framework for Open Protocol, the fixed width ASCII protocol spoken
//! by tightening controllers and their integrators.
//!
//! This crate does no IO. Message types are declared once as static data: a
//! MID, and for every supported revision the offset, width and padding of each
//! field. A [`DispatchChain`] resolves a received package to its message type
//! by the MID in its [`Header`] and parses it into a [`MessageDescriptor`],
//! which packs back into the same characters.
//!
//! Counted lists are supported: a field holding the number of items sizes a
//! later list field, and every field after the list shifts by the list's
//! actual width.
//!
//! ## Example
//! ```
//! use openproto_mid::catalog::{IoDeviceStatusReply, MessageCatalog};
//! use openproto_mid::convert::{DigitalInput, Relay};
//! use openproto_mid::Message;
//!
//! let mut reply = IoDeviceStatusReply::new();
//! reply.set_io_device_id(1).unwrap();
//! reply
//!     .set_relays(vec![
//!         Relay { number: 1, status: true },
//!         Relay { number: 2, status: false },
//!     ])
//!     .unwrap();
//! reply
//!     .set_digital_inputs(vec![DigitalInput { number: 5, status: true }])
//!     .unwrap();
//! let raw = reply.pack().unwrap();
//! assert_eq!(raw, "00480215002         0101020203001100200401050051");
//!
//! let chain = MessageCatalog::all().build().unwrap();
//! let parsed: IoDeviceStatusReply = chain.parse_as(&raw).unwrap();
//! assert_eq!(parsed, reply);
//! ```

pub mod catalog;
pub mod convert;
pub mod dispatch;
mod error;
pub mod field;
pub mod header;
pub mod layout;
pub mod message;
pub mod types;

pub use dispatch::DispatchChain;
pub use error::Error;
pub use field::FieldId;
pub use header::{Header, HEADER_LEN};
pub use layout::Placement;
pub use message::{Message, MessageDescriptor, MessageType};
pub use types::{mid, rev, Mid, Revision};
