//! Message type declarations and message instances.

use core::fmt;

use log::{trace, warn};
use snafu::{ensure, OptionExt, ResultExt};

use crate::convert::{Converter, IntConverter, OverflowSnafu};
use crate::error::*;
use crate::field::{FieldDescriptor, FieldId, FieldTable, RevisionLayout};
use crate::header::{Header, HeaderError, HEADER_LEN};
use crate::layout::{counted_by, resolve_pack, resolve_parse, Placement};
use crate::types::{rev, Mid, Revision};

/// The data-driven declaration of one message type. It doubles as the
/// template a [`DispatchChain`](crate::DispatchChain) resolves packages with.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageType {
    mid: Mid,
    name: &'static str,
    table: FieldTable,
}

impl MessageType {
    pub const fn new(mid: Mid, name: &'static str, revisions: &'static [RevisionLayout]) -> Self {
        Self {
            mid,
            name,
            table: FieldTable::new(revisions),
        }
    }

    pub const fn mid(&self) -> Mid {
        self.mid
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn table(&self) -> &FieldTable {
        &self.table
    }

    /// The layout of `revision`.
    pub fn layout(&self, revision: Revision) -> Result<&'static RevisionLayout, Error> {
        self.table
            .revision(revision.effective())
            .context(UnsupportedRevisionSnafu {
                mid: self.mid,
                revision,
            })
    }

    /// Check every revision layout of this type.
    pub fn validate(&self) -> Result<(), Error> {
        ensure!(
            self.table.latest().is_some(),
            InvalidLayoutSnafu {
                mid: self.mid,
                revision: rev(1),
                reason: "no revisions",
            }
        );
        for layout in self.table.revisions() {
            layout.validate().map_err(|reason| Error::InvalidLayout {
                mid: self.mid,
                revision: layout.revision(),
                reason,
            })?;
        }
        Ok(())
    }

    /// A blank message of this type at its highest revision.
    pub fn blank(&'static self) -> MessageDescriptor {
        MessageDescriptor::new(self)
    }

    /// Parse a package of this type.
    ///
    /// Fails with [`Error::TypeMismatch`] if the package carries another MID.
    pub fn parse(&'static self, raw: &str) -> Result<MessageDescriptor, Error> {
        self.parse_bytes(raw.as_bytes())
    }

    /// Same as [`MessageType::parse`], for the ASCII bytes of a package.
    pub fn parse_bytes(&'static self, raw: &[u8]) -> Result<MessageDescriptor, Error> {
        let header = Header::decode(raw).context(MalformedHeaderSnafu)?;
        self.parse_with_header(header, raw)
    }

    pub(crate) fn parse_with_header(
        &'static self,
        header: Header,
        raw: &[u8],
    ) -> Result<MessageDescriptor, Error> {
        ensure!(
            header.mid == self.mid,
            TypeMismatchSnafu {
                expected: self.mid,
                found: header.mid,
            }
        );
        let raw = ascii(raw)?;
        if header.length != raw.len() {
            return Err(HeaderError::LengthMismatch {
                declared: header.length,
                actual: raw.len(),
            })
            .context(MalformedHeaderSnafu);
        }

        let layout = self.layout(header.effective_revision())?;
        let placements = resolve_parse(self.mid, layout, raw)?;
        let values = layout
            .fields()
            .iter()
            .zip(&placements)
            .map(|(descriptor, p)| {
                let slice = &raw[p.value_offset..p.end()];
                descriptor.validate(slice).context(MalformedFieldSnafu {
                    mid: self.mid,
                    field: p.field,
                })?;
                Ok(FieldValue {
                    descriptor,
                    raw: slice.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let end = placements.last().map_or(HEADER_LEN, Placement::end);
        if end < raw.len() {
            warn!(
                "MID {} rev {}: ignoring {} trailing characters",
                self.mid,
                layout.revision(),
                raw.len() - end
            );
        }

        Ok(MessageDescriptor {
            message_type: self,
            layout,
            header,
            values,
        })
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MID {} ({})", self.mid, self.name)
    }
}

/// View `raw` as text, rejecting anything but ASCII.
pub(crate) fn ascii(raw: &[u8]) -> Result<&str, Error> {
    if let Some(position) = raw.iter().position(|c| !c.is_ascii()) {
        return NonAsciiPackageSnafu { position }.fail();
    }
    core::str::from_utf8(raw)
        .ok()
        .context(NonAsciiPackageSnafu { position: 0usize })
}

/// The current raw slice of one field, at its exact wire width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    descriptor: &'static FieldDescriptor,
    raw: String,
}

impl FieldValue {
    fn blank(descriptor: &'static FieldDescriptor) -> Self {
        Self {
            descriptor,
            raw: descriptor.blank(),
        }
    }

    pub fn descriptor(&self) -> &'static FieldDescriptor {
        self.descriptor
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// One decoded or to-be-encoded message occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    message_type: &'static MessageType,
    layout: &'static RevisionLayout,
    header: Header,
    values: Vec<FieldValue>,
}

const NO_FIELDS: RevisionLayout = RevisionLayout::new(rev(1), &[]);

impl MessageDescriptor {
    /// A blank message at the highest revision `message_type` supports.
    pub fn new(message_type: &'static MessageType) -> Self {
        let layout = message_type.table.latest().unwrap_or(&NO_FIELDS);
        let mut header = Header::new(message_type.mid);
        header.revision = Some(layout.revision());
        Self {
            message_type,
            layout,
            header,
            values: layout.fields().iter().map(FieldValue::blank).collect(),
        }
    }

    pub fn with_revision(mut self, revision: Revision) -> Result<Self, Error> {
        self.set_revision(revision)?;
        Ok(self)
    }

    /// Switch to another revision. Values of fields declared identically in
    /// both revisions are kept, all others start out blank.
    pub fn set_revision(&mut self, revision: Revision) -> Result<(), Error> {
        let layout = self.message_type.layout(revision)?;
        let mut old = core::mem::take(&mut self.values);
        self.values = layout
            .fields()
            .iter()
            .map(|descriptor| {
                match old.iter().position(|v| v.descriptor == descriptor) {
                    Some(i) => old.swap_remove(i),
                    None => FieldValue::blank(descriptor),
                }
            })
            .collect();
        self.layout = layout;
        self.header.revision = Some(revision);
        Ok(())
    }

    pub fn message_type(&self) -> &'static MessageType {
        self.message_type
    }

    pub fn mid(&self) -> Mid {
        self.message_type.mid
    }

    /// The effective revision, blank and `000` being revision 1.
    pub fn revision(&self) -> Revision {
        self.layout.revision()
    }

    pub fn layout(&self) -> &'static RevisionLayout {
        self.layout
    }

    /// The header as received, or as written by the last [`pack`](Self::pack).
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn set_no_ack(&mut self, no_ack: Option<bool>) {
        self.header.no_ack = no_ack;
    }

    pub fn set_station_id(&mut self, station_id: Option<u8>) {
        self.header.station_id = station_id;
    }

    pub fn set_spindle_id(&mut self, spindle_id: Option<u8>) {
        self.header.spindle_id = spindle_id;
    }

    pub fn set_sequence_number(&mut self, sequence_number: Option<u8>) {
        self.header.sequence_number = sequence_number;
    }

    /// Set the number of message parts and the number of this part.
    pub fn set_message_part(&mut self, parts: Option<u8>, number: Option<u8>) {
        self.header.message_parts = parts;
        self.header.message_part_number = number;
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    fn index_of(&self, field: FieldId) -> Result<usize, Error> {
        self.values
            .iter()
            .position(|v| v.descriptor.id() == field)
            .context(UnknownFieldSnafu {
                mid: self.mid(),
                revision: self.revision(),
                field,
            })
    }

    /// The raw slice of `field`.
    pub fn raw(&self, field: FieldId) -> Result<&str, Error> {
        Ok(&self.values[self.index_of(field)?].raw)
    }

    /// Decode `field` with `converter`.
    pub fn get<C: Converter>(&self, field: FieldId, converter: &C) -> Result<C::Value, Error> {
        converter
            .decode(self.raw(field)?)
            .context(MalformedFieldSnafu {
                mid: self.mid(),
                field,
            })
    }

    /// Encode `value` into `field` with `converter`.
    pub fn set<C: Converter>(
        &mut self,
        field: FieldId,
        converter: &C,
        value: &C::Value,
    ) -> Result<(), Error> {
        let i = self.index_of(field)?;
        let descriptor = self.values[i].descriptor;
        let raw = converter
            .encode(value, descriptor.width(), descriptor.padding())
            .context(MalformedFieldSnafu {
                mid: self.mid(),
                field,
            })?;
        trace!("MID {}: field {} set to {:?}", self.mid(), field, raw);
        self.values[i].raw = raw;
        Ok(())
    }

    /// Count fields, derived from the lengths of the lists they size.
    fn derived_counts(&self) -> Result<Vec<(usize, String)>, Error> {
        let mut counts = Vec::new();
        for (i, value) in self.values.iter().enumerate() {
            let descriptor = value.descriptor;
            if let Some((list, item_width)) = counted_by(self.layout, descriptor.id()) {
                let items = self.raw(list)?.len() / item_width;
                let raw = IntConverter
                    .encode(&(items as u32), descriptor.width(), descriptor.padding())
                    .context(MalformedFieldSnafu {
                        mid: self.mid(),
                        field: list,
                    })?;
                counts.push((i, raw));
            }
        }
        Ok(counts)
    }

    /// Where every field goes when the message is packed.
    pub fn placements(&self) -> Result<Vec<Placement>, Error> {
        resolve_pack(self.mid(), self.layout, |field| {
            self.raw(field).map_or(0, str::len)
        })
    }

    /// Serialize the message. Count fields and the header length are
    /// recomputed; the header is written last. A value its field's converter
    /// wouldn't accept on parse fails with [`Error::MalformedField`].
    pub fn pack(&mut self) -> Result<String, Error> {
        let mid = self.mid();
        let counts = self.derived_counts()?;
        for (i, raw) in counts {
            self.values[i].raw = raw;
        }
        let placements = self.placements()?;

        let mut body = String::new();
        for (i, (p, value)) in placements.iter().zip(&self.values).enumerate() {
            ensure!(
                p.offset == HEADER_LEN + body.len(),
                InvalidLayoutSnafu {
                    mid,
                    revision: self.revision(),
                    reason: "declared offset leaves a gap or overlaps",
                }
            );
            if self.layout.is_numbered() {
                body.push_str(&format!("{:02}", i + 1));
            }
            value
                .descriptor
                .validate(&value.raw)
                .context(MalformedFieldSnafu { mid, field: p.field })?;
            if value.raw.len() != p.size {
                return OverflowSnafu { width: p.size }
                    .fail()
                    .context(MalformedFieldSnafu { mid, field: p.field });
            }
            body.push_str(&value.raw);
        }

        self.header.mid = mid;
        self.header.length = HEADER_LEN + body.len();
        let header = self.header.encode().context(MalformedHeaderSnafu)?;
        let mut package: String = header.iter().map(|&c| char::from(c)).collect();
        package.push_str(&body);
        trace!("MID {}: packed {} characters", mid, package.len());
        Ok(package)
    }

    /// Same as [`pack`](Self::pack), as ASCII bytes.
    pub fn pack_bytes(&mut self) -> Result<Vec<u8>, Error> {
        self.pack().map(String::into_bytes)
    }

    /// Convert into the typed wrapper `T`.
    pub fn into_typed<T: Message>(self) -> Result<T, Error> {
        let expected = T::message_type().mid();
        ensure!(
            self.mid() == expected,
            TypeMismatchSnafu {
                expected,
                found: self.mid(),
            }
        );
        Ok(T::from_descriptor(self))
    }
}

/// A typed message wrapper around a [`MessageDescriptor`].
pub trait Message: Sized {
    fn message_type() -> &'static MessageType;

    /// Wrap `descriptor`, which must be of [`Message::message_type`].
    fn from_descriptor(descriptor: MessageDescriptor) -> Self;

    fn descriptor(&self) -> &MessageDescriptor;

    fn descriptor_mut(&mut self) -> &mut MessageDescriptor;

    fn into_descriptor(self) -> MessageDescriptor;

    fn revision(&self) -> Revision {
        self.descriptor().revision()
    }

    fn pack(&mut self) -> Result<String, Error> {
        self.descriptor_mut().pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ListConverter, Relay, SubRecord};
    use crate::types::mid;

    const DEVICE: FieldId = FieldId(0);
    const COUNT: FieldId = FieldId(1);
    const RELAYS: FieldId = FieldId(2);
    const NOTE: FieldId = FieldId(3);

    const REV_1: &[FieldDescriptor] = &[FieldDescriptor::fixed(DEVICE, 20, 2)
        .left_padded('0')
        .converted_by::<IntConverter>()];
    const REV_2: &[FieldDescriptor] = &[
        FieldDescriptor::fixed(DEVICE, 20, 2)
            .left_padded('0')
            .converted_by::<IntConverter>(),
        FieldDescriptor::fixed(COUNT, 22, 2).left_padded('0'),
        FieldDescriptor::counted(RELAYS, 24, COUNT, Relay::WIDTH)
            .converted_by::<ListConverter<Relay>>(),
        FieldDescriptor::fixed(NOTE, 0, 3),
    ];
    const REVISIONS: &[RevisionLayout] =
        &[RevisionLayout::new(rev(1), REV_1), RevisionLayout::new(rev(2), REV_2)];
    static TEST_TYPE: MessageType = MessageType::new(mid(9000), "Test", REVISIONS);

    fn relays(n: u16) -> Vec<Relay> {
        (1..=n)
            .map(|number| Relay {
                number,
                status: number % 2 == 0,
            })
            .collect()
    }

    #[test]
    fn test_blank_message() {
        let mut m = TEST_TYPE.blank();
        assert_eq!(m.revision(), rev(2));
        assert_eq!(m.pack().unwrap(), "00279000002         0000   ");
    }

    #[test]
    fn test_pack_and_parse() {
        let mut m = TEST_TYPE.blank();
        m.set(DEVICE, &IntConverter, &7).unwrap();
        m.set(RELAYS, &ListConverter::<Relay>::new(), &relays(3))
            .unwrap();
        let raw = m.pack().unwrap();
        assert_eq!(raw, "00399000002         0703001000210030   ");
        assert_eq!(m.get(COUNT, &IntConverter).unwrap(), 3);

        let parsed = TEST_TYPE.parse(&raw).unwrap();
        assert_eq!(parsed, m);
        assert_eq!(
            parsed.get(RELAYS, &ListConverter::<Relay>::new()).unwrap(),
            relays(3)
        );
    }

    #[test]
    fn test_set_revision() {
        let mut m = TEST_TYPE.blank();
        m.set(DEVICE, &IntConverter, &5).unwrap();
        m.set_revision(rev(1)).unwrap();
        assert_eq!(m.get(DEVICE, &IntConverter).unwrap(), 5);
        assert!(matches!(
            m.get(COUNT, &IntConverter),
            Err(Error::UnknownField { .. })
        ));
        assert_eq!(m.pack().unwrap(), "00229000001         05");
        assert!(matches!(
            m.set_revision(rev(3)),
            Err(Error::UnsupportedRevision { .. })
        ));
    }

    #[test]
    fn test_parse_validates_fields() {
        assert!(matches!(
            TEST_TYPE.parse("00229000001         x5"),
            Err(Error::MalformedField { field: DEVICE, .. })
        ));
        assert!(matches!(
            TEST_TYPE.parse("00239000001         05"),
            Err(Error::MalformedHeader {
                source: HeaderError::LengthMismatch { .. }
            })
        ));
        assert!(matches!(
            TEST_TYPE.parse("00229001001         05"),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            TEST_TYPE.parse("00229000004         05"),
            Err(Error::UnsupportedRevision { .. })
        ));
    }

    #[test]
    fn test_value_overflow() {
        let mut m = TEST_TYPE.blank();
        assert!(matches!(
            m.set(DEVICE, &IntConverter, &100),
            Err(Error::MalformedField { field: DEVICE, .. })
        ));
    }

    #[test]
    fn test_pack_rejects_undecodable_values() {
        let mut m = TEST_TYPE.blank().with_revision(rev(1)).unwrap();
        m.values[0].raw = "x5".to_owned();
        assert!(matches!(
            m.pack(),
            Err(Error::MalformedField { field: DEVICE, .. })
        ));
    }

    #[test]
    fn test_validate() {
        assert_eq!(TEST_TYPE.validate(), Ok(()));
    }
}
