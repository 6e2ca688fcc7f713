//! Field descriptors and per revision field tables.
//!
//! Tables are plain `const` data, declared once per message type and shared by
//! every instance of it:
//!
//! ```
//! use openproto_mid::field::{FieldDescriptor, FieldId, FieldTable, RevisionLayout};
//! use openproto_mid::rev;
//!
//! const CHANNEL_ID: FieldId = FieldId(0);
//! const PARAMETER_SET_ID: FieldId = FieldId(1);
//!
//! const REV_2: &[FieldDescriptor] = &[
//!     FieldDescriptor::fixed(CHANNEL_ID, 20, 2).left_padded('0'),
//!     FieldDescriptor::fixed(PARAMETER_SET_ID, 24, 3).left_padded('0'),
//! ];
//! const REVISIONS: &[RevisionLayout] = &[
//!     RevisionLayout::new(rev(1), &[]),
//!     RevisionLayout::numbered(rev(2), REV_2),
//! ];
//! const TABLE: FieldTable = FieldTable::new(REVISIONS);
//!
//! assert_eq!(TABLE.latest().map(|l| l.revision()), Some(rev(2)));
//! ```

use core::fmt;

use crate::convert::{Converter, FieldError};
use crate::header::HEADER_LEN;
use crate::types::Revision;

/// Width of the ordinal preceding every value of a numbered revision.
pub const ORDINAL_LEN: usize = 2;

/// Identifies a field within one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(pub u16);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side of the value the pad characters go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadOrientation {
    /// Value is right-aligned, pad characters on the left.
    Left,
    /// Value is left-aligned, pad characters on the right.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub fill: char,
    pub orientation: PadOrientation,
}

impl Padding {
    pub const fn left(fill: char) -> Self {
        Self {
            fill,
            orientation: PadOrientation::Left,
        }
    }

    pub const fn right(fill: char) -> Self {
        Self {
            fill,
            orientation: PadOrientation::Right,
        }
    }

    /// Pad `value` to `width`. Returns `None` if it doesn't fit.
    pub fn apply(&self, value: &str, width: usize) -> Option<String> {
        let len = value.len();
        if len > width {
            return None;
        }
        let fill: String = core::iter::repeat(self.fill).take(width - len).collect();
        Some(match self.orientation {
            PadOrientation::Left => fill + value,
            PadOrientation::Right => value.to_owned() + &fill,
        })
    }

    /// A value consisting of nothing but padding.
    pub fn blank(&self, width: usize) -> String {
        core::iter::repeat(self.fill).take(width).collect()
    }
}

/// Declared size of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSize {
    Fixed(usize),
    /// A list whose length in items is held by the `count` field.
    Counted { count: FieldId, item_width: usize },
}

/// Checks a received slice against the converter bound to its field.
pub type Validator = fn(&str) -> Result<(), FieldError>;

fn unchecked(_: &str) -> Result<(), FieldError> {
    Ok(())
}

fn decodes_with<C: Converter + Default>(raw: &str) -> Result<(), FieldError> {
    C::default().decode(raw).map(|_| ())
}

/// One positioned span of a message body.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    id: FieldId,
    offset: usize,
    size: FieldSize,
    padding: Padding,
    validate: Validator,
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.offset == other.offset
            && self.size == other.size
            && self.padding == other.padding
    }
}

impl Eq for FieldDescriptor {}

impl FieldDescriptor {
    /// A fixed width field at absolute package `offset`, right-padded with spaces.
    ///
    /// The offset of a field following a counted list is not known up front;
    /// it is ignored and the field is placed right after its predecessor.
    pub const fn fixed(id: FieldId, offset: usize, size: usize) -> Self {
        Self {
            id,
            offset,
            size: FieldSize::Fixed(size),
            padding: Padding::right(' '),
            validate: unchecked,
        }
    }

    /// A list field sized by the value of the earlier field `count`.
    pub const fn counted(id: FieldId, offset: usize, count: FieldId, item_width: usize) -> Self {
        Self {
            id,
            offset,
            size: FieldSize::Counted { count, item_width },
            padding: Padding::right(' '),
            validate: unchecked,
        }
    }

    pub const fn left_padded(self, fill: char) -> Self {
        Self {
            padding: Padding::left(fill),
            ..self
        }
    }

    pub const fn right_padded(self, fill: char) -> Self {
        Self {
            padding: Padding::right(fill),
            ..self
        }
    }

    /// Bind converter `C`: a received package is only accepted if this field
    /// decodes with it.
    pub const fn converted_by<C: Converter + Default>(self) -> Self {
        Self {
            validate: decodes_with::<C>,
            ..self
        }
    }

    pub(crate) fn validate(&self, raw: &str) -> Result<(), FieldError> {
        (self.validate)(raw)
    }

    pub const fn id(&self) -> FieldId {
        self.id
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn size(&self) -> FieldSize {
        self.size
    }

    pub const fn padding(&self) -> Padding {
        self.padding
    }

    /// Declared width, `None` for counted lists.
    pub const fn width(&self) -> Option<usize> {
        match self.size {
            FieldSize::Fixed(w) => Some(w),
            FieldSize::Counted { .. } => None,
        }
    }

    /// The value of a field nobody has written yet.
    pub(crate) fn blank(&self) -> String {
        match self.size {
            FieldSize::Fixed(w) => self.padding.blank(w),
            FieldSize::Counted { .. } => String::new(),
        }
    }
}

/// The field layout of one revision of a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionLayout {
    revision: Revision,
    numbered: bool,
    fields: &'static [FieldDescriptor],
}

impl RevisionLayout {
    pub const fn new(revision: Revision, fields: &'static [FieldDescriptor]) -> Self {
        Self {
            revision,
            numbered: false,
            fields,
        }
    }

    /// A layout where every value is preceded by its two digit ordinal,
    /// `01` for the first field. Declared offsets point at the ordinal.
    pub const fn numbered(revision: Revision, fields: &'static [FieldDescriptor]) -> Self {
        Self {
            revision,
            numbered: true,
            fields,
        }
    }

    pub const fn revision(&self) -> Revision {
        self.revision
    }

    pub const fn is_numbered(&self) -> bool {
        self.numbered
    }

    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub(crate) const fn prefix_len(&self) -> usize {
        if self.numbered {
            ORDINAL_LEN
        } else {
            0
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Check that the declared layout is gapless and that every counted field
    /// refers to an earlier fixed width field.
    pub fn validate(&self) -> Result<(), &'static str> {
        let mut end = HEADER_LEN;
        let mut shifted = false;
        for (i, field) in self.fields.iter().enumerate() {
            let earlier = &self.fields[..i];
            if earlier.iter().any(|f| f.id == field.id) {
                return Err("duplicate field id");
            }
            if !shifted && field.offset != end {
                return Err("declared offset leaves a gap or overlaps");
            }
            match field.size {
                FieldSize::Fixed(w) => end = end + self.prefix_len() + w,
                FieldSize::Counted { count, item_width } => {
                    if item_width == 0 {
                        return Err("zero item width");
                    }
                    match earlier.iter().find(|f| f.id == count) {
                        Some(c) if c.width().is_some() => {}
                        _ => return Err("count field must be an earlier fixed field"),
                    }
                    shifted = true;
                }
            }
        }
        Ok(())
    }
}

/// Mapping from revision to layout. A revision absent from the table is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTable {
    revisions: &'static [RevisionLayout],
}

impl FieldTable {
    /// `revisions` are expected in ascending order.
    pub const fn new(revisions: &'static [RevisionLayout]) -> Self {
        Self { revisions }
    }

    pub fn revision(&self, revision: Revision) -> Option<&'static RevisionLayout> {
        self.revisions.iter().find(|l| l.revision == revision)
    }

    /// The highest supported revision.
    pub fn latest(&self) -> Option<&'static RevisionLayout> {
        self.revisions.iter().max_by_key(|l| l.revision)
    }

    pub fn revisions(&self) -> impl Iterator<Item = &'static RevisionLayout> {
        self.revisions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::rev;

    const A: FieldId = FieldId(0);
    const COUNT: FieldId = FieldId(1);
    const LIST: FieldId = FieldId(2);
    const B: FieldId = FieldId(3);

    #[test]
    fn test_padding() {
        assert_eq!(Padding::left('0').apply("12", 4).unwrap(), "0012");
        assert_eq!(Padding::right(' ').apply("ab", 4).unwrap(), "ab  ");
        assert_eq!(Padding::left('0').apply("12345", 4), None);
        assert_eq!(Padding::right(' ').blank(3), "   ");
    }

    #[test]
    fn test_valid_layouts() {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::fixed(A, 20, 2),
            FieldDescriptor::fixed(COUNT, 24, 2).left_padded('0'),
            FieldDescriptor::counted(LIST, 28, COUNT, 4),
            FieldDescriptor::fixed(B, 0, 3),
        ];
        assert_eq!(RevisionLayout::numbered(rev(1), FIELDS).validate(), Ok(()));

        const PLAIN: &[FieldDescriptor] = &[
            FieldDescriptor::fixed(A, 20, 4),
            FieldDescriptor::fixed(B, 24, 2),
        ];
        assert_eq!(RevisionLayout::new(rev(1), PLAIN).validate(), Ok(()));
        assert_eq!(RevisionLayout::new(rev(1), &[]).validate(), Ok(()));
    }

    #[test]
    fn test_invalid_layouts() {
        const GAP: &[FieldDescriptor] = &[
            FieldDescriptor::fixed(A, 20, 4),
            FieldDescriptor::fixed(B, 25, 2),
        ];
        assert!(RevisionLayout::new(rev(1), GAP).validate().is_err());

        const LATE_COUNT: &[FieldDescriptor] = &[
            FieldDescriptor::counted(LIST, 20, COUNT, 4),
            FieldDescriptor::fixed(COUNT, 0, 2),
        ];
        assert!(RevisionLayout::new(rev(1), LATE_COUNT).validate().is_err());

        const DUPLICATE: &[FieldDescriptor] = &[
            FieldDescriptor::fixed(A, 20, 4),
            FieldDescriptor::fixed(A, 24, 2),
        ];
        assert!(RevisionLayout::new(rev(1), DUPLICATE).validate().is_err());

        const NO_WIDTH: &[FieldDescriptor] = &[
            FieldDescriptor::fixed(COUNT, 20, 2),
            FieldDescriptor::counted(LIST, 22, COUNT, 0),
        ];
        assert!(RevisionLayout::new(rev(1), NO_WIDTH).validate().is_err());
    }

    #[test]
    fn test_table_lookup() {
        const REVISIONS: &[RevisionLayout] = &[
            RevisionLayout::new(rev(1), &[]),
            RevisionLayout::new(rev(2), &[]),
        ];
        let table = FieldTable::new(REVISIONS);
        assert_eq!(table.latest().map(RevisionLayout::revision), Some(rev(2)));
        assert!(table.revision(rev(1)).is_some());
        assert!(table.revision(rev(3)).is_none());
    }
}
