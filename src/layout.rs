//! Resolution of actual field offsets and sizes.
//!
//! Fields sit at their declared offsets until a counted list has been resolved.
//! From then on each field starts where its predecessor ends, so every
//! count/list pair shifts all later fields by the list's actual size.

use log::trace;
use snafu::{ensure, OptionExt, ResultExt};

use crate::convert::{
    Converter, FieldError, IntConverter, PartialItemSnafu, TruncatedSnafu, WrongOrdinalSnafu,
};
use crate::error::{Error, InvalidLayoutSnafu, MalformedFieldSnafu};
use crate::field::{FieldDescriptor, FieldId, FieldSize, RevisionLayout};
use crate::types::Mid;

/// Where one field ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub field: FieldId,
    /// Start of the field's span, ordinal included.
    pub offset: usize,
    /// Start of the value.
    pub value_offset: usize,
    /// Width of the value.
    pub size: usize,
}

impl Placement {
    pub const fn end(&self) -> usize {
        self.value_offset.saturating_add(self.size)
    }
}

/// Walk `layout` in declaration order. `counted_size` returns the resolved
/// width of a counted list given the placements resolved so far.
fn resolve<F>(
    mid: Mid,
    layout: &RevisionLayout,
    mut counted_size: F,
) -> Result<Vec<Placement>, Error>
where
    F: FnMut(&FieldDescriptor, FieldId, usize, &[Placement]) -> Result<usize, Error>,
{
    let mut placements: Vec<Placement> = Vec::with_capacity(layout.fields().len());
    let mut shifted = false;
    for field in layout.fields() {
        let offset = match placements.last() {
            Some(prev) if shifted => prev.end(),
            _ => field.offset(),
        };
        let size = match field.size() {
            FieldSize::Fixed(w) => w,
            FieldSize::Counted { count, item_width } => {
                shifted = true;
                counted_size(field, count, item_width, &placements)?
            }
        };
        let placement = Placement {
            field: field.id(),
            offset,
            value_offset: offset + layout.prefix_len(),
            size,
        };
        trace!(
            "MID {} rev {}: field {} at {}..{}",
            mid,
            layout.revision(),
            placement.field,
            placement.value_offset,
            placement.end()
        );
        placements.push(placement);
    }
    Ok(placements)
}

/// Resolve the layout of a received package, checking that every field,
/// ordinal included, lies within `raw`.
pub(crate) fn resolve_parse(
    mid: Mid,
    layout: &RevisionLayout,
    raw: &str,
) -> Result<Vec<Placement>, Error> {
    let placements = resolve(mid, layout, |field, count, item_width, resolved| {
        let count_at = resolved
            .iter()
            .find(|p| p.field == count)
            .context(InvalidLayoutSnafu {
                mid,
                revision: layout.revision(),
                reason: "count field unresolved",
            })?;
        ensure_within(raw, count_at).context(MalformedFieldSnafu { mid, field: count })?;
        let items = IntConverter
            .decode(&raw[count_at.value_offset..count_at.end()])
            .context(MalformedFieldSnafu { mid, field: count })?;
        trace!("MID {}: field {} holds {} items", mid, field.id(), items);
        Ok((items as usize).saturating_mul(item_width))
    })?;

    for (i, p) in placements.iter().enumerate() {
        ensure_within(raw, p).context(MalformedFieldSnafu { mid, field: p.field })?;
        if layout.is_numbered() {
            let expected = i + 1;
            let found = &raw[p.offset..p.value_offset];
            if found != format!("{:02}", expected) {
                return WrongOrdinalSnafu { expected, found }
                    .fail()
                    .context(MalformedFieldSnafu { mid, field: p.field });
            }
        }
    }
    Ok(placements)
}

fn ensure_within(raw: &str, p: &Placement) -> Result<(), FieldError> {
    ensure!(
        p.end() <= raw.len(),
        TruncatedSnafu {
            needed: p.end(),
            available: raw.len(),
        }
    );
    Ok(())
}

/// Resolve the layout for packing. `value_len` gives the current raw length
/// of a field's value.
pub(crate) fn resolve_pack<F>(
    mid: Mid,
    layout: &RevisionLayout,
    value_len: F,
) -> Result<Vec<Placement>, Error>
where
    F: Fn(FieldId) -> usize,
{
    resolve(mid, layout, |field, _count, item_width, _| {
        let len = value_len(field.id());
        if len % item_width != 0 {
            return PartialItemSnafu { len, item_width }
                .fail()
                .context(MalformedFieldSnafu {
                    mid,
                    field: field.id(),
                });
        }
        Ok(len)
    })
}

/// The list whose length `count` holds, if any.
pub(crate) fn counted_by(layout: &RevisionLayout, count: FieldId) -> Option<(FieldId, usize)> {
    layout.fields().iter().find_map(|f| match f.size() {
        FieldSize::Counted {
            count: c,
            item_width,
        } if c == count => Some((f.id(), item_width)),
        _ => None,
    })
}
