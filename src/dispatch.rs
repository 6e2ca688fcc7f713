//! Resolution of raw packages to message types.
//!
//! A [`DispatchChain`] is an ordered set of [`MessageType`] templates with an
//! index by MID. Every package either hits exactly one template or fails with
//! [`Error::UnrecognizedMessageType`].

use std::collections::HashMap;

use log::debug;
use snafu::{ensure, OptionExt, ResultExt};

use crate::error::*;
use crate::header::Header;
use crate::message::{Message, MessageDescriptor, MessageType};
use crate::types::Mid;

/// Immutable after construction and safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct DispatchChain {
    templates: Vec<&'static MessageType>,
    by_mid: HashMap<Mid, usize>,
}

impl DispatchChain {
    /// Build a chain from `types`, in order.
    ///
    /// Fails with [`Error::DuplicateMessageId`] if two types share a MID and
    /// with [`Error::InvalidLayout`] if a field table breaks the layout rules.
    pub fn build<I>(types: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'static MessageType>,
    {
        let mut chain = Self::default();
        for message_type in types {
            message_type.validate()?;
            let mid = message_type.mid();
            ensure!(
                !chain.by_mid.contains_key(&mid),
                DuplicateMessageIdSnafu { mid }
            );
            chain.by_mid.insert(mid, chain.templates.len());
            chain.templates.push(message_type);
        }
        debug!("Built dispatch chain of {} message types", chain.templates.len());
        Ok(chain)
    }

    /// The templates in chain order.
    pub fn templates(&self) -> impl Iterator<Item = &'static MessageType> + '_ {
        self.templates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, mid: Mid) -> bool {
        self.by_mid.contains_key(&mid)
    }

    pub fn get(&self, mid: Mid) -> Option<&'static MessageType> {
        self.by_mid.get(&mid).map(|&i| self.templates[i])
    }

    fn lookup(&self, header: &Header) -> Result<&'static MessageType, Error> {
        let template = self
            .get(header.mid)
            .context(UnrecognizedMessageTypeSnafu { mid: header.mid })?;
        debug!("Package resolved to {}", template);
        Ok(template)
    }

    /// The template `raw` resolves to.
    pub fn resolve(&self, raw: &[u8]) -> Result<&'static MessageType, Error> {
        let header = Header::decode(raw).context(MalformedHeaderSnafu)?;
        self.lookup(&header)
    }

    /// Parse a package of any type in the chain.
    pub fn parse_any(&self, raw: &str) -> Result<MessageDescriptor, Error> {
        self.parse_any_bytes(raw.as_bytes())
    }

    /// Same as [`parse_any`](Self::parse_any), for the ASCII bytes of a package.
    pub fn parse_any_bytes(&self, raw: &[u8]) -> Result<MessageDescriptor, Error> {
        let header = Header::decode(raw).context(MalformedHeaderSnafu)?;
        self.lookup(&header)?.parse_with_header(header, raw)
    }

    /// Parse a package that is expected to be a `T`.
    ///
    /// Fails with [`Error::TypeMismatch`] if it resolves to another type.
    pub fn parse_as<T: Message>(&self, raw: &str) -> Result<T, Error> {
        self.parse_as_bytes(raw.as_bytes())
    }

    /// Same as [`parse_as`](Self::parse_as), for the ASCII bytes of a package.
    pub fn parse_as_bytes<T: Message>(&self, raw: &[u8]) -> Result<T, Error> {
        let header = Header::decode(raw).context(MalformedHeaderSnafu)?;
        let resolved = self.lookup(&header)?;
        let expected = T::message_type().mid();
        ensure!(
            resolved.mid() == expected,
            TypeMismatchSnafu {
                expected,
                found: resolved.mid(),
            }
        );
        resolved.parse_with_header(header, raw)?.into_typed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDescriptor, FieldId, RevisionLayout};
    use crate::types::{mid, rev};

    const EMPTY: &[RevisionLayout] = &[RevisionLayout::new(rev(1), &[])];
    static A: MessageType = MessageType::new(mid(1), "A", EMPTY);
    static B: MessageType = MessageType::new(mid(2), "B", EMPTY);
    static C: MessageType = MessageType::new(mid(3), "C", EMPTY);
    static B_AGAIN: MessageType = MessageType::new(mid(2), "B again", EMPTY);

    const GAP: &[FieldDescriptor] = &[FieldDescriptor::fixed(FieldId(0), 22, 2)];
    const BROKEN: &[RevisionLayout] = &[RevisionLayout::new(rev(1), GAP)];
    static D: MessageType = MessageType::new(mid(4), "D", BROKEN);

    #[test]
    fn test_resolve_regardless_of_order() {
        for order in [[&A, &B, &C], [&C, &A, &B], [&B, &C, &A]].iter() {
            let chain = DispatchChain::build(order.iter().copied()).unwrap();
            let found = chain.resolve(b"00200002001         ").unwrap();
            assert_eq!(found.name(), "B");
        }
    }

    #[test]
    fn test_unrecognized() {
        let chain = DispatchChain::build(vec![&A, &B, &C]).unwrap();
        assert_eq!(
            chain.resolve(b"00200009001         "),
            Err(Error::UnrecognizedMessageType { mid: mid(9) })
        );
        assert!(matches!(
            DispatchChain::default().parse_any("00200001001         "),
            Err(Error::UnrecognizedMessageType { .. })
        ));
    }

    #[test]
    fn test_build_failures() {
        assert_eq!(
            DispatchChain::build(vec![&A, &B, &B_AGAIN]).unwrap_err(),
            Error::DuplicateMessageId { mid: mid(2) }
        );
        assert!(matches!(
            DispatchChain::build(vec![&A, &D]),
            Err(Error::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_chain_order() {
        let chain = DispatchChain::build(vec![&C, &A]).unwrap();
        let names: Vec<_> = chain.templates().map(MessageType::name).collect();
        assert_eq!(names, ["C", "A"]);
        assert!(chain.contains(mid(1)));
        assert!(!chain.contains(mid(2)));
        assert_eq!(chain.len(), 2);
    }
}
