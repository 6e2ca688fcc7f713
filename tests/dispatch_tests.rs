mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use openproto_mid::catalog::{
    communication, CommandError, IoDeviceStatusReply, JobBatchDecrement, MessageCatalog, SetTime,
};
use openproto_mid::convert::{DigitalInput, Relay, TextConverter};
use openproto_mid::header::HeaderError;
use openproto_mid::{mid, rev, Error, FieldId, Message, Placement};

#[test]
fn blank_revision_resolves_to_revision_1() -> anyhow::Result<()> {
    let chain = full_chain()?;
    let mut m = chain.parse_any("00200129            ")?;
    assert_eq!(m.mid(), mid(129));
    assert_eq!(m.revision(), rev(1));
    assert!(m.values().is_empty());
    assert_eq!(m.pack()?, "00200129            ");
    Ok(())
}

#[test]
fn typed_parse_of_numbered_revision() -> anyhow::Result<()> {
    let chain = full_chain()?;
    let m: JobBatchDecrement = chain.parse_as("00290129002         010302123")?;
    assert_eq!(m.revision(), rev(2));
    assert_eq!(m.channel_id()?, 3);
    assert_eq!(m.parameter_set_id()?, 123);
    Ok(())
}

#[test]
fn counted_lists_shift_later_fields() -> anyhow::Result<()> {
    let chain = full_chain()?;
    let mut reply = IoDeviceStatusReply::new();
    reply.set_io_device_id(1)?;
    reply.set_relays(vec![
        Relay {
            number: 1,
            status: true,
        },
        Relay {
            number: 2,
            status: false,
        },
    ])?;
    reply.set_digital_inputs(vec![DigitalInput {
        number: 5,
        status: true,
    }])?;
    let raw = reply.pack()?;
    assert_eq!(raw, "00480215002         0101020203001100200401050051");

    let placements = reply.descriptor().placements()?;
    let find = |field: FieldId| placements.iter().find(|p| p.field == field).copied();
    assert_eq!(
        find(IoDeviceStatusReply::NUMBER_OF_DIGITAL_INPUTS),
        Some(Placement {
            field: IoDeviceStatusReply::NUMBER_OF_DIGITAL_INPUTS,
            offset: 38,
            value_offset: 40,
            size: 2,
        })
    );
    assert_eq!(
        find(IoDeviceStatusReply::DIGITAL_INPUT_LIST).map(|p| (p.value_offset, p.size)),
        Some((44, 4))
    );

    let parsed: IoDeviceStatusReply = chain.parse_as(&raw)?;
    assert_eq!(parsed.relays()?.len(), 2);
    assert_eq!(parsed.digital_inputs()?[0].number, 5);
    assert_eq!(parsed, reply);
    Ok(())
}

#[test]
fn list_lengths() -> anyhow::Result<()> {
    let chain = full_chain()?;
    for n in [0u16, 1, 7, 20].iter().copied() {
        let relays: Vec<Relay> = (1..=n)
            .map(|number| Relay {
                number,
                status: number % 3 == 0,
            })
            .collect();
        let mut reply = IoDeviceStatusReply::new();
        reply.set_io_device_id(4)?;
        reply.set_relays(relays.clone())?;
        let raw = reply.pack()?;
        assert_eq!(raw.len(), 20 + 4 + 4 + 2 + 4 * n as usize + 4 + 2);

        let parsed: IoDeviceStatusReply = chain.parse_as(&raw)?;
        assert_eq!(parsed.number_of_relays()?, u32::from(n));
        assert_eq!(parsed.relays()?, relays);
        assert!(parsed.digital_inputs()?.is_empty());
    }
    Ok(())
}

#[test]
fn captured_packages_round_trip() -> anyhow::Result<()> {
    let chain = full_chain()?;
    for &(raw, expected) in CAPTURED {
        let mut m = chain.parse_any(raw)?;
        assert_eq!(m.mid(), mid(expected), "{}", raw);
        assert_eq!(m.pack()?, raw);
        assert_eq!(chain.parse_any_bytes(raw.as_bytes())?, m);
    }
    Ok(())
}

#[test]
fn packed_messages_parse_back() -> anyhow::Result<()> {
    let chain = full_chain()?;
    let noon = chrono::NaiveDate::from_ymd_opt(2020, 2, 29)
        .and_then(|d| d.and_hms_opt(23, 59, 1))
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;

    let mut set_time = SetTime::at(noon)?;
    let parsed: SetTime = chain.parse_as_bytes(&set_time.descriptor_mut().pack_bytes()?)?;
    assert_eq!(parsed.time()?, noon);

    let mut error = CommandError::for_request(mid(215), 76)?;
    error.descriptor_mut().set_sequence_number(Some(42));
    let raw = error.pack()?;
    assert_eq!(raw, "00260004001     42  021576");
    let parsed: CommandError = chain.parse_as(&raw)?;
    assert_eq!(parsed.request_mid()?, mid(215));
    assert_eq!(parsed.descriptor().header().sequence_number, Some(42));
    Ok(())
}

#[test]
fn raw_field_access() -> anyhow::Result<()> {
    let chain = full_chain()?;
    let m = chain.parse_any("00570002001         010001020103Airbag1                  ")?;
    assert_eq!(
        m.raw(communication::CommunicationStartAcknowledge::CONTROLLER_NAME)?,
        "Airbag1                  "
    );
    assert_eq!(
        m.get(
            communication::CommunicationStartAcknowledge::CONTROLLER_NAME,
            &TextConverter
        )?,
        "Airbag1"
    );
    Ok(())
}

#[test]
fn wrong_type_is_reported() -> anyhow::Result<()> {
    let chain = full_chain()?;
    assert_eq!(
        chain
            .parse_as::<SetTime>("00290129002         010302123")
            .unwrap_err(),
        Error::TypeMismatch {
            expected: mid(82),
            found: mid(129),
        }
    );
    Ok(())
}

#[test]
fn unknown_mid_is_reported() -> anyhow::Result<()> {
    let chain = full_chain()?;
    assert_eq!(
        chain.parse_any("00200009001         ").unwrap_err(),
        Error::UnrecognizedMessageType { mid: mid(9) }
    );
    assert!(chain.resolve(b"00200009001         ").is_err());
    Ok(())
}

#[test]
fn malformed_packages() -> anyhow::Result<()> {
    let chain = full_chain()?;
    assert!(matches!(
        chain.parse_any("0020012"),
        Err(Error::MalformedHeader {
            source: HeaderError::TooShort { len: 7 }
        })
    ));
    assert!(matches!(
        chain.parse_any("002x0129            "),
        Err(Error::MalformedHeader { .. })
    ));
    assert!(matches!(
        chain.parse_any("00290129002         010302123 "),
        Err(Error::MalformedHeader {
            source: HeaderError::LengthMismatch {
                declared: 29,
                actual: 30
            }
        })
    ));
    assert!(matches!(
        chain.parse_any("00290129002         020302123"),
        Err(Error::MalformedField { .. })
    ));
    assert!(matches!(
        chain.parse_any("00430215002         0101020203001100200401050051"),
        Err(Error::MalformedHeader { .. })
    ));
    assert!(matches!(
        chain.parse_any_bytes(b"00290129002         01030212\xc3"),
        Err(Error::NonAsciiPackage { position: 28 })
    ));
    assert!(matches!(
        chain.parse_any("00200129009         "),
        Err(Error::UnsupportedRevision { .. })
    ));
    Ok(())
}

#[test]
fn truncated_count_driven_list() -> anyhow::Result<()> {
    let chain = full_chain()?;
    // Declares five relays but carries two.
    assert!(matches!(
        chain.parse_any("00480215002         0101020503001100200401050051"),
        Err(Error::MalformedField { .. })
    ));
    Ok(())
}

#[test]
fn chain_is_shared_between_threads() -> anyhow::Result<()> {
    let chain = Arc::new(full_chain()?);
    let handles: Vec<_> = (1..=4u32)
        .map(|channel| {
            let chain = Arc::clone(&chain);
            thread::spawn(move || -> Result<u32, Error> {
                let mut m = JobBatchDecrement::for_parameter_set(channel, 100 + channel)?;
                let parsed: JobBatchDecrement = chain.parse_as(&m.pack()?)?;
                parsed.parameter_set_id()
            })
        })
        .collect();
    for (channel, handle) in (1..=4u32).zip(handles) {
        let result = handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker panicked"))??;
        assert_eq!(result, 100 + channel);
    }
    Ok(())
}

#[test]
fn partial_catalog() -> anyhow::Result<()> {
    init_logging();
    let chain = MessageCatalog::new().time().build()?;
    assert_eq!(chain.len(), 3);
    assert!(chain.contains(mid(81)));
    assert!(matches!(
        chain.parse_any("00200129            "),
        Err(Error::UnrecognizedMessageType { .. })
    ));
    Ok(())
}
