#![allow(dead_code)]

use openproto_mid::catalog::MessageCatalog;
use openproto_mid::DispatchChain;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A chain holding every message type this crate declares.
pub fn full_chain() -> anyhow::Result<DispatchChain> {
    init_logging();
    Ok(MessageCatalog::all().build()?)
}

/// Packages captured from a controller, with the MID they carry.
pub const CAPTURED: &[(&str, u16)] = &[
    ("00200001003         ", 1),
    ("00570002001         010001020103Airbag1                  ", 2),
    ("00620002002         010001020103Airbag1                  04ACT", 2),
    ("00200003            ", 3),
    ("00260004001         001802", 4),
    ("00240005001         0018", 5),
    ("00200080            ", 80),
    ("00390081001         2001-12-01:12:05:30", 81),
    ("00390082001         2001-12-01:12:05:30", 82),
    ("00200129            ", 129),
    ("00290129002         010302123", 129),
    ("00220214001         01", 214),
    ("00220214002         01", 214),
    ("00480215002         0101020203001100200401050051", 215),
    ("00200400001         ", 400),
    ("00210401001         0", 401),
    ("00200402            ", 402),
    ("00200403001         ", 403),
    ("00200410001         ", 410),
    ("00280411001         01000203", 411),
];
