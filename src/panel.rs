//! Built-in panel profile: tuning-table data, register offsets, and
//! calibration constants for the reference panel.

use crate::state::{Mode, Scenario};
use crate::tables::{Catalog, TableStore, TuningTable};

/// Lux reading at and above which the high-brightness tier engages.
pub(crate) const HBM_LUX_THRESHOLD: i32 = 40_000;

/// White-point byte offsets inside the first command block. The gain
/// byte that follows each channel stays untouched by calibration.
pub(crate) const WHITE_R_OFFSET: usize = 31;
pub(crate) const WHITE_G_OFFSET: usize = 33;
pub(crate) const WHITE_B_OFFSET: usize = 35;

/// Start of the 9-word color-correction matrix inside the first
/// command block; the color-blind payload overwrites this region.
pub(crate) const COLOR_BLIND_OFFSET: usize = 13;

/// Calibration white-point entries; index 0 is the unused dummy.
pub(crate) const COORDINATE_DATA: [(u8, u8, u8); 10] = [
    (0xFF, 0xFF, 0xFF),
    (0xFF, 0xFB, 0xFB),
    (0xFF, 0xFD, 0xFF),
    (0xFB, 0xFB, 0xFF),
    (0xFF, 0xFE, 0xFC),
    (0xFF, 0xFF, 0xFF),
    (0xFB, 0xFC, 0xFF),
    (0xFD, 0xFF, 0xFA),
    (0xFD, 0xFF, 0xFD),
    (0xFB, 0xFF, 0xFF),
];

/// Fixed-point boundary functions over the panel color coordinate.
/// Coefficients are specific to this panel batch.
pub(crate) fn color_offset_f1(x: i32, y: i32) -> i32 {
    let (x, y) = (x as i64, y as i64);
    ((((y << 10) - (((x << 10) * 547) / 503)) + (31 << 10)) >> 10) as i32
}

pub(crate) fn color_offset_f2(x: i32, y: i32) -> i32 {
    let (x, y) = (x as i64, y as i64);
    ((((y << 10) - (((x << 10) * 467) / 447)) - (25 << 10)) >> 10) as i32
}

pub(crate) fn color_offset_f3(x: i32, y: i32) -> i32 {
    let (x, y) = (x as i64, y as i64);
    ((((y << 10) + (((x << 10) * 201) / 39)) - (18718 << 10)) >> 10) as i32
}

pub(crate) fn color_offset_f4(x: i32, y: i32) -> i32 {
    let (x, y) = (x as i64, y as i64);
    ((((y << 10) + (((x << 10) * 510) / 131)) - (12329 << 10)) >> 10) as i32
}

const LEVEL1_KEY_UNLOCK: [u8; 3] = [0xF0, 0x5A, 0x5A];
const LEVEL1_KEY_LOCK: [u8; 3] = [0xF0, 0xA5, 0xA5];

// First command block layout: register address, twelve algorithm
// bytes, the 9-word correction matrix, white point with per-channel
// gain, three tail bytes.

const DYNAMIC_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x01, 0x00, 0x07, 0x00, 0x20, 0x00,
    0xA0, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xA0, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0xA0, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x14, 0x18, 0x1C,
];

const STANDARD_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x00, 0x07, 0x00, 0x20, 0x00,
    0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x10, 0x10, 0x10,
];

const NATURAL_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x00, 0x07, 0x00, 0x20, 0x00,
    0xF6, 0x03, 0x0A, 0x00, 0x04, 0x00,
    0x08, 0x00, 0xF2, 0x03, 0x06, 0x00,
    0x05, 0x00, 0x09, 0x00, 0xF4, 0x03,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x10, 0x12, 0x14,
];

const MOVIE_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x01, 0x07, 0x00, 0x20, 0x00,
    0xE8, 0x03, 0x12, 0x00, 0x06, 0x00,
    0x0C, 0x00, 0xE4, 0x03, 0x08, 0x00,
    0x07, 0x00, 0x0D, 0x00, 0xE6, 0x03,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x0C, 0x0E, 0x10,
];

const AUTO_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x01, 0x01, 0x07, 0x00, 0x20, 0x00,
    0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x12, 0x14, 0x16,
];

const DYNAMIC_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x50, 0x1C, 0x0C, 0x0C, 0x0C, 0x00, 0xA8, 0xA8, 0x38, 0x14,
    0x00, 0x00, 0x5C, 0x5C, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const STANDARD_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x30, 0x14, 0x0A, 0x0A, 0x0A, 0x00, 0x90, 0x90, 0x30, 0x10,
    0x00, 0x00, 0x44, 0x44, 0x05, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const NATURAL_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x30, 0x12, 0x09, 0x09, 0x09, 0x00, 0x8C, 0x8C, 0x2C, 0x0E,
    0x00, 0x00, 0x40, 0x40, 0x05, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const MOVIE_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x20, 0x10, 0x08, 0x08, 0x08, 0x00, 0x84, 0x84, 0x28, 0x0C,
    0x00, 0x00, 0x38, 0x38, 0x04, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const AUTO_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x30, 0x16, 0x0A, 0x0A, 0x0A, 0x00, 0x94, 0x94, 0x32, 0x10,
    0x00, 0x00, 0x48, 0x48, 0x05, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

// Video playback sharpens the second block regardless of mode.
const VIDEO_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x60, 0x20, 0x10, 0x10, 0x10, 0x00, 0xB0, 0xB0, 0x40, 0x18,
    0x00, 0x00, 0x60, 0x60, 0x08, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

// E-book paper white is styled, not calibrated; the guard in
// patch_white_point must leave it alone.
const EBOOK_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x00, 0x07, 0x00, 0x20, 0x00,
    0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
    0xF8, 0x00, 0xF0, 0x00, 0xE4, 0x00,
    0x10, 0x10, 0x10,
];

const EBOOK_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x10, 0x0C, 0x06, 0x06, 0x06, 0x00, 0x80, 0x80, 0x20, 0x08,
    0x00, 0x00, 0x30, 0x30, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const NEGATIVE_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x01, 0x00, 0x00, 0x07, 0x00, 0x20, 0x00,
    0x00, 0xFC, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0xFC, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0xFC,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x10, 0x10, 0x10,
];

const NEGATIVE_CMD2: [u8; 24] = [
    0xED,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x80, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const COLOR_BLIND_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x00, 0x07, 0x00, 0x20, 0x00,
    0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x10, 0x10, 0x10,
];

const COLOR_BLIND_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x30, 0x14, 0x0A, 0x0A, 0x0A, 0x00, 0x90, 0x90, 0x30, 0x10,
    0x00, 0x00, 0x44, 0x44, 0x05, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const SCREEN_CURTAIN_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

const SCREEN_CURTAIN_CMD2: [u8; 24] = [
    0xED,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

const HBM_ON_CMD1: [u8; 40] = [
    0xEC,
    0x98, 0x24, 0x10, 0x14, 0xB3, 0x00, 0x01, 0x00, 0x07, 0x00, 0x40, 0x00,
    0x20, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x20, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x20, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x1C, 0x1C, 0x1C,
];

const HBM_ON_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x70, 0x24, 0x12, 0x12, 0x12, 0x00, 0xB8, 0xB8, 0x48, 0x1C,
    0x00, 0x00, 0x68, 0x68, 0x09, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

// Bypass on keeps the engine registers in pass-through; bypass off
// restores the standard processing enables.
const BYPASS_ON_CMD1: [u8; 40] = [
    0xEC,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x04, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x04, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x04,
    0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
    0x00, 0x00, 0x00,
];

const BYPASS_ON_CMD2: [u8; 24] = [
    0xED,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x80, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[cfg(feature = "dmb")]
const DMB_CMD2: [u8; 24] = [
    0xED,
    0x01, 0x00, 0x58, 0x1E, 0x0E, 0x0E, 0x0E, 0x00, 0xAC, 0xAC, 0x3C, 0x16,
    0x00, 0x00, 0x58, 0x58, 0x07, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00,
];

fn table(name: impl Into<String>, cmd1: &[u8], cmd2: &[u8]) -> TuningTable {
    TuningTable::new(
        name,
        LEVEL1_KEY_UNLOCK.to_vec(),
        cmd1.to_vec(),
        cmd2.to_vec(),
        LEVEL1_KEY_LOCK.to_vec(),
    )
}

fn mode_cmd1(mode: Mode) -> &'static [u8] {
    match mode {
        Mode::Dynamic => &DYNAMIC_CMD1,
        Mode::Standard => &STANDARD_CMD1,
        Mode::Natural => &NATURAL_CMD1,
        Mode::Movie => &MOVIE_CMD1,
        Mode::Auto => &AUTO_CMD1,
    }
}

fn mode_cmd2(mode: Mode) -> &'static [u8] {
    match mode {
        Mode::Dynamic => &DYNAMIC_CMD2,
        Mode::Standard => &STANDARD_CMD2,
        Mode::Natural => &NATURAL_CMD2,
        Mode::Movie => &MOVIE_CMD2,
        Mode::Auto => &AUTO_CMD2,
    }
}

fn scenario_table(scenario: Scenario, mode: Mode) -> TuningTable {
    let name = format!("{}_{}", scenario.token(), mode.token());
    match scenario {
        Scenario::Ebook => table(name, &EBOOK_CMD1, &EBOOK_CMD2),
        Scenario::VideoNormal => table(name, mode_cmd1(mode), &VIDEO_CMD2),
        _ => table(name, mode_cmd1(mode), mode_cmd2(mode)),
    }
}

/// Build a [`TableStore`] holding the reference panel's catalog.
pub fn builtin_store() -> TableStore {
    let mut tuning = Vec::with_capacity(Scenario::ORDINARY.len() * Mode::ALL.len());
    for scenario in Scenario::ORDINARY {
        for mode in Mode::ALL {
            tuning.push(scenario_table(scenario, mode));
        }
    }

    let accessibility = vec![
        table("negative", &NEGATIVE_CMD1, &NEGATIVE_CMD2),
        table("color_blind", &COLOR_BLIND_CMD1, &COLOR_BLIND_CMD2),
        table("screen_curtain", &SCREEN_CURTAIN_CMD1, &SCREEN_CURTAIN_CMD2),
    ];

    let hbm = vec![table("hbm_on", &HBM_ON_CMD1, &HBM_ON_CMD2)];

    let bypass = [
        table("bypass_off", &STANDARD_CMD1, &STANDARD_CMD2),
        table("bypass_on", &BYPASS_ON_CMD1, &BYPASS_ON_CMD2),
    ];

    #[cfg(feature = "dmb")]
    let dmb = Mode::ALL
        .iter()
        .map(|mode| table(format!("dmb_{}", mode.token()), mode_cmd1(*mode), &DMB_CMD2))
        .collect();

    TableStore::from_catalog(Catalog {
        tuning,
        accessibility,
        hbm,
        bypass,
        #[cfg(feature = "dmb")]
        dmb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{CommandSlot, WHITE_SENTINEL};

    #[test]
    fn catalog_tables_are_complete() {
        let store = builtin_store();
        for scenario in Scenario::ORDINARY {
            for mode in Mode::ALL {
                let t = store.lookup(scenario, mode).unwrap();
                assert!(t.is_complete(), "{} has an empty slot", t.name());
                assert_eq!(t.sequence(CommandSlot::Cmd1).len(), 40);
                assert_eq!(t.sequence(CommandSlot::Cmd2).len(), 24);
            }
        }
    }

    #[test]
    fn sentinel_layout_matches_offsets() {
        let store = builtin_store();
        let ui = store.lookup(Scenario::Ui, Mode::Dynamic).unwrap();
        assert_eq!(ui.white_point(), Some(WHITE_SENTINEL));
        let ebook = store.lookup(Scenario::Ebook, Mode::Movie).unwrap();
        assert_eq!(ebook.white_point(), Some((0xF8, 0xF0, 0xE4)));
    }

    #[test]
    fn color_blind_block_fits_nine_words() {
        assert!(COLOR_BLIND_OFFSET + 9 * 2 <= WHITE_R_OFFSET);
    }

    #[test]
    fn offset_functions_are_linear_in_y() {
        // Raising y by one raises every offset by one.
        let (x, y) = (2931, 3085);
        assert_eq!(color_offset_f1(x, y + 1), color_offset_f1(x, y) + 1);
        assert_eq!(color_offset_f2(x, y + 1), color_offset_f2(x, y) + 1);
        assert_eq!(color_offset_f3(x, y + 1), color_offset_f3(x, y) + 1);
        assert_eq!(color_offset_f4(x, y + 1), color_offset_f4(x, y) + 1);
    }
}
