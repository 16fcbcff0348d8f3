//! Tuning tables and the shared table catalog.

use std::sync::Mutex;

use crate::panel::{COLOR_BLIND_OFFSET, WHITE_B_OFFSET, WHITE_G_OFFSET, WHITE_R_OFFSET};
use crate::state::{Accessibility, Bypass, HbmLevel, Mode, Scenario};

/// Unpatched white-point placeholder eligible for calibration.
pub const WHITE_SENTINEL: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);

/// Logical command slots of a tuning table, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSlot {
    /// Level-1 register key unlock.
    KeyUnlock,
    /// First tuning command block; carries the white point.
    Cmd1,
    /// Second tuning command block.
    Cmd2,
    /// Level-1 register key lock.
    KeyLock,
}

impl CommandSlot {
    /// Every slot, in write order.
    pub const ALL: [CommandSlot; 4] = [
        CommandSlot::KeyUnlock,
        CommandSlot::Cmd1,
        CommandSlot::Cmd2,
        CommandSlot::KeyLock,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            CommandSlot::KeyUnlock => 0,
            CommandSlot::Cmd1 => 1,
            CommandSlot::Cmd2 => 2,
            CommandSlot::KeyLock => 3,
        }
    }

    /// Short slot name for logs and dumps.
    pub fn name(self) -> &'static str {
        match self {
            CommandSlot::KeyUnlock => "key_unlock",
            CommandSlot::Cmd1 => "cmd1",
            CommandSlot::Cmd2 => "cmd2",
            CommandSlot::KeyLock => "key_lock",
        }
    }
}

/// A named set of register-write sequences achieving one visual setup.
///
/// Byte 0 of every sequence is the target register address. Tables are
/// handed out of the [`TableStore`] by value, so a caller may freely
/// patch its copy without affecting the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuningTable {
    name: String,
    tune: [Vec<u8>; 4],
}

impl TuningTable {
    /// Build a table from its four command sequences.
    pub fn new(
        name: impl Into<String>,
        key_unlock: Vec<u8>,
        cmd1: Vec<u8>,
        cmd2: Vec<u8>,
        key_lock: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            tune: [key_unlock, cmd1, cmd2, key_lock],
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte sequence for one command slot.
    pub fn sequence(&self, slot: CommandSlot) -> &[u8] {
        &self.tune[slot.index()]
    }

    /// Whether every slot has a non-empty sequence.
    pub fn is_complete(&self) -> bool {
        self.tune.iter().all(|seq| !seq.is_empty())
    }

    /// The white point carried in the first command block, if the
    /// sequence is long enough to hold one.
    pub fn white_point(&self) -> Option<(u8, u8, u8)> {
        let cmd1 = self.sequence(CommandSlot::Cmd1);
        if cmd1.len() <= WHITE_B_OFFSET {
            return None;
        }
        Some((cmd1[WHITE_R_OFFSET], cmd1[WHITE_G_OFFSET], cmd1[WHITE_B_OFFSET]))
    }

    /// Overwrite the white point in this table's first command block.
    ///
    /// Returns `false` when the sequence has no white-point field.
    pub fn set_white_point(&mut self, rgb: (u8, u8, u8)) -> bool {
        let cmd1 = &mut self.tune[CommandSlot::Cmd1.index()];
        if cmd1.len() <= WHITE_B_OFFSET {
            return false;
        }
        cmd1[WHITE_R_OFFSET] = rgb.0;
        cmd1[WHITE_G_OFFSET] = rgb.1;
        cmd1[WHITE_B_OFFSET] = rgb.2;
        true
    }

    fn has_sentinel_white(&self) -> bool {
        self.white_point() == Some(WHITE_SENTINEL)
    }
}

pub(crate) struct Catalog {
    /// Ordinary tables, dense over `Scenario::ORDINARY` x `Mode::ALL`.
    pub(crate) tuning: Vec<TuningTable>,
    /// Indexed by accessibility raw value minus one.
    pub(crate) accessibility: Vec<TuningTable>,
    /// Indexed by HBM tier minus one.
    pub(crate) hbm: Vec<TuningTable>,
    /// Off and on, in that order.
    pub(crate) bypass: [TuningTable; 2],
    #[cfg(feature = "dmb")]
    /// Broadcast-TV tables, one per mode.
    pub(crate) dmb: Vec<TuningTable>,
}

/// The shared catalog of tuning tables.
///
/// Lookups clone the stored table. The only in-place mutations are the
/// calibration white-point patch and the color-blind correction
/// payload, both serialized by the catalog's own patch lock.
pub struct TableStore {
    catalog: Mutex<Catalog>,
}

impl TableStore {
    pub(crate) fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Mutex::new(catalog),
        }
    }

    /// The table for an ordinary (scenario, mode) pair.
    ///
    /// `None` only for the DMB marker scenario, which is not part of
    /// the ordinary catalog.
    pub fn lookup(&self, scenario: Scenario, mode: Mode) -> Option<TuningTable> {
        let idx = scenario.ordinary_index()?;
        let catalog = self.catalog.lock().unwrap();
        Some(catalog.tuning[idx * Mode::ALL.len() + mode.index()].clone())
    }

    /// The table for an active accessibility setting; `None` for off.
    pub fn lookup_accessibility(&self, accessibility: Accessibility) -> Option<TuningTable> {
        if accessibility == Accessibility::Off {
            return None;
        }
        let catalog = self.catalog.lock().unwrap();
        Some(catalog.accessibility[accessibility.raw() as usize - 1].clone())
    }

    /// The table for an active high-brightness tier; `None` for off.
    pub fn lookup_hbm(&self, level: HbmLevel) -> Option<TuningTable> {
        if level == HbmLevel::Off {
            return None;
        }
        let catalog = self.catalog.lock().unwrap();
        Some(catalog.hbm[0].clone())
    }

    /// The table applied when bypass is toggled.
    pub fn lookup_bypass(&self, bypass: Bypass) -> TuningTable {
        let catalog = self.catalog.lock().unwrap();
        match bypass {
            Bypass::Off => catalog.bypass[0].clone(),
            Bypass::On => catalog.bypass[1].clone(),
        }
    }

    /// The broadcast-TV table for a mode.
    #[cfg(feature = "dmb")]
    pub fn lookup_dmb(&self, mode: Mode) -> TuningTable {
        let catalog = self.catalog.lock().unwrap();
        catalog.dmb[mode.index()].clone()
    }

    /// Overwrite the white point of every ordinary table still carrying
    /// the sentinel value. Returns how many tables were patched.
    ///
    /// Already-patched tables and tables with a styled (non-sentinel)
    /// white point no longer match the guard, so the first successful
    /// calibration wins for the process lifetime.
    pub fn patch_white_point(&self, rgb: (u8, u8, u8)) -> usize {
        let mut catalog = self.catalog.lock().unwrap();
        let mut patched = 0;
        for table in catalog.tuning.iter_mut() {
            if table.has_sentinel_white() && table.set_white_point(rgb) {
                patched += 1;
            }
        }
        patched
    }

    /// Write a color-blind correction payload into the color-blind
    /// table's first command block.
    ///
    /// Each 16-bit word lands least-significant byte first at the
    /// panel's correction block offset; words beyond the block's
    /// capacity are ignored.
    pub fn patch_color_blind(&self, words: &[u16]) {
        let mut catalog = self.catalog.lock().unwrap();
        let idx = Accessibility::ColorBlind.raw() as usize - 1;
        let cmd1 = &mut catalog.accessibility[idx].tune[CommandSlot::Cmd1.index()];
        let room = (WHITE_R_OFFSET - COLOR_BLIND_OFFSET) / 2;
        for (i, word) in words.iter().take(room).enumerate() {
            cmd1[COLOR_BLIND_OFFSET + i * 2] = (word & 0xFF) as u8;
            cmd1[COLOR_BLIND_OFFSET + i * 2 + 1] = (word >> 8) as u8;
        }
    }
}
