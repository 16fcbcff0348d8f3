//! Serialized table application and read-back verification.

use std::fmt;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::error::MdnieError;
use crate::link::PanelLink;
use crate::tables::{CommandSlot, TuningTable};

/// Writes tables to the panel link, one full table at a time.
///
/// The I/O lock is held for the duration of a table application, so
/// state changes may proceed concurrently but two applications never
/// interleave their byte sequences.
pub struct Dispatcher {
    link: Arc<dyn PanelLink>,
    io_lock: Mutex<()>,
}

impl Dispatcher {
    /// Wrap a panel link.
    pub fn new(link: Arc<dyn PanelLink>) -> Self {
        Self {
            link,
            io_lock: Mutex::new(()),
        }
    }

    /// Write every command sequence of `table`, in declared order.
    ///
    /// A skipped write while the panel is disabled is not an error.
    /// An individual sequence failure is logged and the remaining
    /// sequences are still written; the first failure is returned once
    /// the table has been walked. Nothing is retried.
    pub fn apply(&self, enabled: bool, table: &TuningTable) -> Result<(), MdnieError> {
        if !table.is_complete() {
            return Err(MdnieError::IncompleteTable {
                name: table.name().to_string(),
            });
        }
        if !enabled {
            debug!("apply skipped, panel disabled: {}", table.name());
            return Ok(());
        }

        let _io = self.io_lock.lock().unwrap();
        let mut first_failure = None;
        for slot in CommandSlot::ALL {
            if let Err(err) = self.link.write(table.sequence(slot)) {
                warn!("{}: {} write failed: {}", table.name(), slot.name(), err);
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
        match first_failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Read back the two tuning command blocks and diff them against
    /// `table`.
    ///
    /// Unlocks the level-1 key before reading and re-locks it on every
    /// exit path, including a failed read.
    pub fn verify(&self, table: &TuningTable) -> Result<ReadbackReport, MdnieError> {
        if !table.is_complete() {
            return Err(MdnieError::IncompleteTable {
                name: table.name().to_string(),
            });
        }

        let _io = self.io_lock.lock().unwrap();
        if let Err(err) = self.link.write(table.sequence(CommandSlot::KeyUnlock)) {
            warn!("{}: key unlock failed: {}", table.name(), err);
        }

        let result = self.read_back(table);

        if let Err(err) = self.link.write(table.sequence(CommandSlot::KeyLock)) {
            warn!("{}: key lock failed: {}", table.name(), err);
        }

        result
    }

    fn read_back(&self, table: &TuningTable) -> Result<ReadbackReport, MdnieError> {
        let mut slots = Vec::new();
        for slot in [CommandSlot::Cmd1, CommandSlot::Cmd2] {
            let sequence = table.sequence(slot);
            let mut actual = vec![0u8; sequence.len() - 1];
            self.link.read(sequence[0], &mut actual)?;
            slots.push(SlotReadback {
                slot,
                expected: sequence[1..].to_vec(),
                actual,
            });
        }
        Ok(ReadbackReport {
            table: table.name().to_string(),
            slots,
        })
    }
}

/// Read-back diff for one command slot.
#[derive(Debug, Clone)]
pub struct SlotReadback {
    /// Which slot was read.
    pub slot: CommandSlot,
    /// Payload bytes the table carries.
    pub expected: Vec<u8>,
    /// Payload bytes the panel returned.
    pub actual: Vec<u8>,
}

impl SlotReadback {
    /// Indices whose read-back differs from the table.
    pub fn mismatches(&self) -> Vec<usize> {
        self.expected
            .iter()
            .zip(&self.actual)
            .enumerate()
            .filter(|(_, (e, a))| e != a)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Diagnostic dump of a table against the panel's registers.
#[derive(Debug, Clone)]
pub struct ReadbackReport {
    /// Name of the table that was checked.
    pub table: String,
    /// Per-slot diffs, in read order.
    pub slots: Vec<SlotReadback>,
}

impl ReadbackReport {
    /// Total number of mismatched bytes.
    pub fn mismatch_count(&self) -> usize {
        self.slots.iter().map(|s| s.mismatches().len()).sum()
    }
}

impl fmt::Display for ReadbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "+ {}", self.table)?;
        for slot in &self.slots {
            for (i, (expected, actual)) in slot.expected.iter().zip(&slot.actual).enumerate() {
                write!(f, "{:3}:\t0x{:02x}\t0x{:02x}", i + 1, expected, actual)?;
                if expected != actual {
                    write!(f, "\t(X)")?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "- {}", self.table)
    }
}
