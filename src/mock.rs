//! Mock panel link for testing.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::thread;

use crate::link::PanelLink;

/// A mock register link for testing.
///
/// Records every write, serves reads from a loadable register image,
/// and can be told to fail the next N transfers. Lets code that
/// depends on [`PanelLink`] run without panel hardware.
///
/// # Example
///
/// ```
/// use mdnie_core::{MockLink, PanelLink};
///
/// let link = MockLink::new();
/// link.write(&[0xF0, 0x5A, 0x5A]).unwrap();
/// assert_eq!(link.writes().len(), 1);
/// ```
pub struct MockLink {
    inner: Mutex<Inner>,
}

struct Inner {
    writes: Vec<Vec<u8>>,
    registers: HashMap<u8, Vec<u8>>,
    fail_writes: usize,
    fail_reads: usize,
}

impl MockLink {
    /// Create a mock link with an empty register image.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                writes: Vec::new(),
                registers: HashMap::new(),
                fail_writes: 0,
                fail_reads: 0,
            }),
        }
    }

    /// Every recorded write, in arrival order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().writes.clone()
    }

    /// Drop the recorded writes.
    pub fn clear(&self) {
        self.inner.lock().unwrap().writes.clear();
    }

    /// Fail the next `count` writes with a transfer error.
    pub fn fail_writes(&self, count: usize) {
        self.inner.lock().unwrap().fail_writes = count;
    }

    /// Fail the next `count` reads with a transfer error.
    pub fn fail_reads(&self, count: usize) {
        self.inner.lock().unwrap().fail_reads = count;
    }

    /// Place `bytes` in the register image at `start`.
    pub fn load_registers(&self, start: u8, bytes: &[u8]) {
        self.inner
            .lock()
            .unwrap()
            .registers
            .insert(start, bytes.to_vec());
    }
}

impl Default for MockLink {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelLink for MockLink {
    fn write(&self, sequence: &[u8]) -> io::Result<()> {
        // Widen the race window for serialization tests.
        thread::yield_now();
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_writes > 0 {
            inner.fail_writes -= 1;
            return Err(io::Error::other("mock write failure"));
        }
        if let Some((&addr, payload)) = sequence.split_first() {
            inner.registers.insert(addr, payload.to_vec());
        }
        inner.writes.push(sequence.to_vec());
        Ok(())
    }

    fn read(&self, start: u8, buf: &mut [u8]) -> io::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_reads > 0 {
            inner.fail_reads -= 1;
            return Err(io::Error::other("mock read failure"));
        }
        buf.fill(0);
        if let Some(image) = inner.registers.get(&start) {
            let n = buf.len().min(image.len());
            buf[..n].copy_from_slice(&image[..n]);
        }
        Ok(())
    }
}
