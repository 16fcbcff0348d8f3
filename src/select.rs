//! Table selection priority.

use crate::state::{Accessibility, DeviceState, HbmLevel};
use crate::tables::{TableStore, TuningTable};

/// Pick the one table the current state calls for.
///
/// Evaluated in fixed order, first match wins:
/// accessibility, high-brightness, broadcast TV (when compiled in),
/// ordinary scenario. `None` means the device stays at its last
/// applied setup.
pub fn select_table(store: &TableStore, state: &DeviceState) -> Option<TuningTable> {
    if state.accessibility != Accessibility::Off {
        return store.lookup_accessibility(state.accessibility);
    }
    if state.hbm != HbmLevel::Off {
        return store.lookup_hbm(state.hbm);
    }
    #[cfg(feature = "dmb")]
    if state.scenario == crate::state::Scenario::Dmb {
        return Some(store.lookup_dmb(state.mode));
    }
    if state.scenario.is_ordinary() {
        return store.lookup(state.scenario, state.mode);
    }
    None
}
