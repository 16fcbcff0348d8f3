//! Tuning-table control core for mDNIe-class display post-processing
//! engines.
//!
//! The crate selects, calibrates, and applies register-level tuning
//! tables for a panel post-processing engine: operating scenario,
//! rendering mode, accessibility settings, ambient light, and factory
//! calibration data all feed one selection chain, and the winning
//! table is written to the panel over an injected register link.
//!
//! The hardware transport is not part of the crate. Implement
//! [`PanelLink`] for whatever carries the bytes and hand it to the
//! controller; display power transitions arrive as [`PowerEvent`]s
//! from the platform.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mdnie_core::{
//!     ControllerOptions, MdnieController, MockLink, PowerEvent, builtin_store,
//! };
//!
//! fn main() -> Result<(), mdnie_core::MdnieError> {
//!     let link = Arc::new(MockLink::new());
//!     let controller =
//!         MdnieController::new(link.clone(), builtin_store(), ControllerOptions::default());
//!
//!     // Auto rendering in the browser scenario.
//!     controller.set_mode(4)?;
//!     controller.set_scenario(8)?;
//!
//!     // Bright sunlight engages the high-brightness table.
//!     controller.set_lux(52_000)?;
//!
//!     // Nothing is written while the panel is down.
//!     controller.on_power_event(PowerEvent::PowerDown);
//!     controller.set_scenario(0)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockLink`] to exercise the controller without panel hardware:
//!
//! ```
//! use std::sync::Arc;
//! use mdnie_core::{ControllerOptions, MdnieController, MockLink, builtin_store};
//!
//! let link = Arc::new(MockLink::new());
//! let controller =
//!     MdnieController::new(link.clone(), builtin_store(), ControllerOptions::default());
//! assert!(!link.writes().is_empty());
//! ```

#![warn(missing_docs)]

mod calibrate;
mod controller;
mod dispatch;
mod error;
mod link;
mod mock;
mod panel;
mod select;
mod state;
mod tables;

// Re-export public API
pub use calibrate::{
    CalibrationClassifier, CoordinateSource, FileCoordinateSource, SignClassifier, color_offsets,
};
pub use controller::{ControllerOptions, CorrectionReport, MdnieController, TableSource};
pub use dispatch::{Dispatcher, ReadbackReport, SlotReadback};
pub use error::MdnieError;
pub use link::PanelLink;
pub use mock::MockLink;
pub use panel::builtin_store;
pub use select::select_table;
pub use state::{
    ACCESSIBILITY_MAX, Accessibility, BYPASS_MAX, Bypass, DeviceState, HBM_MAX, HbmLevel,
    MODE_MAX, Mode, PowerEvent, SCENARIO_DMB, SCENARIO_MAX, Scenario,
};
pub use tables::{CommandSlot, TableStore, TuningTable, WHITE_SENTINEL};
