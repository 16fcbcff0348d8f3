//! The mDNIe engine controller.

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::calibrate::{
    CalibrationClassifier, CoordinateSource, SignClassifier, color_offsets, coordinate_rgb,
};
use crate::dispatch::{Dispatcher, ReadbackReport};
use crate::error::MdnieError;
use crate::link::PanelLink;
use crate::select::select_table;
use crate::state::{
    ACCESSIBILITY_MAX, Accessibility, BYPASS_MAX, Bypass, DeviceState, HbmLevel, MODE_MAX, Mode,
    PowerEvent, Scenario,
};
use crate::tables::{TableStore, TuningTable};

/// Directory that accepted tuning override files must live in.
const TUNING_DIR: &str = "/sdcard/mdnie/";

/// Longest accepted tuning file name.
const TUNING_NAME_MAX: usize = 64;

/// Most correction words a color-blind payload may carry.
const COLOR_BLIND_WORDS_MAX: usize = 9;

/// Supplies a replacement table for an accepted tuning-file path.
///
/// Consulted while the tuning override is enabled; returning `None`
/// falls back to the built-in table.
pub trait TableSource: Send + Sync {
    /// A table loaded from `path`, shaped like `base`.
    fn request(&self, path: &str, base: &TuningTable) -> Option<TuningTable>;
}

/// Injected collaborators for [`MdnieController`].
pub struct ControllerOptions {
    /// Source of the factory panel color coordinate. Without one,
    /// color correction is skipped (and stays skipped).
    pub coordinate_source: Option<Box<dyn CoordinateSource>>,
    /// Coefficient-to-table classification policy.
    pub classifier: Box<dyn CalibrationClassifier>,
    /// Tuning-file override loader.
    pub override_source: Option<Box<dyn TableSource>>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            coordinate_source: None,
            classifier: Box::new(SignClassifier),
            override_source: None,
        }
    }
}

/// Color-correction diagnostic: the computed offsets and the resolved
/// calibration table index.
#[derive(Debug, Clone, Copy)]
pub struct CorrectionReport {
    /// The four signed correction offsets.
    pub offsets: [i32; 4],
    /// The classified calibration table index.
    pub index: u32,
}

/// The display tuning controller.
///
/// Owns the device state and the table catalog, validates external
/// requests, and drives table selection and application against the
/// injected panel link.
///
/// State mutations run under a short-lived state lock; panel I/O runs
/// under the dispatcher's own lock, never both at once. A table picked
/// for application is written as-is even if the state changes during
/// the write.
pub struct MdnieController {
    state: Mutex<DeviceState>,
    store: TableStore,
    dispatcher: Dispatcher,
    coordinate_source: Option<Box<dyn CoordinateSource>>,
    classifier: Box<dyn CalibrationClassifier>,
    override_source: Option<Box<dyn TableSource>>,
}

impl MdnieController {
    /// Create a controller, enable the panel, and apply the table for
    /// the default state (UI scenario, standard mode).
    pub fn new(link: Arc<dyn PanelLink>, store: TableStore, options: ControllerOptions) -> Self {
        let controller = Self {
            state: Mutex::new(DeviceState::default()),
            store,
            dispatcher: Dispatcher::new(link),
            coordinate_source: options.coordinate_source,
            classifier: options.classifier,
            override_source: options.override_source,
        };

        controller.state.lock().unwrap().enabled = true;
        if let Err(err) = controller.update() {
            warn!("initial apply failed: {}", err);
        }
        info!("registered");
        controller
    }

    /// A snapshot of the current device state.
    pub fn state(&self) -> DeviceState {
        self.state.lock().unwrap().clone()
    }

    /// The shared table catalog.
    pub fn store(&self) -> &TableStore {
        &self.store
    }

    /// Current rendering mode.
    pub fn mode(&self) -> Mode {
        self.state.lock().unwrap().mode
    }

    /// Current scenario.
    pub fn scenario(&self) -> Scenario {
        self.state.lock().unwrap().scenario
    }

    /// Current accessibility setting.
    pub fn accessibility(&self) -> Accessibility {
        self.state.lock().unwrap().accessibility
    }

    /// Current high-brightness tier.
    pub fn hbm(&self) -> HbmLevel {
        self.state.lock().unwrap().hbm
    }

    /// Current bypass state.
    pub fn bypass(&self) -> Bypass {
        self.state.lock().unwrap().bypass
    }

    /// White point of the last applied table.
    pub fn white_point(&self) -> (u8, u8, u8) {
        self.state.lock().unwrap().white_point
    }

    /// Tuning override flag and resolved file path.
    pub fn tuning(&self) -> (bool, Option<String>) {
        let state = self.state.lock().unwrap();
        (state.tuning, state.tuning_path.clone())
    }

    /// Set the rendering mode from a raw value.
    ///
    /// The first mode change also performs the one-shot panel color
    /// correction.
    pub fn set_mode(&self, value: u32) -> Result<(), MdnieError> {
        info!("mode: {}", value);
        let Some(mode) = Mode::from_raw(value) else {
            return Err(MdnieError::InvalidRange {
                field: "mode",
                value: value as i64,
                max: MODE_MAX as i64,
            });
        };
        self.state.lock().unwrap().mode = mode;
        self.calibrate_once();
        self.update()
    }

    /// Set the scenario from a raw value.
    ///
    /// An out-of-domain value resets to the UI scenario instead of
    /// erroring.
    pub fn set_scenario(&self, value: u32) -> Result<(), MdnieError> {
        info!("scenario: {}", value);
        let scenario = Scenario::from_raw(value).unwrap_or(Scenario::Ui);
        self.state.lock().unwrap().scenario = scenario;
        self.update()
    }

    /// Set the accessibility adjustment from a raw value.
    ///
    /// For the color-blind setting, `payload` carries up to nine
    /// 16-bit correction words patched into the color-blind table;
    /// other settings ignore it.
    pub fn set_accessibility(&self, value: u32, payload: &[u16]) -> Result<(), MdnieError> {
        info!("accessibility: {}, {} words", value, payload.len());
        let Some(accessibility) = Accessibility::from_raw(value) else {
            return Err(MdnieError::InvalidRange {
                field: "accessibility",
                value: value as i64,
                max: ACCESSIBILITY_MAX as i64,
            });
        };
        if accessibility == Accessibility::ColorBlind && payload.len() > COLOR_BLIND_WORDS_MAX {
            return Err(MdnieError::InvalidRange {
                field: "color_blind words",
                value: payload.len() as i64,
                max: COLOR_BLIND_WORDS_MAX as i64 + 1,
            });
        }

        self.state.lock().unwrap().accessibility = accessibility;
        if accessibility == Accessibility::ColorBlind && !payload.is_empty() {
            self.store.patch_color_blind(payload);
        }
        self.update()
    }

    /// Set the bypass state from a raw value; any non-zero in-range
    /// value engages pass-through.
    ///
    /// The bypass table is written directly, outside the selection
    /// priority chain.
    pub fn set_bypass(&self, value: u32) -> Result<(), MdnieError> {
        info!("bypass: {}", value);
        if value >= BYPASS_MAX {
            return Err(MdnieError::InvalidRange {
                field: "bypass",
                value: value as i64,
                max: BYPASS_MAX as i64,
            });
        }
        let bypass = if value != 0 { Bypass::On } else { Bypass::Off };

        let enabled = {
            let mut state = self.state.lock().unwrap();
            state.bypass = bypass;
            state.enabled
        };

        let table = self.store.lookup_bypass(bypass);
        let result = self.dispatcher.apply(enabled, &table);
        info!("{}", table.name());
        result
    }

    /// Feed an ambient light reading; re-applies only when the
    /// resolved high-brightness tier changes.
    pub fn set_lux(&self, lux: i32) -> Result<(), MdnieError> {
        let changed = {
            let mut state = self.state.lock().unwrap();
            let level = HbmLevel::from_lux(lux);
            let changed = state.hbm != level;
            if changed {
                state.hbm = level;
            }
            changed
        };
        if !changed {
            return Ok(());
        }
        info!("lux: {}", lux);
        self.update()
    }

    /// Enable or disable the tuning-file override. Disabling clears
    /// the stored path.
    pub fn set_tuning(&self, enable: bool) -> Result<(), MdnieError> {
        let mut state = self.state.lock().unwrap();
        state.tuning = enable;
        if !enable {
            state.tuning_path = None;
        }
        info!("tuning: {}", if enable { "enable" } else { "disable" });
        Ok(())
    }

    /// Accept a tuning override file name and re-apply.
    ///
    /// Ignored while the override is disabled. The name is joined onto
    /// the fixed tuning directory.
    pub fn set_tuning_file(&self, name: &str) -> Result<(), MdnieError> {
        {
            let mut state = self.state.lock().unwrap();
            if !state.tuning {
                return Ok(());
            }
            if name.len() > TUNING_NAME_MAX {
                return Err(MdnieError::NameTooLong(name.len()));
            }
            let path = format!("{}{}", TUNING_DIR, name);
            info!("tuning file: {}", path);
            state.tuning_path = Some(path);
        }
        self.update()
    }

    /// Apply a one-off white point without touching the catalog.
    ///
    /// Permitted only while the panel is enabled, accessibility is
    /// off, the mode is auto, and the scenario is browser or e-book;
    /// otherwise a no-op. Values truncate to bytes.
    pub fn set_white_point(&self, r: i32, g: i32, b: i32) -> Result<(), MdnieError> {
        let snapshot = self.state.lock().unwrap().clone();
        let permitted = snapshot.enabled
            && snapshot.accessibility == Accessibility::Off
            && snapshot.mode == Mode::Auto
            && matches!(snapshot.scenario, Scenario::Browser | Scenario::Ebook);
        if !permitted {
            debug!("white point override rejected by current state");
            return Ok(());
        }

        let rgb = (r as u8, g as u8, b as u8);
        info!("white point: {}, {}, {}", rgb.0, rgb.1, rgb.2);

        let Some(mut buffer) = select_table(&self.store, &snapshot) else {
            return Ok(());
        };
        buffer.set_white_point(rgb);
        self.state.lock().unwrap().white_point = rgb;
        self.update_sequence(&snapshot, &buffer)
    }

    /// React to a display power transition.
    pub fn on_power_event(&self, event: PowerEvent) {
        info!("power event: {:?}", event);
        match event {
            PowerEvent::Unblank => {
                self.state.lock().unwrap().enabled = true;
                if let Err(err) = self.update() {
                    warn!("re-apply after unblank failed: {}", err);
                }
            }
            PowerEvent::PowerDown => {
                self.state.lock().unwrap().enabled = false;
            }
        }
    }

    /// Read the currently selected table back from the panel and diff
    /// it against the catalog.
    pub fn readback(&self) -> Result<ReadbackReport, MdnieError> {
        let snapshot = self.state.lock().unwrap().clone();
        if !snapshot.enabled {
            return Err(MdnieError::DeviceDisabled);
        }
        let table = select_table(&self.store, &snapshot).ok_or(MdnieError::NoTableSelected)?;
        self.dispatcher.verify(&table)
    }

    /// Recompute the color-correction offsets and classified index.
    ///
    /// Available only after the one-shot correction has been
    /// attempted.
    pub fn color_correction(&self) -> Result<CorrectionReport, MdnieError> {
        if !self.state.lock().unwrap().color_corrected {
            return Err(MdnieError::CalibrationUnavailable);
        }
        let (offsets, index) = self.resolve_calibration()?;
        Ok(CorrectionReport { offsets, index })
    }

    /// Re-select and apply the table for the current state.
    fn update(&self) -> Result<(), MdnieError> {
        let snapshot = self.state.lock().unwrap().clone();
        if !snapshot.enabled {
            debug!("update skipped, panel disabled");
            return Ok(());
        }
        let Some(table) = select_table(&self.store, &snapshot) else {
            info!("no table for scenario {:?}", snapshot.scenario);
            return Ok(());
        };

        let result = self.update_sequence(&snapshot, &table);
        info!("{}", table.name());

        // The reported white point follows the base table even when an
        // override was written.
        if let Some(white) = table.white_point() {
            self.state.lock().unwrap().white_point = white;
        }
        result
    }

    fn update_sequence(
        &self,
        snapshot: &DeviceState,
        table: &TuningTable,
    ) -> Result<(), MdnieError> {
        if snapshot.tuning {
            if let (Some(source), Some(path)) = (&self.override_source, &snapshot.tuning_path) {
                if let Some(replacement) = source.request(path, table) {
                    debug!("tuning override: {}", path);
                    return self.dispatcher.apply(snapshot.enabled, &replacement);
                }
            }
        }
        self.dispatcher.apply(snapshot.enabled, table)
    }

    /// One-shot color correction; the attempt flag sticks even when
    /// the coordinate source fails.
    fn calibrate_once(&self) {
        let first = {
            let mut state = self.state.lock().unwrap();
            !std::mem::replace(&mut state.color_corrected, true)
        };
        if !first {
            return;
        }
        match self.resolve_calibration() {
            Ok((_, index)) => {
                if let Some(rgb) = coordinate_rgb(index) {
                    let patched = self.store.patch_white_point(rgb);
                    info!("color correction tune{}: {} tables patched", index, patched);
                }
            }
            Err(_) => info!("color correction skipped"),
        }
    }

    fn resolve_calibration(&self) -> Result<([i32; 4], u32), MdnieError> {
        let source = self
            .coordinate_source
            .as_ref()
            .ok_or(MdnieError::CalibrationUnavailable)?;
        let (x, y) = source
            .coordinate()
            .ok_or(MdnieError::CalibrationUnavailable)?;
        if x == 0 && y == 0 {
            return Err(MdnieError::CalibrationUnavailable);
        }
        let offsets = color_offsets(x, y);
        let index = self.classifier.classify(&offsets);
        debug!("coordinate ({}, {}) -> tune{}", x, y, index);
        Ok((offsets, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLink;
    use crate::panel::builtin_store;
    use crate::state::SCENARIO_DMB;
    use crate::tables::{CommandSlot, WHITE_SENTINEL};

    struct StaticCoordinate(i32, i32);

    impl CoordinateSource for StaticCoordinate {
        fn coordinate(&self) -> Option<(i32, i32)> {
            Some((self.0, self.1))
        }
    }

    struct NoCoordinate;

    impl CoordinateSource for NoCoordinate {
        fn coordinate(&self) -> Option<(i32, i32)> {
            None
        }
    }

    fn controller() -> (Arc<MockLink>, MdnieController) {
        controller_with(ControllerOptions::default())
    }

    fn controller_with(options: ControllerOptions) -> (Arc<MockLink>, MdnieController) {
        let link = Arc::new(MockLink::new());
        let controller = MdnieController::new(link.clone(), builtin_store(), options);
        link.clear();
        (link, controller)
    }

    fn dispatch_count(link: &MockLink) -> usize {
        link.writes().len() / CommandSlot::ALL.len()
    }

    #[test]
    fn new_applies_the_default_table() {
        let link = Arc::new(MockLink::new());
        let controller = MdnieController::new(
            link.clone(),
            builtin_store(),
            ControllerOptions::default(),
        );
        assert_eq!(dispatch_count(&link), 1);
        assert_eq!(controller.scenario(), Scenario::Ui);
        assert_eq!(controller.mode(), Mode::Standard);
        // White point reflects the applied (sentinel-valued) table.
        assert_eq!(controller.white_point(), WHITE_SENTINEL);
    }

    #[test]
    fn invalid_mode_is_rejected_and_state_unchanged() {
        let (link, controller) = controller();
        let before = controller.state();

        let err = controller.set_mode(MODE_MAX).unwrap_err();
        assert!(matches!(err, MdnieError::InvalidRange { field: "mode", .. }));

        let after = controller.state();
        assert_eq!(after.mode, before.mode);
        assert!(!after.color_corrected);
        assert!(link.writes().is_empty());
    }

    #[test]
    fn invalid_scenario_resets_to_ui() {
        let (link, controller) = controller();
        controller.set_scenario(9).unwrap();
        assert_eq!(controller.scenario(), Scenario::Ebook);
        link.clear();

        controller.set_scenario(SCENARIO_DMB + 7).unwrap();
        assert_eq!(controller.scenario(), Scenario::Ui);
        assert_eq!(dispatch_count(&link), 1);
    }

    #[test]
    fn scenario_gap_value_resets_to_ui() {
        let (_link, controller) = controller();
        controller.set_scenario(2).unwrap();
        assert_eq!(controller.scenario(), Scenario::Ui);
    }

    #[test]
    fn lux_dispatches_only_on_tier_change() {
        let (link, controller) = controller();

        controller.set_lux(50_000).unwrap();
        controller.set_lux(60_000).unwrap();
        controller.set_lux(45_000).unwrap();
        assert_eq!(controller.hbm(), HbmLevel::On);
        assert_eq!(dispatch_count(&link), 1);

        controller.set_lux(200).unwrap();
        assert_eq!(controller.hbm(), HbmLevel::Off);
        assert_eq!(dispatch_count(&link), 2);
    }

    #[test]
    fn power_down_blocks_writes_until_unblank() {
        let (link, controller) = controller();

        controller.on_power_event(PowerEvent::PowerDown);
        controller.set_mode(Mode::Movie.raw()).unwrap();
        controller.set_scenario(Scenario::Gallery.raw()).unwrap();
        controller.set_lux(80_000).unwrap();
        controller.set_bypass(1).unwrap();
        assert!(link.writes().is_empty());

        controller.on_power_event(PowerEvent::Unblank);
        assert_eq!(dispatch_count(&link), 1);
    }

    #[test]
    fn white_point_override_never_touches_the_store() {
        let (link, controller) = controller();
        controller.set_mode(Mode::Auto.raw()).unwrap();
        controller.set_scenario(Scenario::Browser.raw()).unwrap();
        let before = controller
            .store()
            .lookup(Scenario::Browser, Mode::Auto)
            .unwrap();
        link.clear();

        controller.set_white_point(250, 249, 248).unwrap();
        assert_eq!(controller.white_point(), (250, 249, 248));

        let after = controller
            .store()
            .lookup(Scenario::Browser, Mode::Auto)
            .unwrap();
        assert_eq!(before, after);

        // The applied buffer carries the override.
        let writes = link.writes();
        let cmd1 = &writes[CommandSlot::Cmd1.index()];
        let mut patched = before.clone();
        patched.set_white_point((250, 249, 248));
        assert_eq!(cmd1.as_slice(), patched.sequence(CommandSlot::Cmd1));
    }

    #[test]
    fn white_point_override_requires_auto_browser_or_ebook() {
        let (link, controller) = controller();
        controller.set_mode(Mode::Auto.raw()).unwrap();
        controller.set_scenario(Scenario::Gallery.raw()).unwrap();
        link.clear();

        controller.set_white_point(1, 2, 3).unwrap();
        assert!(link.writes().is_empty());

        controller.set_mode(Mode::Standard.raw()).unwrap();
        controller.set_scenario(Scenario::Ebook.raw()).unwrap();
        link.clear();
        controller.set_white_point(1, 2, 3).unwrap();
        assert!(link.writes().is_empty());
    }

    #[test]
    fn first_mode_change_calibrates_the_catalog() {
        let options = ControllerOptions {
            coordinate_source: Some(Box::new(StaticCoordinate(2931, 3085))),
            ..ControllerOptions::default()
        };
        let (_link, controller) = controller_with(options);

        controller.set_mode(Mode::Auto.raw()).unwrap();

        let expected =
            coordinate_rgb(SignClassifier.classify(&color_offsets(2931, 3085))).unwrap();
        let ui = controller.store().lookup(Scenario::Ui, Mode::Standard).unwrap();
        assert_eq!(ui.white_point(), Some(expected));
        // Styled tables keep their white point.
        let ebook = controller.store().lookup(Scenario::Ebook, Mode::Auto).unwrap();
        assert_ne!(ebook.white_point(), Some(expected));

        let report = controller.color_correction().unwrap();
        assert_eq!(report.index, SignClassifier.classify(&report.offsets));
    }

    #[test]
    fn failed_calibration_is_sticky() {
        let options = ControllerOptions {
            coordinate_source: Some(Box::new(NoCoordinate)),
            ..ControllerOptions::default()
        };
        let (_link, controller) = controller_with(options);

        controller.set_mode(Mode::Natural.raw()).unwrap();
        assert!(controller.state().color_corrected);

        let ui = controller.store().lookup(Scenario::Ui, Mode::Standard).unwrap();
        assert_eq!(ui.white_point(), Some(WHITE_SENTINEL));

        let err = controller.color_correction().unwrap_err();
        assert!(matches!(err, MdnieError::CalibrationUnavailable));
    }

    #[test]
    fn zero_coordinate_is_invalid() {
        let options = ControllerOptions {
            coordinate_source: Some(Box::new(StaticCoordinate(0, 0))),
            ..ControllerOptions::default()
        };
        let (_link, controller) = controller_with(options);

        controller.set_mode(Mode::Auto.raw()).unwrap();
        let ui = controller.store().lookup(Scenario::Ui, Mode::Standard).unwrap();
        assert_eq!(ui.white_point(), Some(WHITE_SENTINEL));
    }

    #[test]
    fn correction_diag_requires_a_prior_attempt() {
        let (_link, controller) = controller();
        let err = controller.color_correction().unwrap_err();
        assert!(matches!(err, MdnieError::CalibrationUnavailable));
    }

    #[test]
    fn accessibility_selects_and_patches() {
        let (link, controller) = controller();

        controller
            .set_accessibility(Accessibility::ColorBlind.raw(), &[0x0102, 0x0304])
            .unwrap();
        let writes = link.writes();
        assert_eq!(writes.len(), CommandSlot::ALL.len());
        let applied = controller
            .store()
            .lookup_accessibility(Accessibility::ColorBlind)
            .unwrap();
        assert_eq!(
            writes[CommandSlot::Cmd1.index()].as_slice(),
            applied.sequence(CommandSlot::Cmd1)
        );

        let err = controller
            .set_accessibility(ACCESSIBILITY_MAX, &[])
            .unwrap_err();
        assert!(matches!(err, MdnieError::InvalidRange { .. }));

        let err = controller
            .set_accessibility(Accessibility::ColorBlind.raw(), &[0; 10])
            .unwrap_err();
        assert!(matches!(err, MdnieError::InvalidRange { .. }));
    }

    #[test]
    fn bypass_writes_directly() {
        let (link, controller) = controller();
        controller.set_bypass(1).unwrap();
        assert_eq!(controller.bypass(), Bypass::On);

        let writes = link.writes();
        assert_eq!(writes.len(), CommandSlot::ALL.len());
        let table = controller.store().lookup_bypass(Bypass::On);
        assert_eq!(
            writes[CommandSlot::Cmd1.index()].as_slice(),
            table.sequence(CommandSlot::Cmd1)
        );

        assert!(matches!(
            controller.set_bypass(2).unwrap_err(),
            MdnieError::InvalidRange { .. }
        ));
    }

    #[test]
    fn tuning_file_requires_the_override_flag() {
        let (link, controller) = controller();

        controller.set_tuning_file("night.dat").unwrap();
        assert_eq!(controller.tuning(), (false, None));
        assert!(link.writes().is_empty());

        controller.set_tuning(true).unwrap();
        controller.set_tuning_file("night.dat").unwrap();
        let (enabled, path) = controller.tuning();
        assert!(enabled);
        assert_eq!(path.as_deref(), Some("/sdcard/mdnie/night.dat"));
        assert_eq!(dispatch_count(&link), 1);

        let long = "x".repeat(TUNING_NAME_MAX + 1);
        assert!(matches!(
            controller.set_tuning_file(&long).unwrap_err(),
            MdnieError::NameTooLong(_)
        ));

        controller.set_tuning(false).unwrap();
        assert_eq!(controller.tuning(), (false, None));
    }

    #[test]
    fn tuning_override_replaces_the_applied_table() {
        struct FixedOverride;

        impl TableSource for FixedOverride {
            fn request(&self, path: &str, base: &TuningTable) -> Option<TuningTable> {
                if path.ends_with("night.dat") {
                    let mut t = base.clone();
                    t.set_white_point((0x11, 0x22, 0x33));
                    Some(t)
                } else {
                    None
                }
            }
        }

        let options = ControllerOptions {
            override_source: Some(Box::new(FixedOverride)),
            ..ControllerOptions::default()
        };
        let (link, controller) = controller_with(options);

        controller.set_tuning(true).unwrap();
        controller.set_tuning_file("night.dat").unwrap();
        let writes = link.writes();
        let base = controller.store().lookup(Scenario::Ui, Mode::Standard).unwrap();
        let mut expected = base.clone();
        expected.set_white_point((0x11, 0x22, 0x33));
        assert_eq!(
            writes[CommandSlot::Cmd1.index()].as_slice(),
            expected.sequence(CommandSlot::Cmd1)
        );

        // Unknown file: fall back to the built-in table.
        link.clear();
        controller.set_tuning_file("other.dat").unwrap();
        let writes = link.writes();
        assert_eq!(
            writes[CommandSlot::Cmd1.index()].as_slice(),
            base.sequence(CommandSlot::Cmd1)
        );
    }

    #[test]
    fn readback_reflects_the_register_image() {
        let (link, controller) = controller();
        // The initial apply mirrored the table into the mock's image.
        controller.on_power_event(PowerEvent::Unblank);
        let report = controller.readback().unwrap();
        assert_eq!(report.table, "ui_standard");
        assert_eq!(report.mismatch_count(), 0);

        controller.on_power_event(PowerEvent::PowerDown);
        assert!(matches!(
            controller.readback().unwrap_err(),
            MdnieError::DeviceDisabled
        ));
    }
}
