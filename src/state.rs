//! Device state and the validated value domains behind it.

use crate::panel::HBM_LUX_THRESHOLD;

/// Exclusive upper bound of the ordinary scenario range.
pub const SCENARIO_MAX: u32 = 11;
/// Raw marker value for the broadcast-TV scenario.
pub const SCENARIO_DMB: u32 = 20;
/// Number of rendering modes.
pub const MODE_MAX: u32 = 5;
/// Number of accessibility settings, including off.
pub const ACCESSIBILITY_MAX: u32 = 4;
/// Number of high-brightness tiers, including off.
pub const HBM_MAX: u32 = 2;
/// Number of bypass states.
pub const BYPASS_MAX: u32 = 2;

/// Application context driving table selection.
///
/// Raw values 2 and 3 are a reserved gap (extended video variants on
/// other panels) and do not map to a scenario here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Default UI scenario.
    Ui,
    /// Video playback.
    VideoNormal,
    /// Camera preview.
    Camera,
    /// Navigation.
    Navi,
    /// Image gallery.
    Gallery,
    /// Video telephony.
    Vt,
    /// Web browser.
    Browser,
    /// E-book reader.
    Ebook,
    /// Email reader.
    Email,
    /// Broadcast TV (DMB). Selectable even without tuner tables
    /// compiled in; selection then falls through to no table.
    Dmb,
}

impl Scenario {
    /// Every ordinary scenario, in catalog order.
    pub const ORDINARY: [Scenario; 9] = [
        Scenario::Ui,
        Scenario::VideoNormal,
        Scenario::Camera,
        Scenario::Navi,
        Scenario::Gallery,
        Scenario::Vt,
        Scenario::Browser,
        Scenario::Ebook,
        Scenario::Email,
    ];

    /// Map a raw scenario value into the domain.
    pub fn from_raw(value: u32) -> Option<Scenario> {
        match value {
            0 => Some(Scenario::Ui),
            1 => Some(Scenario::VideoNormal),
            4 => Some(Scenario::Camera),
            5 => Some(Scenario::Navi),
            6 => Some(Scenario::Gallery),
            7 => Some(Scenario::Vt),
            8 => Some(Scenario::Browser),
            9 => Some(Scenario::Ebook),
            10 => Some(Scenario::Email),
            SCENARIO_DMB => Some(Scenario::Dmb),
            _ => None,
        }
    }

    /// The raw register-interface value.
    pub fn raw(self) -> u32 {
        match self {
            Scenario::Ui => 0,
            Scenario::VideoNormal => 1,
            Scenario::Camera => 4,
            Scenario::Navi => 5,
            Scenario::Gallery => 6,
            Scenario::Vt => 7,
            Scenario::Browser => 8,
            Scenario::Ebook => 9,
            Scenario::Email => 10,
            Scenario::Dmb => SCENARIO_DMB,
        }
    }

    /// Whether this scenario selects from the ordinary catalog.
    pub fn is_ordinary(self) -> bool {
        self != Scenario::Dmb
    }

    /// Position in [`Scenario::ORDINARY`]; `None` for DMB.
    pub(crate) fn ordinary_index(self) -> Option<usize> {
        Scenario::ORDINARY.iter().position(|s| *s == self)
    }

    pub(crate) fn token(self) -> &'static str {
        match self {
            Scenario::Ui => "ui",
            Scenario::VideoNormal => "video",
            Scenario::Camera => "camera",
            Scenario::Navi => "navi",
            Scenario::Gallery => "gallery",
            Scenario::Vt => "vt",
            Scenario::Browser => "browser",
            Scenario::Ebook => "ebook",
            Scenario::Email => "email",
            Scenario::Dmb => "dmb",
        }
    }
}

/// Color rendering style, orthogonal to [`Scenario`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Saturated, high-contrast rendering.
    Dynamic,
    /// Factory-standard rendering.
    Standard,
    /// Natural gamut.
    Natural,
    /// Cinema rendering.
    Movie,
    /// Content-adaptive rendering.
    Auto,
}

impl Mode {
    /// Every mode, in catalog order.
    pub const ALL: [Mode; 5] = [
        Mode::Dynamic,
        Mode::Standard,
        Mode::Natural,
        Mode::Movie,
        Mode::Auto,
    ];

    /// Map a raw mode value into the domain.
    pub fn from_raw(value: u32) -> Option<Mode> {
        match value {
            0 => Some(Mode::Dynamic),
            1 => Some(Mode::Standard),
            2 => Some(Mode::Natural),
            3 => Some(Mode::Movie),
            4 => Some(Mode::Auto),
            _ => None,
        }
    }

    /// The raw register-interface value.
    pub fn raw(self) -> u32 {
        match self {
            Mode::Dynamic => 0,
            Mode::Standard => 1,
            Mode::Natural => 2,
            Mode::Movie => 3,
            Mode::Auto => 4,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.raw() as usize
    }

    pub(crate) fn token(self) -> &'static str {
        match self {
            Mode::Dynamic => "dynamic",
            Mode::Standard => "standard",
            Mode::Natural => "natural",
            Mode::Movie => "movie",
            Mode::Auto => "auto",
        }
    }
}

/// Vision-accessibility adjustment, highest selection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// No accessibility adjustment.
    Off,
    /// Inverted colors.
    Negative,
    /// Color-blind assist; its table accepts a correction payload.
    ColorBlind,
    /// Near-black screen curtain.
    ScreenCurtain,
}

impl Accessibility {
    /// Map a raw accessibility value into the domain.
    pub fn from_raw(value: u32) -> Option<Accessibility> {
        match value {
            0 => Some(Accessibility::Off),
            1 => Some(Accessibility::Negative),
            2 => Some(Accessibility::ColorBlind),
            3 => Some(Accessibility::ScreenCurtain),
            _ => None,
        }
    }

    /// The raw register-interface value.
    pub fn raw(self) -> u32 {
        match self {
            Accessibility::Off => 0,
            Accessibility::Negative => 1,
            Accessibility::ColorBlind => 2,
            Accessibility::ScreenCurtain => 3,
        }
    }
}

/// High-brightness tier resolved from ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HbmLevel {
    /// Normal brightness range.
    Off,
    /// Outdoor high-brightness tier.
    On,
}

impl HbmLevel {
    /// Resolve a raw lux reading to a discrete tier.
    ///
    /// Monotonic step function; the threshold comes from the panel
    /// profile.
    pub fn from_lux(lux: i32) -> HbmLevel {
        if lux >= HBM_LUX_THRESHOLD {
            HbmLevel::On
        } else {
            HbmLevel::Off
        }
    }
}

/// Post-processing bypass state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bypass {
    /// Engine active.
    Off,
    /// Pass-through, post-processing disabled.
    On,
}

/// Display power transition delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    /// Panel left blanking; writes are possible again.
    Unblank,
    /// Panel powered down; writes must stop.
    PowerDown,
}

/// A snapshot of the engine's device state.
#[derive(Debug, Clone)]
pub struct DeviceState {
    /// Whether the panel accepts register writes.
    pub enabled: bool,
    /// Current application scenario.
    pub scenario: Scenario,
    /// Current rendering mode.
    pub mode: Mode,
    /// Current accessibility setting.
    pub accessibility: Accessibility,
    /// Current high-brightness tier.
    pub hbm: HbmLevel,
    /// Current bypass state.
    pub bypass: Bypass,
    /// Whether a tuning-file override is active.
    pub tuning: bool,
    /// Resolved tuning-file path, if one was accepted.
    pub tuning_path: Option<String>,
    /// Sticky flag: panel color correction has been attempted.
    pub color_corrected: bool,
    /// White point of the last applied table (R, G, B).
    pub white_point: (u8, u8, u8),
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            enabled: false,
            scenario: Scenario::Ui,
            mode: Mode::Standard,
            accessibility: Accessibility::Off,
            hbm: HbmLevel::Off,
            bypass: Bypass::Off,
            tuning: false,
            tuning_path: None,
            color_corrected: false,
            white_point: (0, 0, 0),
        }
    }
}
