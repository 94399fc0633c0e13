//! Display scaling configuration.
//!
//! Tray and menu-entry icon sizes depend on the platform's DPI scaling,
//! which only an OS-specific probe can report. That probe lives outside this
//! crate; here it is just a closure handed to [`DisplayConfig::detect_with`].
//! The resulting config is an explicit value threaded to call sites, not
//! process-wide mutable state, so it is computed once at startup and never
//! changes underneath a caller.

/// Unscaled tray icon edge, in pixels.
pub const DEFAULT_TRAY_SIZE: u32 = 16;

/// Unscaled menu-entry icon edge, in pixels.
pub const DEFAULT_ENTRY_SIZE: u32 = 16;

/// Scaling factors reported by the platform probe.
///
/// A factor of 1.0 (or below) means no scaling; 2.0 doubles the icon edge,
/// and so on. Tray and menu entries can scale independently — some desktop
/// environments scale the tray but render menu icons at whatever size they
/// are given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactor {
    pub tray: f64,
    pub entry: f64,
}

impl ScalingFactor {
    /// No scaling on either surface.
    pub const NONE: Self = Self {
        tray: 1.0,
        entry: 1.0,
    };

    pub fn uniform(factor: f64) -> Self {
        Self {
            tray: factor,
            entry: factor,
        }
    }
}

/// Icon sizes to request for the current display, computed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub tray_size: u32,
    pub entry_size: u32,
}

impl DisplayConfig {
    /// Apply scaling factors to the default sizes. Factors at or below 1.0
    /// leave the default in place.
    pub fn from_scaling(factor: ScalingFactor) -> Self {
        Self {
            tray_size: scaled(DEFAULT_TRAY_SIZE, factor.tray),
            entry_size: scaled(DEFAULT_ENTRY_SIZE, factor.entry),
        }
    }

    /// Run the platform probe and derive the config from its answer.
    pub fn detect_with(probe: impl FnOnce() -> ScalingFactor) -> Self {
        Self::from_scaling(probe())
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::from_scaling(ScalingFactor::NONE)
    }
}

fn scaled(base: u32, factor: f64) -> u32 {
    if factor > 1.0 {
        (base as f64 * factor) as u32
    } else {
        base
    }
}
