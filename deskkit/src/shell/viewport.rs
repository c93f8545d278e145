//! Device class detection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Viewports narrower than this many pixels are treated as mobile.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// Which presentation a shell uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Desktop,
    Mobile,
}

/// Answers "is the viewport narrow" at the moment it is asked.
///
/// Shells ask on every render, so a source that changes over time makes
/// every shell follow it.
pub trait DeviceClassSource: Send + Sync {
    fn device_class(&self) -> DeviceClass;

    fn is_mobile(&self) -> bool {
        self.device_class() == DeviceClass::Mobile
    }
}

/// Viewport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    /// Widths strictly below this are mobile.
    pub breakpoint: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_MOBILE_BREAKPOINT,
        }
    }
}

/// A live viewport width, shared between whoever observes resizes and the
/// shells that read it.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: Arc<AtomicU32>,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(config: ViewportConfig, width: u32) -> Self {
        Self {
            width: Arc::new(AtomicU32::new(width)),
            config,
        }
    }

    pub fn width(&self) -> u32 {
        self.width.load(Ordering::SeqCst)
    }

    /// Record a resize. Returns true if the device class changed.
    pub fn set_width(&self, width: u32) -> bool {
        let before = self.device_class();
        self.width.store(width, Ordering::SeqCst);
        let after = self.device_class();
        if before != after {
            log::debug!("Viewport {}px is now {:?}", width, after);
        }
        before != after
    }

    pub fn breakpoint(&self) -> u32 {
        self.config.breakpoint
    }
}

impl DeviceClassSource for Viewport {
    fn device_class(&self) -> DeviceClass {
        if self.width() < self.config.breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// A device class that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDevice(pub DeviceClass);

impl DeviceClassSource for FixedDevice {
    fn device_class(&self) -> DeviceClass {
        self.0
    }
}
