//! `use ultrascan::prelude::*;` — всё нужное для встраивания контроллера.

pub use crate::api::{
    CodeHandler, NewCode, ScanController, ScanHandle, ScanMessage, ScanStatus, ScanSummary,
};
pub use crate::capture::{CaptureRoll, CapturedPhoto};
pub use crate::config::ScanConfig;
pub use crate::core::error::ScanError;
pub use crate::core::types::{DetectionEvent, Point, Quad, Symbology};
pub use crate::dedup::{ScanDeduplicator, ScanOutcome, ScanSession};
pub use crate::overlay::{
    HideTimer, OverlayCommand, OverlayPresenter, OverlayRefresh, Polygon, DEFAULT_HIDE_DELAY,
};
