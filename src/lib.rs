#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

// Публичные модули
pub mod api;      // высокий уровень: контроллер, ручка, сообщения
pub mod core;     // общие типы и ошибки (DetectionEvent, Symbology, ScanError)
pub mod prelude;  // удобные re-export'ы

pub mod capture;  // плёнка снятых фото
pub mod config;   // ScanConfig (TOML)
pub mod dedup;    // ScanDeduplicator — дедупликация распознаваний
pub mod overlay;  // полигон, презентер, таймер скрытия

// Реэкспорт базовых типов в корень
pub use crate::core::error::ScanError;
pub use crate::core::types::{DetectionEvent, Point, Quad, Symbology};

pub use crate::api::{CodeHandler, NewCode, ScanController, ScanHandle, ScanSummary};
pub use crate::config::ScanConfig;
pub use crate::dedup::{ScanDeduplicator, ScanOutcome};
pub use crate::overlay::{OverlayCommand, OverlayPresenter, Polygon};

/// One-shot: прогнать последовательность событий через свежий дедупликатор
/// и вернуть `new_code` для каждого события.
pub fn dedup_all<I>(events: I) -> Vec<Option<String>>
where
    I: IntoIterator<Item = DetectionEvent>,
{
    let mut d = ScanDeduplicator::default();
    events.into_iter().map(|e| d.on_detected(e).new_code).collect()
}
