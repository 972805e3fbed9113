//! Дедупликация живого сканирования.
//!
//! Колбэки детектора приходят с частотой кадров, пока код в кадре.
//! Уведомляем один раз на каждый *отличающийся* payload, а оверлей
//! обновляем на каждом событии с четырьмя углами.
//!
//! Сравнение — только с последним payload (один слот): A, B, A даст три
//! уведомления. Так и задумано.

use std::time::Duration;

use crate::core::types::DetectionEvent;
use crate::overlay::{OverlayRefresh, Polygon, DEFAULT_HIDE_DELAY};

/// Состояние сессии сканирования. Меняется только через `ScanDeduplicator`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSession {
    last_payload: Option<String>,
    detection_count: u64,
}

impl ScanSession {
    #[inline]
    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    #[inline]
    pub fn detection_count(&self) -> u64 {
        self.detection_count
    }
}

/// Результат обработки одного события.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanOutcome {
    /// `Some(payload)`, если код новый относительно предыдущего.
    pub new_code: Option<String>,
    /// Обновление оверлея, если у события ровно 4 угла.
    pub overlay: Option<OverlayRefresh>,
}

#[derive(Clone, Debug)]
pub struct ScanDeduplicator {
    session: ScanSession,
    hide_delay: Duration,
}

impl Default for ScanDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_DELAY)
    }
}

impl ScanDeduplicator {
    #[inline]
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            session: ScanSession::default(),
            hide_delay,
        }
    }

    #[inline]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    #[inline]
    pub fn hide_delay(&self) -> Duration {
        self.hide_delay
    }

    /// Обработать одно событие детектора. Ошибок нет: пустой payload тоже валиден.
    pub fn on_detected(&mut self, event: DetectionEvent) -> ScanOutcome {
        let DetectionEvent {
            payload, corners, ..
        } = event;

        let overlay = (corners.len() == 4).then(|| OverlayRefresh {
            polygon: Polygon::new(corners),
            hide_after: self.hide_delay,
        });

        // регистр важен, символика не важна
        if self.session.last_payload.as_deref() == Some(payload.as_str()) {
            return ScanOutcome {
                new_code: None,
                overlay,
            };
        }

        self.session.last_payload = Some(payload.clone());
        self.session.detection_count += 1;
        ScanOutcome {
            new_code: Some(payload),
            overlay,
        }
    }

    /// Сброс при повторной активации экрана сканирования.
    #[inline]
    pub fn reset(&mut self) {
        self.session = ScanSession::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Point, Symbology};
    use crate::overlay::OverlayCommand;

    fn ev(p: &str) -> DetectionEvent {
        DetectionEvent::new(p, Symbology::QR)
    }

    fn corners() -> Vec<Point> {
        vec![
            Point::new(10.0, 20.0),
            Point::new(110.0, 22.0),
            Point::new(108.0, 120.0),
            Point::new(9.0, 118.0),
        ]
    }

    #[test]
    fn a_a_b_a_scenario() {
        let mut d = ScanDeduplicator::default();
        let mut codes = Vec::new();
        let mut counts = Vec::new();
        for p in ["A", "A", "B", "A"] {
            codes.push(d.on_detected(ev(p)).new_code);
            counts.push(d.session().detection_count());
        }
        assert_eq!(
            codes,
            vec![Some("A".into()), None, Some("B".into()), Some("A".into())]
        );
        assert_eq!(counts, vec![1, 1, 2, 3]);
    }

    #[test]
    fn run_of_same_payload_reports_once() {
        let mut d = ScanDeduplicator::default();
        let reported = (0..25)
            .filter_map(|_| d.on_detected(ev("4006381333931")).new_code)
            .count();
        assert_eq!(reported, 1);
        assert_eq!(d.session().detection_count(), 1);
    }

    #[test]
    fn alternating_payloads_never_suppressed() {
        let mut d = ScanDeduplicator::default();
        for i in 0..20 {
            let p = if i % 2 == 0 { "X" } else { "Y" };
            assert_eq!(d.on_detected(ev(p)).new_code.as_deref(), Some(p));
        }
        assert_eq!(d.session().detection_count(), 20);
    }

    #[test]
    fn payload_match_is_case_sensitive_and_ignores_symbology() {
        let mut d = ScanDeduplicator::default();
        assert!(d.on_detected(ev("abc")).new_code.is_some());
        assert!(d.on_detected(ev("ABC")).new_code.is_some());
        // тот же payload другой символикой — всё равно дубль
        let same = DetectionEvent::new("ABC", Symbology::Code128);
        assert!(d.on_detected(same).new_code.is_none());
        assert_eq!(d.session().last_payload(), Some("ABC"));
    }

    #[test]
    fn empty_payload_passes_through() {
        let mut d = ScanDeduplicator::default();
        assert_eq!(d.on_detected(ev("")).new_code.as_deref(), Some(""));
        assert!(d.on_detected(ev("")).new_code.is_none());
    }

    #[test]
    fn reset_clears_session() {
        let mut d = ScanDeduplicator::default();
        d.on_detected(ev("P"));
        d.reset();
        assert_eq!(d.session(), &ScanSession::default());
        assert_eq!(d.on_detected(ev("P")).new_code.as_deref(), Some("P"));
        assert_eq!(d.session().detection_count(), 1);
    }

    #[test]
    fn four_corners_give_show_then_hide_even_for_duplicates() {
        let mut d = ScanDeduplicator::new(Duration::from_millis(250));
        d.on_detected(ev("A"));
        let out = d.on_detected(ev("A").with_corners(corners()));
        assert!(out.new_code.is_none());

        let [show, hide] = out.overlay.expect("overlay").into_commands();
        assert_eq!(show, OverlayCommand::Show(Polygon::new(corners())));
        assert_eq!(hide, OverlayCommand::HideAfter(Duration::from_millis(250)));
    }

    #[test]
    fn other_corner_counts_give_no_overlay() {
        let mut d = ScanDeduplicator::default();
        assert!(d.on_detected(ev("A")).overlay.is_none());
        let three = corners().into_iter().take(3);
        assert!(d.on_detected(ev("B").with_corners(three)).overlay.is_none());
    }

    #[test]
    fn count_equals_rising_edges() {
        let seq = ["a", "a", "b", "b", "b", "c", "a", "a", "c"];
        let mut d = ScanDeduplicator::default();
        for p in seq {
            d.on_detected(ev(p));
        }
        let edges = 1 + seq.windows(2).filter(|w| w[0] != w[1]).count() as u64;
        assert_eq!(d.session().detection_count(), edges);
    }
}
