//! Оверлей: полигон вокруг найденного символа и отложенное скрытие.
//!
//! - `Polygon` — замкнутый контур, последний угол соединяется с первым;
//! - `OverlayPresenter` — граница с UI, который реально рисует;
//! - `HideTimer` — одна отменяемая отложенная задача «скрыть». Новое
//!   планирование отменяет предыдущее (побеждает последний).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::core::types::Point;

/// Задержка скрытия оверлея по умолчанию.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(250);

/// Упорядоченный набор вершин; рисуется как замкнутый путь.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    #[inline]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Рёбра замкнутого контура в порядке вершин: (p0,p1), (p1,p2), …, (pN-1,p0).
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl From<Vec<Point>> for Polygon {
    #[inline]
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Команда для слоя представления. Короткоживущая, нигде не хранится.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayCommand {
    Show(Polygon),
    HideAfter(Duration),
}

/// Обновление оверлея от одного события: всегда пара Show → HideAfter.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayRefresh {
    pub polygon: Polygon,
    pub hide_after: Duration,
}

impl OverlayRefresh {
    #[inline]
    pub fn into_commands(self) -> [OverlayCommand; 2] {
        [
            OverlayCommand::Show(self.polygon),
            OverlayCommand::HideAfter(self.hide_after),
        ]
    }
}

/// То, что рисует оверлей. Реализуется UI-слоем.
pub trait OverlayPresenter: Send {
    fn show(&mut self, polygon: &Polygon);
    fn hide(&mut self);
}

/// Тик таймера скрытия. Несёт поколение, в котором был запланирован.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HideTick(pub u64);

/// Отменяемая отложенная задача скрытия. Не более одной в полёте.
///
/// Тики уходят в канал, чтобы скрытие обрабатывалось тем же
/// последовательным потребителем, что и распознавания. Даже если
/// отменённая задача успела отправить тик, `is_current` его отбросит.
#[derive(Debug)]
pub struct HideTimer {
    tx: mpsc::UnboundedSender<HideTick>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

impl HideTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HideTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: None,
                generation: 0,
            },
            rx,
        )
    }

    /// Запланировать скрытие через `delay`, отменив предыдущее. Требует tokio-рантайм.
    pub fn schedule(&mut self, delay: Duration) -> HideTick {
        self.cancel();
        let tick = HideTick(self.generation);
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // получатель мог уйти вместе с контроллером — это нормально
            let _ = tx.send(tick);
        }));
        trace!(generation = tick.0, ?delay, "hide scheduled");
        tick
    }

    /// Отменить ожидающее скрытие (если есть).
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Тик относится к последнему планированию и его ещё не отменили.
    pub fn is_current(&self, tick: HideTick) -> bool {
        self.pending.is_some() && tick.0 == self.generation
    }

    /// Пометить тик обработанным; возвращает `true`, если нужно скрыть.
    pub fn fire(&mut self, tick: HideTick) -> bool {
        if !self.is_current(tick) {
            return false;
        }
        self.pending = None;
        true
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for HideTimer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn polygon_edges_wrap_last_to_first() {
        let p = square();
        let edges: Vec<_> = p.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0.0, 1.0), Point::new(0.0, 0.0)));
        assert_eq!(edges[0], (Point::new(0.0, 0.0), Point::new(1.0, 0.0)));
    }

    #[test]
    fn empty_polygon_has_no_edges() {
        assert_eq!(Polygon::default().edges().count(), 0);
    }

    #[test]
    fn refresh_expands_show_then_hide() {
        let r = OverlayRefresh {
            polygon: square(),
            hide_after: DEFAULT_HIDE_DELAY,
        };
        let [a, b] = r.into_commands();
        assert_eq!(a, OverlayCommand::Show(square()));
        assert_eq!(b, OverlayCommand::HideAfter(Duration::from_millis(250)));
    }

    #[tokio::test(start_paused = true)]
    async fn hide_fires_after_delay() {
        let (mut timer, mut rx) = HideTimer::new();
        let tick = timer.schedule(Duration::from_millis(250));

        let got = rx.recv().await.expect("tick");
        assert_eq!(got, tick);
        assert!(timer.fire(got));
        assert!(!timer.is_pending());
        // повторный тот же тик уже не актуален
        assert!(!timer.fire(got));
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_cancels_previous_hide() {
        let (mut timer, mut rx) = HideTimer::new();
        let first = timer.schedule(Duration::from_millis(250));
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = timer.schedule(Duration::from_millis(250));
        assert_ne!(first, second);
        assert!(!timer.is_current(first));

        // прошло 450 мс от первого — первый тик не должен прийти
        let got = rx.recv().await.expect("tick");
        assert_eq!(got, second);
        assert!(timer.fire(got));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_hide() {
        let (mut timer, mut rx) = HideTimer::new();
        let tick = timer.schedule(Duration::from_millis(10));
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.is_current(tick));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
