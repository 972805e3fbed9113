// src/api.rs
//
// Верхнеуровневый API: контроллер живого сканирования.
//
// Все события (распознавания, тики таймера скрытия, фото, активация экрана)
// обрабатываются одним потребителем на одной tokio-задаче. Состояние
// принадлежит задаче целиком — наружу торчит только `ScanHandle`.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::capture::{CaptureRoll, CapturedPhoto};
use crate::config::ScanConfig;
use crate::core::error::ScanError;
use crate::core::types::{DetectionEvent, Symbology};
use crate::dedup::ScanDeduplicator;
use crate::overlay::{HideTick, HideTimer, OverlayCommand, OverlayPresenter};

/// Новый (отличный от предыдущего) код.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCode {
    pub payload: String,
    pub symbology: Symbology,
    /// Счётчик распознаваний в текущей сессии после этого кода.
    pub detection_count: u64,
}

/// Получатель новых кодов (звук, вибрация, навигация — на стороне UI).
pub trait CodeHandler: Send {
    fn on_new_code(&mut self, code: &NewCode);
}

impl<F> CodeHandler for F
where
    F: FnMut(&NewCode) + Send,
{
    #[inline]
    fn on_new_code(&mut self, code: &NewCode) {
        self(code);
    }
}

/// Снимок состояния для UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanStatus {
    pub detection_count: u64,
    pub last_payload: Option<String>,
    pub photo_count: usize,
    pub photo_label: String,
    pub done_visible: bool,
    pub hide_pending: bool,
}

/// Итог работы контроллера после остановки цикла.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Счётчик текущей сессии (с последней активации).
    pub detection_count: u64,
    /// Всего новых кодов за всё время, включая сессии до сброса.
    pub codes_reported: u64,
    pub photos: usize,
}

#[derive(Debug)]
pub enum ScanMessage {
    Detected(DetectionEvent),
    /// Экран сканирования снова стал активным — сессия сбрасывается.
    Activated,
    PhotoCaptured(CapturedPhoto),
    Cancel,
    Finish(oneshot::Sender<Vec<CapturedPhoto>>),
    Status(oneshot::Sender<ScanStatus>),
}

/// Клонируемая ручка для отправки событий в контроллер.
#[derive(Clone, Debug)]
pub struct ScanHandle {
    tx: mpsc::Sender<ScanMessage>,
}

impl ScanHandle {
    #[inline]
    pub async fn send(&self, msg: ScanMessage) -> Result<(), ScanError> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| ScanError::ControllerClosed)
    }

    #[inline]
    pub async fn detected(&self, event: DetectionEvent) -> Result<(), ScanError> {
        self.send(ScanMessage::Detected(event)).await
    }

    /// Неблокирующая отправка из потока захвата. При полной очереди кадр
    /// отбрасывается и возвращается `Ok(false)`.
    pub fn try_detected(&self, event: DetectionEvent) -> Result<bool, ScanError> {
        match self.tx.try_send(ScanMessage::Detected(event)) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ScanError::ControllerClosed),
        }
    }

    #[inline]
    pub async fn activate(&self) -> Result<(), ScanError> {
        self.send(ScanMessage::Activated).await
    }

    #[inline]
    pub async fn photo(&self, photo: CapturedPhoto) -> Result<(), ScanError> {
        self.send(ScanMessage::PhotoCaptured(photo)).await
    }

    #[inline]
    pub async fn cancel(&self) -> Result<(), ScanError> {
        self.send(ScanMessage::Cancel).await
    }

    /// Забрать снятые фото в порядке съёмки (кнопка Done).
    pub async fn finish(&self) -> Result<Vec<CapturedPhoto>, ScanError> {
        let (reply, rx) = oneshot::channel();
        self.send(ScanMessage::Finish(reply)).await?;
        rx.await.map_err(|_| ScanError::ControllerClosed)
    }

    pub async fn status(&self) -> Result<ScanStatus, ScanError> {
        let (reply, rx) = oneshot::channel();
        self.send(ScanMessage::Status(reply)).await?;
        rx.await.map_err(|_| ScanError::ControllerClosed)
    }
}

enum Wake {
    Message(Option<ScanMessage>),
    Hide(HideTick),
}

/// Контроллер экрана сканирования. Коллабораторы передаются в конструктор.
pub struct ScanController<P, H> {
    config: ScanConfig,
    dedup: ScanDeduplicator,
    timer: HideTimer,
    ticks: mpsc::UnboundedReceiver<HideTick>,
    roll: CaptureRoll,
    presenter: P,
    handler: H,
    codes_reported: u64,
}

impl<P, H> ScanController<P, H>
where
    P: OverlayPresenter + 'static,
    H: CodeHandler + 'static,
{
    pub fn new(config: ScanConfig, presenter: P, handler: H) -> Self {
        let (timer, ticks) = HideTimer::new();
        Self {
            dedup: ScanDeduplicator::new(config.hide_delay()),
            config,
            timer,
            ticks,
            roll: CaptureRoll::new(),
            presenter,
            handler,
            codes_reported: 0,
        }
    }

    /// Запустить цикл на tokio-задаче. Цикл завершается, когда все ручки дропнуты.
    pub fn spawn(self) -> (ScanHandle, JoinHandle<ScanSummary>) {
        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        let task = tokio::spawn(self.run(rx));
        (ScanHandle { tx }, task)
    }

    async fn run(mut self, mut rx: mpsc::Receiver<ScanMessage>) -> ScanSummary {
        info!(
            hide_delay_ms = self.config.overlay_hide_delay_ms,
            "scan controller started"
        );
        loop {
            let wake = tokio::select! {
                msg = rx.recv() => Wake::Message(msg),
                Some(tick) = self.ticks.recv() => Wake::Hide(tick),
            };
            match wake {
                Wake::Message(Some(msg)) => self.handle(msg),
                Wake::Message(None) => break,
                Wake::Hide(tick) => self.on_hide_tick(tick),
            }
        }
        self.timer.cancel();

        let summary = ScanSummary {
            detection_count: self.dedup.session().detection_count(),
            codes_reported: self.codes_reported,
            photos: self.roll.len(),
        };
        info!(?summary, "scan controller stopped");
        summary
    }

    fn handle(&mut self, msg: ScanMessage) {
        match msg {
            ScanMessage::Detected(event) => self.on_detected(event),
            ScanMessage::Activated => {
                self.dedup.reset();
                info!("scan view activated, session reset");
            }
            ScanMessage::PhotoCaptured(photo) => {
                if self.roll.push(photo) {
                    debug!(label = %self.roll.label(), "photo captured");
                }
            }
            ScanMessage::Cancel => self.roll.clear(),
            ScanMessage::Finish(reply) => {
                let photos = self.roll.take();
                info!(count = photos.len(), "handing photos to viewer");
                let _ = reply.send(photos);
            }
            ScanMessage::Status(reply) => {
                let _ = reply.send(self.status());
            }
        }
    }

    fn on_detected(&mut self, event: DetectionEvent) {
        let symbology = event.symbology;
        if !self.config.accepts(symbology) {
            debug!(%symbology, "symbology disabled, skipping");
            return;
        }
        debug!(%symbology, corners = event.corners.len(), "detection");

        let outcome = self.dedup.on_detected(event);
        if let Some(refresh) = outcome.overlay {
            for cmd in refresh.into_commands() {
                self.apply(cmd);
            }
        }
        if let Some(payload) = outcome.new_code {
            self.codes_reported += 1;
            let code = NewCode {
                payload,
                symbology,
                detection_count: self.dedup.session().detection_count(),
            };
            info!(payload = %code.payload, %symbology, count = code.detection_count, "new code");
            self.handler.on_new_code(&code);
        }
    }

    fn apply(&mut self, cmd: OverlayCommand) {
        match cmd {
            OverlayCommand::Show(polygon) => self.presenter.show(&polygon),
            OverlayCommand::HideAfter(delay) => {
                self.timer.schedule(delay);
            }
        }
    }

    fn on_hide_tick(&mut self, tick: HideTick) {
        if self.timer.fire(tick) {
            self.presenter.hide();
        } else {
            debug!(generation = tick.0, "stale hide tick ignored");
        }
    }

    fn status(&self) -> ScanStatus {
        let session = self.dedup.session();
        ScanStatus {
            detection_count: session.detection_count(),
            last_payload: session.last_payload().map(str::to_string),
            photo_count: self.roll.len(),
            photo_label: self.roll.label(),
            done_visible: self.roll.done_visible(),
            hide_pending: self.timer.is_pending(),
        }
    }
}
