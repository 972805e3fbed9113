//! Плёнка снятых фото: порядок съёмки, подпись «N Photos», кнопка Done.

use tracing::warn;

/// Снятое фото в закодированном виде (как отдал слой захвата).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub data: Vec<u8>,
}

impl CapturedPhoto {
    #[inline]
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CaptureRoll {
    photos: Vec<CapturedPhoto>,
}

impl CaptureRoll {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить фото в конец. Пустые данные отбрасываются; возвращает, принято ли фото.
    pub fn push(&mut self, photo: CapturedPhoto) -> bool {
        if photo.data.is_empty() {
            warn!("captured photo has no data, dropping");
            return false;
        }
        self.photos.push(photo);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Последнее фото — для превью.
    #[inline]
    pub fn last(&self) -> Option<&CapturedPhoto> {
        self.photos.last()
    }

    pub fn label(&self) -> String {
        format!("{} Photos", self.photos.len())
    }

    #[inline]
    pub fn done_visible(&self) -> bool {
        !self.photos.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Отдать все фото в порядке съёмки, плёнка остаётся пустой.
    #[inline]
    pub fn take(&mut self) -> Vec<CapturedPhoto> {
        std::mem::take(&mut self.photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_capture_order() {
        let mut roll = CaptureRoll::new();
        assert_eq!(roll.label(), "0 Photos");
        assert!(!roll.done_visible());

        for b in 1u8..=3 {
            assert!(roll.push(CapturedPhoto::new(vec![b])));
        }
        assert_eq!(roll.label(), "3 Photos");
        assert!(roll.done_visible());
        assert_eq!(roll.last().map(|p| p.data[0]), Some(3));

        let taken: Vec<u8> = roll.take().into_iter().map(|p| p.data[0]).collect();
        assert_eq!(taken, vec![1, 2, 3]);
        assert!(roll.is_empty());
    }

    #[test]
    fn empty_photo_dropped() {
        let mut roll = CaptureRoll::new();
        assert!(!roll.push(CapturedPhoto::new(Vec::new())));
        assert_eq!(roll.len(), 0);
    }

    #[test]
    fn clear_hides_done() {
        let mut roll = CaptureRoll::new();
        roll.push(CapturedPhoto::new(vec![0xFF, 0xD8]));
        roll.clear();
        assert!(!roll.done_visible());
        assert_eq!(roll.label(), "0 Photos");
    }
}
