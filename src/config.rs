//! Настройки сканирования (TOML).
//!
//! ```toml
//! overlay_hide_delay_ms = 250
//! queue_capacity = 64
//! symbologies = ["qr", "ean13"]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::ScanError;
use crate::core::types::Symbology;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Через сколько миллисекунд прятать оверлей, если его не показали снова.
    pub overlay_hide_delay_ms: u64,
    /// Ёмкость очереди сообщений контроллера.
    pub queue_capacity: usize,
    /// Разрешённые символики. Пусто — принимаем всё.
    pub symbologies: Vec<Symbology>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            overlay_hide_delay_ms: 250,
            queue_capacity: 64,
            symbologies: Vec::new(),
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ScanError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScanError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.queue_capacity == 0 {
            return Err(ScanError::InvalidConfig(
                "queue_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.overlay_hide_delay_ms)
    }

    /// Пропускает ли фильтр эту символику.
    #[inline]
    pub fn accepts(&self, symbology: Symbology) -> bool {
        self.symbologies.is_empty() || self.symbologies.contains(&symbology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_live_scan_screen() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.hide_delay(), Duration::from_millis(250));
        assert!(cfg.accepts(Symbology::Aztec));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = ScanConfig::from_toml_str("symbologies = [\"QR\", \"ean-13\"]").unwrap();
        assert_eq!(cfg.queue_capacity, 64);
        assert!(cfg.accepts(Symbology::QR));
        assert!(cfg.accepts(Symbology::EAN13));
        assert!(!cfg.accepts(Symbology::Code128));
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = ScanConfig::from_toml_str("queue_capacity = 0").unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_symbology_is_parse_error() {
        let err = ScanConfig::from_toml_str("symbologies = [\"maxicode\"]").unwrap_err();
        assert!(matches!(err, ScanError::ConfigParse(_)));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        assert!(ScanConfig::from_toml_str("hide_delay = 5").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScanConfig::load("/nonexistent/ultrascan.toml").unwrap_err();
        match err {
            ScanError::ConfigIo { path, .. } => {
                assert!(path.ends_with("ultrascan.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
