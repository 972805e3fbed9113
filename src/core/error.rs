// src/core/error.rs
//
// Ошибки верхнего уровня. Само ядро дедупликации ошибок не имеет —
// здесь только конфиг, парсинг и связь с контроллером.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Не удалось прочитать файл конфигурации.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML разобрать не удалось.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Конфиг разобран, но значения недопустимы.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unknown symbology: {0:?}")]
    UnknownSymbology(String),

    /// Цикл контроллера уже остановлен — сообщение некому обработать.
    #[error("scan controller is no longer running")]
    ControllerClosed,
}
