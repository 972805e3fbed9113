//! Общие типы и ошибки, не зависящие от контроллера.

pub mod error;
pub mod types;
