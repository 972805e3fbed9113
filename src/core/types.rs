// src/core/types.rs
//
// Общие типы модели данных: точки, символики, события распознавания.
// Никакой логики дедупликации здесь нет — только данные и удобные билдеры.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ScanError;

/// Точка в координатах вью (как отдаёт слой превью камеры).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Четырёхугольник границ символа. Порядок углов p0..p3 сохраняется как есть.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl Quad {
    #[inline]
    pub fn corners(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }
}

impl From<Quad> for Vec<Point> {
    #[inline]
    fn from(q: Quad) -> Self {
        q.corners().to_vec()
    }
}

/// Тип распознанного символа.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbology {
    QR,
    Aztec,
    DataMatrix,
    PDF417,
    Code39,
    Code39Mod43,
    Code93,
    Code128,
    EAN8,
    EAN13,
    UPCE,
    ITF14,
    Interleaved2of5,
}

impl Symbology {
    pub const ALL: [Symbology; 13] = [
        Symbology::QR,
        Symbology::Aztec,
        Symbology::DataMatrix,
        Symbology::PDF417,
        Symbology::Code39,
        Symbology::Code39Mod43,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::EAN8,
        Symbology::EAN13,
        Symbology::UPCE,
        Symbology::ITF14,
        Symbology::Interleaved2of5,
    ];

    /// Каноническое имя (нижний регистр, без разделителей).
    pub fn name(self) -> &'static str {
        match self {
            Symbology::QR => "qr",
            Symbology::Aztec => "aztec",
            Symbology::DataMatrix => "datamatrix",
            Symbology::PDF417 => "pdf417",
            Symbology::Code39 => "code39",
            Symbology::Code39Mod43 => "code39mod43",
            Symbology::Code93 => "code93",
            Symbology::Code128 => "code128",
            Symbology::EAN8 => "ean8",
            Symbology::EAN13 => "ean13",
            Symbology::UPCE => "upce",
            Symbology::ITF14 => "itf14",
            Symbology::Interleaved2of5 => "interleaved2of5",
        }
    }

    /// Двумерные (матричные) коды.
    #[inline]
    pub fn is_2d(self) -> bool {
        matches!(
            self,
            Symbology::QR | Symbology::Aztec | Symbology::DataMatrix | Symbology::PDF417
        )
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Symbology {
    type Err = ScanError;

    /// Регистр и разделители `-`/`_` игнорируются: "EAN-13" == "ean13".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Symbology::ALL
            .into_iter()
            .find(|sym| sym.name() == norm)
            .ok_or_else(|| ScanError::UnknownSymbology(s.to_string()))
    }
}

impl TryFrom<String> for Symbology {
    type Error = ScanError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Symbology> for String {
    fn from(s: Symbology) -> Self {
        s.name().to_string()
    }
}

/// Одно событие распознавания от коллаборатора-детектора (не более одного на кадр).
/// `corners` — 0 или 4 точки; при другом количестве оверлей не рисуется.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub payload: String,
    pub symbology: Symbology,
    #[serde(default)]
    pub corners: Vec<Point>,
}

impl DetectionEvent {
    #[inline]
    pub fn new(payload: impl Into<String>, symbology: Symbology) -> Self {
        Self {
            payload: payload.into(),
            symbology,
            corners: Vec::new(),
        }
    }

    #[inline]
    pub fn with_corners(mut self, corners: impl IntoIterator<Item = Point>) -> Self {
        self.corners = corners.into_iter().collect();
        self
    }

    #[inline]
    pub fn with_quad(mut self, q: Quad) -> Self {
        self.corners = q.into();
        self
    }

    /// Есть ли полноценный четырёхугольник для оверлея.
    #[inline]
    pub fn has_quad(&self) -> bool {
        self.corners.len() == 4
    }
}
