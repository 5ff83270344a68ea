//! Геометрия: мониторы, зоны срабатывания и горячий угол.
//!
//! Все прямоугольники здесь задаются углами `(x0, y0)`-`(x1, y1)` и
//! включают все четыре границы.

use crate::error::{DesktopError, Result};
use crate::events::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Геометрия монитора в координатах рабочего стола
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub primary: bool,
}

impl MonitorGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            primary: false,
        }
    }

    #[cfg(any(test, feature = "native"))]
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl fmt::Display for MonitorGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)?;
        if self.primary {
            write!(f, " (primary)")?;
        }
        Ok(())
    }
}

/// Прямоугольник с включительными границами
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// Прямоугольник невырожден, если `x1 > x0` и `y1 > y0`
    pub fn is_valid(&self) -> bool {
        self.x1 > self.x0 && self.y1 > self.y0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]x[{}..{}]", self.x0, self.x1, self.y0, self.y1)
    }
}

fn extend(origin: i32, length: u32) -> i32 {
    origin.saturating_add(i32::try_from(length).unwrap_or(i32::MAX))
}

/// Строит по одной зоне на монитор: вся ширина монитора и `vertical_margin`
/// пикселей от его верхнего края.
pub fn build_trigger_zones(monitors: &[MonitorGeometry], vertical_margin: u32) -> Vec<Rect> {
    monitors
        .iter()
        .map(|m| Rect::new(m.x, m.y, extend(m.x, m.width), extend(m.y, vertical_margin)))
        .collect()
}

pub fn point_in_any_rectangle(point: Point, rectangles: &[Rect]) -> bool {
    rectangles.iter().any(|r| r.contains(point))
}

/// Квадрат горячего угла `[ax, ax+margin] x [ay, ay+margin]`
pub fn hot_corner_region(anchor: Point, margin: u32) -> Rect {
    Rect::new(anchor.x, anchor.y, extend(anchor.x, margin), extend(anchor.y, margin))
}

/// Опорный монитор для горячего угла: основной, иначе первый
pub fn reference_monitor(monitors: &[MonitorGeometry]) -> Option<&MonitorGeometry> {
    monitors.iter().find(|m| m.primary).or_else(|| monitors.first())
}

/// Неизменяемый непустой набор зон срабатывания.
/// Клонирование дешёвое, набор можно свободно делить между потоками.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSet {
    zones: Arc<[Rect]>,
}

impl MonitorSet {
    pub fn new(zones: Vec<Rect>) -> Result<Self> {
        if zones.is_empty() {
            return Err(DesktopError::NoMonitors);
        }
        if let Some(bad) = zones.iter().find(|zone| !zone.is_valid()) {
            return Err(DesktopError::Config(anyhow::anyhow!(
                "Вырожденная зона срабатывания: {}",
                bad
            )));
        }
        Ok(Self { zones: zones.into() })
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_any_rectangle(point, &self.zones)
    }

    pub fn zones(&self) -> &[Rect] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }
}
