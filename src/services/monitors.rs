use crate::config::Config;
use crate::error::{DesktopError, Result};
use crate::events::Point;
use crate::geometry::{build_trigger_zones, reference_monitor, MonitorGeometry, MonitorSet};
use tracing::info;

/// Зоны срабатывания и якорь горячего угла, вычисленные один раз при запуске
#[derive(Debug, Clone)]
pub struct ResolvedMonitors {
    pub zones: MonitorSet,
    pub hot_corner_anchor: Point,
}

/// Приоритет: явная зона `zones.area` → `zones.monitors` → опрос ОС.
/// Пустой список мониторов - фатальная ошибка.
pub fn resolve_monitors(config: &Config) -> Result<ResolvedMonitors> {
    if let Some(area) = config.zones.area {
        info!("Используется явная зона срабатывания: {}", area);
        return Ok(ResolvedMonitors {
            zones: MonitorSet::new(vec![area])?,
            hot_corner_anchor: area.top_left(),
        });
    }

    let monitors = if config.zones.monitors.is_empty() {
        enumerate_monitors()?
    } else {
        info!("Геометрия мониторов взята из конфигурации");
        config.zones.monitors.clone()
    };

    from_geometry(&monitors, config.zones.vertical_margin)
}

pub fn from_geometry(monitors: &[MonitorGeometry], vertical_margin: u32) -> Result<ResolvedMonitors> {
    let reference = reference_monitor(monitors).ok_or(DesktopError::NoMonitors)?;

    for (i, monitor) in monitors.iter().enumerate() {
        info!("Монитор #{}: {}", i + 1, monitor);
    }

    let zones = MonitorSet::new(build_trigger_zones(monitors, vertical_margin))?;
    for zone in zones.zones() {
        info!("Зона срабатывания: {}", zone);
    }

    Ok(ResolvedMonitors {
        zones,
        hot_corner_anchor: reference.top_left(),
    })
}

#[cfg(feature = "native")]
fn enumerate_monitors() -> Result<Vec<MonitorGeometry>> {
    let displays = display_info::DisplayInfo::all().map_err(|e| {
        crate::desktop_error!(backend, "Не удалось получить список мониторов: {}", e)
    })?;

    Ok(displays
        .into_iter()
        .map(|d| MonitorGeometry::new(d.x, d.y, d.width, d.height).with_primary(d.is_primary))
        .collect())
}

#[cfg(not(feature = "native"))]
fn enumerate_monitors() -> Result<Vec<MonitorGeometry>> {
    Err(crate::desktop_error!(
        backend,
        "Сборка без feature \"native\": соберите с --features native или задайте zones.monitors / xMin, xMax, yMin, yMax"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_explicit_area_wins() {
        let mut config = Config::default();
        config.zones.area = Some(Rect::new(100, 50, 1820, 80));
        config.zones.monitors = vec![MonitorGeometry::new(0, 0, 1920, 1080)];

        let resolved = resolve_monitors(&config).unwrap();
        assert_eq!(resolved.zones.zones(), &[Rect::new(100, 50, 1820, 80)]);
        assert_eq!(resolved.hot_corner_anchor, Point::new(100, 50));
    }

    #[test]
    fn test_configured_monitors() {
        let mut config = Config::default();
        config.zones.vertical_margin = 25;
        config.zones.monitors = vec![
            MonitorGeometry::new(-1920, 0, 1920, 1080),
            MonitorGeometry::new(0, 0, 2560, 1440).with_primary(true),
        ];

        let resolved = resolve_monitors(&config).unwrap();
        assert_eq!(
            resolved.zones.zones(),
            &[Rect::new(-1920, 0, 0, 25), Rect::new(0, 0, 2560, 25)]
        );
        assert_eq!(resolved.hot_corner_anchor, Point::new(0, 0));
    }

    #[test]
    fn test_empty_geometry_fails_fast() {
        assert!(matches!(from_geometry(&[], 30), Err(DesktopError::NoMonitors)));
    }
}
