use crate::error::DesktopError;
use crate::geometry::{MonitorGeometry, Rect};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Файл, который подхватывается без явного `--config`, если он существует
pub const DEFAULT_CONFIG_PATH: &str = "scroll-desktops.toml";

const ENV_PREFIX: &str = "SCROLL_DESKTOPS_";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    /// "auto", "windows" или "macos"
    pub platform: String,
    /// Логировать каждую принятую прокрутку с направлением и координатами
    pub print_position: bool,
    pub timing: TimingConfig,
    pub zones: ZoneConfig,
    pub hot_corner: HotCornerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub scroll_delay_ms: u64,
    /// Подавление повторов в том же направлении; `None` - выключено
    pub repeat_delay_ms: Option<u64>,
    pub timestamp_policy: TimestampPolicy,
}

/// Обновлять ли метку времени прокрутки, если событие прошло задержку,
/// но оказалось вне зон срабатывания
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    #[default]
    Always,
    InsideOnly,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ZoneConfig {
    pub vertical_margin: u32,
    /// Явная геометрия мониторов вместо опроса ОС
    pub monitors: Vec<MonitorGeometry>,
    /// Явная единственная зона срабатывания (ключи xMin/xMax/yMin/yMax)
    pub area: Option<Rect>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HotCornerConfig {
    pub enabled: bool,
    pub margin: u32,
    pub delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            platform: "auto".to_string(),
            print_position: false,
            timing: TimingConfig::default(),
            zones: ZoneConfig::default(),
            hot_corner: HotCornerConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            scroll_delay_ms: 300,
            repeat_delay_ms: None,
            timestamp_policy: TimestampPolicy::Always,
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            vertical_margin: 30,
            monitors: Vec::new(),
            area: None,
        }
    }
}

impl Default for HotCornerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            margin: 1,
            delay_ms: 500,
        }
    }
}

/// Плоские ключи старого JSON-формата. Читаются из того же figment
/// и накладываются поверх основной конфигурации.
#[derive(Debug, Default, Deserialize)]
struct LegacyKeys {
    #[serde(rename = "xMin")]
    x_min: Option<i32>,
    #[serde(rename = "xMax")]
    x_max: Option<i32>,
    #[serde(rename = "yMin")]
    y_min: Option<i32>,
    #[serde(rename = "yMax")]
    y_max: Option<i32>,
    /// Секунды
    scroll_delay: Option<f64>,
    #[serde(rename = "hotCorner")]
    hot_corner: Option<bool>,
    #[serde(rename = "printPosition")]
    print_position: Option<bool>,
}

/// Переопределения из командной строки (задержки в секундах)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub scroll_delay: Option<f64>,
    pub repeat_delay: Option<f64>,
    pub hot_corner_delay: Option<f64>,
    pub vertical_margin: Option<u32>,
    pub platform: Option<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
}

impl Config {
    /// Загрузка: файл (JSON или TOML по расширению) -> переменные окружения ->
    /// флаги командной строки. Проверка выполняется один раз, по итоговым значениям.
    /// Явно указанный, но отсутствующий файл - ошибка; файл по умолчанию необязателен.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let path: Option<PathBuf> = match config_path {
            Some(path) if !path.exists() => {
                return Err(DesktopError::ConfigMissing(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            }
        };

        let mut figment = Figment::new();
        if let Some(path) = &path {
            figment = if is_json(path) {
                figment.merge(Json::file(path))
            } else {
                figment.merge(Toml::file(path))
            };
        }
        let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let source = path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<по умолчанию>".to_string());

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {}", source))?;

        let legacy: LegacyKeys = figment
            .extract()
            .with_context(|| format!("Неверные ключи старого формата в {}", source))?;
        config.apply_legacy(legacy)?;
        config.apply_overrides(overrides)?;

        config.validate()?;
        Ok(config)
    }

    fn apply_legacy(&mut self, legacy: LegacyKeys) -> Result<()> {
        match (legacy.x_min, legacy.x_max, legacy.y_min, legacy.y_max) {
            (Some(x0), Some(x1), Some(y0), Some(y1)) => {
                self.zones.area = Some(Rect::new(x0, y0, x1, y1));
            }
            (None, None, None, None) => {}
            _ => anyhow::bail!("Ключи xMin, xMax, yMin и yMax задаются только вместе"),
        }

        if let Some(secs) = legacy.scroll_delay {
            self.timing.scroll_delay_ms = secs_to_ms("scroll_delay", secs)?;
        }
        if let Some(enabled) = legacy.hot_corner {
            self.hot_corner.enabled = enabled;
        }
        if let Some(print) = legacy.print_position {
            self.print_position = print;
        }
        Ok(())
    }

    /// Наложить флаги командной строки; проверка остаётся за вызывающим
    fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(secs) = overrides.scroll_delay {
            self.timing.scroll_delay_ms = secs_to_ms("--scroll_delay", secs)?;
        }
        if let Some(secs) = overrides.repeat_delay {
            self.timing.repeat_delay_ms = Some(secs_to_ms("--repeat_delay", secs)?);
        }
        if let Some(secs) = overrides.hot_corner_delay {
            self.hot_corner.delay_ms = secs_to_ms("--hot_corner_delay", secs)?;
        }
        if let Some(margin) = overrides.vertical_margin {
            self.zones.vertical_margin = margin;
        }
        if let Some(platform) = &overrides.platform {
            self.platform = platform.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.verbose {
            self.print_position = true;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.platform.as_str() {
            "auto" | "windows" | "macos" => {}
            _ => anyhow::bail!("Неверная платформа: {}", self.platform),
        }

        if self.zones.vertical_margin == 0 {
            anyhow::bail!("vertical_margin должно быть больше 0");
        }

        if self.hot_corner.margin == 0 {
            anyhow::bail!("hot_corner.margin должно быть больше 0");
        }

        if let Some(area) = &self.zones.area {
            if !area.is_valid() {
                anyhow::bail!("Вырожденная зона срабатывания: {}", area);
            }
        }

        for (i, monitor) in self.zones.monitors.iter().enumerate() {
            if monitor.width == 0 || monitor.height == 0 {
                anyhow::bail!("Монитор #{} имеет нулевой размер: {}", i + 1, monitor);
            }
        }

        Ok(())
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.timing.scroll_delay_ms)
    }

    pub fn repeat_delay(&self) -> Option<Duration> {
        self.timing.repeat_delay_ms.map(Duration::from_millis)
    }

    pub fn hot_corner_delay(&self) -> Duration {
        Duration::from_millis(self.hot_corner.delay_ms)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn secs_to_ms(name: &str, secs: f64) -> Result<u64> {
    if !secs.is_finite() || secs < 0.0 {
        anyhow::bail!("{} должно быть неотрицательным числом секунд, получено {}", name, secs);
    }
    Ok((secs * 1000.0).round() as u64)
}
