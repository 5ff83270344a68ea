use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod geometry;
mod mappings;
mod services;
mod utils;

use config::{Config, Overrides};
use services::{
    create_keystroke_backend, create_pointer_source, resolve_monitors, DetectorSettings,
    GestureDetector, ShortcutDispatcher, ShortcutScheme,
};

/// Очередь между хуком ОС и детектором; при переполнении события теряются
const EVENT_CHANNEL_CAPACITY: usize = 256;
const COMMAND_CHANNEL_CAPACITY: usize = 16;

#[derive(Parser, Debug)]
#[command(name = "scroll-desktops")]
#[command(about = "Переключение рабочих столов прокруткой колеса у верхнего края экрана")]
#[command(version)]
struct Args {
    /// Путь к файлу конфигурации (TOML или JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Режим сухого запуска (без реальных нажатий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long)]
    log_level: Option<String>,

    /// Схема сочетаний клавиш: auto, windows, macos
    #[arg(long)]
    platform: Option<String>,

    /// Воспроизвести трассу событий (JSON lines) вместо глобального хука
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Логировать каждую принятую прокрутку с координатами
    #[arg(short, long)]
    verbose: bool,

    /// Минимальный интервал между переключениями, секунды
    #[arg(long = "scroll_delay", value_name = "SECS")]
    scroll_delay: Option<f64>,

    /// Минимальный интервал между переключениями в одну сторону, секунды
    #[arg(long = "repeat_delay", value_name = "SECS")]
    repeat_delay: Option<f64>,

    /// Минимальный интервал между срабатываниями горячего угла, секунды
    #[arg(long = "hot_corner_delay", value_name = "SECS")]
    hot_corner_delay: Option<f64>,

    /// Высота полосы срабатывания у верхнего края, пиксели
    #[arg(long = "vertical_margin", value_name = "PX")]
    vertical_margin: Option<u32>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            scroll_delay: self.scroll_delay,
            repeat_delay: self.repeat_delay,
            hot_corner_delay: self.hot_corner_delay,
            vertical_margin: self.vertical_margin,
            platform: self.platform.clone(),
            log_level: self.log_level.clone(),
            verbose: self.verbose,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации (до логирования: уровень берётся из неё)
    let config = Config::load(args.config.as_deref(), &args.overrides())?;

    // Инициализация системы логирования
    init_tracing(&config.logging.level)?;

    info!("Запуск scroll-desktops v{}", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => info!("Конфигурация загружена из: {}", path.display()),
        None => info!("Конфигурация: значения по умолчанию и {}", config::DEFAULT_CONFIG_PATH),
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные нажатия отключены");
    }

    let scheme = ShortcutScheme::resolve(&config.platform)?;
    info!("Схема сочетаний клавиш: {}", scheme);

    if args.replay.is_none() {
        utils::permissions::check_permissions(scheme)?;
    }

    // Инициализация компонентов
    let monitors = resolve_monitors(&config)?;
    let settings = DetectorSettings::from_config(&config, monitors.hot_corner_anchor);
    let detector = GestureDetector::new(monitors.zones, settings);
    let dispatcher = Arc::new(ShortcutDispatcher::new(
        scheme,
        create_keystroke_backend(args.dry_run)?,
    ));
    let source = create_pointer_source(args.replay.as_deref())?;

    info!("Все компоненты инициализированы");

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);

    // Конвейер: источник → детектор → диспетчер
    let source_handle = tokio::spawn(source.run(event_tx));
    let detector_handle = tokio::spawn(detector.run(event_rx, command_tx));
    let mut dispatch_handle = tokio::spawn(dispatcher.run(command_rx));

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения или исчерпания источника
    let interrupted = tokio::select! {
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            true
        }
        _ = &mut dispatch_handle => {
            info!("Поток событий завершён");
            false
        }
    };

    info!("Завершение работы...");

    if interrupted {
        source_handle.abort();
        detector_handle.abort();
        dispatch_handle.abort();

        let shutdown_timeout = tokio::time::Duration::from_secs(5);
        let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
            let _ = source_handle.await;
            let _ = detector_handle.await;
            let _ = dispatch_handle.await;
        })
        .await;

        match shutdown_result {
            Ok(_) => info!("Все сервисы завершили работу корректно"),
            Err(_) => warn!("Таймаут при завершении сервисов"),
        }
    } else {
        let _ = detector_handle.await;
        match source_handle.await {
            Ok(Ok(())) => info!("Источник событий исчерпан"),
            Ok(Err(e)) => {
                error!("Ошибка в источнике событий: {}", e);
                return Err(e.into());
            }
            Err(e) => anyhow::bail!("Задача источника событий завершилась аварийно: {}", e),
        }
    }

    info!("scroll-desktops завершил работу");
    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
