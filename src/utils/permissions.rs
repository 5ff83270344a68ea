use crate::error::{DesktopError, Result};
use crate::services::ShortcutScheme;
use tracing::{info, warn};

/// Проверить окружение перед установкой глобального хука мыши
pub fn check_permissions(scheme: ShortcutScheme) -> Result<()> {
    info!("Проверка окружения для глобального хука...");

    match std::env::consts::OS {
        "linux" => {
            let checked = check_display_server(
                std::env::var("DISPLAY").ok().as_deref(),
                std::env::var("WAYLAND_DISPLAY").ok().as_deref(),
            );
            if checked.is_err() {
                for hint in get_setup_hints() {
                    warn!("   {}", hint);
                }
            }
            checked?;
        }
        "macos" => {
            info!("macOS требует разрешение «Универсальный доступ» для перехвата мыши");
            info!("Системные настройки → Конфиденциальность и безопасность → Универсальный доступ");
        }
        _ => {}
    }

    if ShortcutScheme::detect().ok() != Some(scheme) {
        warn!(
            "Схема сочетаний {} не совпадает с ОС {}: сочетания могут не сработать",
            scheme,
            std::env::consts::OS
        );
    }

    info!("Проверка окружения завершена успешно");
    Ok(())
}

/// Глобальный хук на Linux работает только через X11
fn check_display_server(display: Option<&str>, wayland_display: Option<&str>) -> Result<()> {
    if display.map_or(true, str::is_empty) {
        return Err(DesktopError::Backend(
            "Переменная DISPLAY не задана: глобальный хук требует X11 (или XWayland)".to_string(),
        ));
    }

    if wayland_display.is_some_and(|d| !d.is_empty()) {
        warn!("⚠️  Обнаружен Wayland: события мыши будут видны только над окнами XWayland");
    }

    Ok(())
}

/// Получить рекомендуемые шаги для выдачи прав
pub fn get_setup_hints() -> Vec<String> {
    vec![
        "# Linux: запускайте в X11-сессии (Wayland не отдаёт глобальные события)".to_string(),
        "echo $XDG_SESSION_TYPE".to_string(),
        "".to_string(),
        "# macOS: выдайте терминалу разрешение «Универсальный доступ»".to_string(),
        "open 'x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility'"
            .to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_server_requires_x11() {
        assert!(check_display_server(None, None).is_err());
        assert!(check_display_server(Some(""), Some("wayland-0")).is_err());
        assert!(check_display_server(Some(":0"), None).is_ok());
        assert!(check_display_server(Some(":0"), Some("wayland-0")).is_ok());
    }

    #[test]
    fn test_setup_hints() {
        let hints = get_setup_hints();
        assert!(hints.iter().any(|h| h.contains("XDG_SESSION_TYPE")));
        assert!(hints.iter().any(|h| h.contains("Privacy_Accessibility")));
    }
}
