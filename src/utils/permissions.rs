use crate::error::{DinoError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use tracing::{info, warn};

/// ОС, на которой есть uinput
const SUPPORTED_OS: &str = "linux";

/// Остановиться сразу, если ОС не Linux: без uinput прыгать нечем
pub fn ensure_supported_platform() -> Result<()> {
    check_platform(std::env::consts::OS)
}

fn check_platform(os: &str) -> Result<()> {
    if os != SUPPORTED_OS {
        return Err(DinoError::Unsupported(format!(
            "{} (нужен {} с /dev/uinput)",
            os, SUPPORTED_OS
        )));
    }
    Ok(())
}

/// Проверить доступ к uinput и к графической сессии
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    // Проверка доступа к /dev/uinput
    check_uinput_access()?;

    // Захват экрана требует живой X11/Wayland сессии
    check_display_session()?;

    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_uinput_access() -> Result<()> {
    let uinput_device = "/dev/uinput";

    if !std::path::Path::new(uinput_device).exists() {
        return Err(DinoError::Permission(format!(
            "{} не существует, модуль uinput не загружен",
            uinput_device
        )));
    }

    match fs::metadata(uinput_device) {
        Ok(metadata) => {
            let mode = metadata.permissions().mode();

            // Обычно 660 или 666
            if mode & 0o006 == 0 && mode & 0o060 == 0 {
                return Err(DinoError::Permission(format!(
                    "Нет прав доступа к {}. Добавьте пользователя в группу 'uinput' или 'input'",
                    uinput_device
                )));
            }

            info!("Доступ к {} подтвержден", uinput_device);
            Ok(())
        }
        Err(e) => Err(DinoError::Permission(format!(
            "Не удалось проверить права доступа к {}: {}",
            uinput_device, e
        ))),
    }
}

fn check_display_session() -> Result<()> {
    let x11 = std::env::var_os("DISPLAY").is_some();
    let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();

    match (x11, wayland) {
        (false, false) => DinoError::screen_unavailable(
            "не заданы DISPLAY и WAYLAND_DISPLAY, захват экрана невозможен",
        ),
        (false, true) => {
            warn!(
                "Сессия Wayland: захват экрана пойдёт через портал и может запросить подтверждение"
            );
            Ok(())
        }
        _ => {
            info!("Графическая сессия обнаружена");
            Ok(())
        }
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Рекомендуется добавить пользователя в группу 'input'");
            warn!("   и запускать приложение от имени обычного пользователя");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Получить рекомендуемые команды для настройки прав доступа
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "".to_string(),
        "# Разрешить группе input писать в /dev/uinput:".to_string(),
        "echo 'KERNEL==\"uinput\", GROUP=\"input\", MODE=\"0660\"' | sudo tee /etc/udev/rules.d/99-uinput.rules".to_string(),
        "sudo usermod -a -G input $USER".to_string(),
        "".to_string(),
        "# После выполнения команд перезайдите в систему".to_string(),
    ]
}
