use crate::error::{DinoError, Result};
use crate::events::{KeyCode, KeyState, VirtualKeyEvent};
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

const EV_SYN: i32 = 0;
const EV_KEY: i32 = 1;

/// Виртуальная клавиатура uinput. В dry-run режиме события только журналируются.
pub struct VirtualDevice {
    device: Option<Mutex<uinput::Device>>,
    device_name: String,
    dry_run: bool,
    held_keys: Mutex<HashSet<KeyCode>>,
    journal: Mutex<Vec<VirtualKeyEvent>>,
}

impl VirtualDevice {
    pub fn new(device_name: &str, dry_run: bool) -> Result<Self> {
        info!("Инициализация VirtualDevice '{}' (dry_run: {})", device_name, dry_run);

        let device = if dry_run {
            None
        } else {
            Some(Mutex::new(Self::create_virtual_device(device_name)?))
        };

        Ok(Self {
            device,
            device_name: device_name.to_string(),
            dry_run,
            held_keys: Mutex::new(HashSet::new()),
            journal: Mutex::new(Vec::new()),
        })
    }

    fn create_virtual_device(device_name: &str) -> Result<uinput::Device> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let virtual_device = uinput::default()?
            .name(device_name)?
            .event(uinput::event::Keyboard::All)?
            .create()
            .map_err(|e| {
                DinoError::Internal(format!(
                    "Не удалось создать виртуальное устройство '{}': {}",
                    device_name, e
                ))
            })?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(virtual_device)
    }

    pub fn send_event(&self, event: VirtualKeyEvent) -> Result<()> {
        match event.state {
            KeyState::Pressed => self.held_keys.lock().insert(event.key_code),
            KeyState::Released => self.held_keys.lock().remove(&event.key_code),
        };

        if self.dry_run {
            info!("[DRY RUN] Виртуальное событие: {}", event);
            self.journal.lock().push(event);
            return Ok(());
        }

        crate::debug_if_enabled!("Обработка виртуального события: {:?}", event);

        let Some(device) = &self.device else {
            return Err(DinoError::Internal("Виртуальное устройство недоступно".to_string()));
        };

        let mut device = device.lock();
        let keycode = i32::from(event.key_code.value());

        // Отправляем событие клавиши
        if let Err(e) = device.write(EV_KEY, keycode, event.state.value()) {
            return Err(DinoError::Internal(format!(
                "Не удалось отправить событие клавиши {}: {}",
                event.key_code, e
            )));
        }

        // Синхронизируем события
        if let Err(e) = device.write(EV_SYN, 0, 0) {
            return Err(DinoError::Internal(format!(
                "Не удалось синхронизировать события: {}",
                e
            )));
        }

        crate::debug_if_enabled!("Виртуальное событие {} отправлено", event);
        Ok(())
    }

    pub fn press(&self, key_code: KeyCode) -> Result<()> {
        self.send_event(VirtualKeyEvent::press(key_code))
    }

    pub fn release(&self, key_code: KeyCode) -> Result<()> {
        self.send_event(VirtualKeyEvent::release(key_code))
    }

    /// Нажать и сразу отпустить клавишу
    pub fn tap(&self, key_code: KeyCode) -> Result<()> {
        self.press(key_code)?;
        self.release(key_code)
    }

    /// Отпустить все удерживаемые клавиши, чтобы ничего не "залипло" при выходе
    pub fn release_all_keys(&self) -> Result<()> {
        let held: Vec<KeyCode> = self.held_keys.lock().iter().copied().collect();
        if held.is_empty() {
            return Ok(());
        }

        info!("Отпускаем {} удерживаемых клавиш на '{}'", held.len(), self.device_name);
        for key_code in held {
            self.release(key_code)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn held_keys(&self) -> Vec<KeyCode> {
        self.held_keys.lock().iter().copied().collect()
    }

    /// События, "отправленные" в dry-run режиме
    pub fn journal(&self) -> Vec<VirtualKeyEvent> {
        self.journal.lock().clone()
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Drop for VirtualDevice {
    fn drop(&mut self) {
        if self.dry_run {
            return;
        }
        if !self.held_keys.get_mut().is_empty() {
            warn!("Виртуальное устройство закрывается с удерживаемыми клавишами");
        }
        debug!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_journals_events() {
        let device = VirtualDevice::new("test", true).unwrap();
        let space = KeyCode::new(57);

        device.tap(space).unwrap();

        let journal = device.journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0].state, KeyState::Pressed);
        assert_eq!(journal[1].state, KeyState::Released);
        assert!(device.held_keys().is_empty());
    }

    #[test]
    fn test_release_all_keys() {
        let device = VirtualDevice::new("test", true).unwrap();
        device.press(KeyCode::new(108)).unwrap();
        device.press(KeyCode::new(57)).unwrap();
        assert_eq!(device.held_keys().len(), 2);

        device.release_all_keys().unwrap();

        assert!(device.held_keys().is_empty());
        let released = device
            .journal()
            .iter()
            .filter(|e| e.state == KeyState::Released)
            .count();
        assert_eq!(released, 2);
    }
}
