use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Клавиши, которые можно назначить ролям jump, duck, reload и begin.
/// Первое имя в строке каноническое, остальные принимаются как синонимы.
const BINDABLE_KEYS: &[(u16, &[&str])] = &[
    (57, &["space"]),
    (28, &["enter", "return"]),
    (1, &["escape", "esc"]),
    (103, &["up", "arrowup"]),
    (108, &["down", "arrowdown"]),
    (105, &["left", "arrowleft"]),
    (106, &["right", "arrowright"]),
    // WASD-раскладка для тех, кто прыгает на W и пригибается на S
    (17, &["w"]),
    (31, &["s"]),
    // F5 перезагружает вкладку с игрой
    (59, &["f1"]),
    (60, &["f2"]),
    (61, &["f3"]),
    (62, &["f4"]),
    (63, &["f5"]),
    (64, &["f6"]),
    (65, &["f7"]),
    (66, &["f8"]),
    (67, &["f9"]),
    (68, &["f10"]),
    (87, &["f11"]),
    (88, &["f12"]),
];

static NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    BINDABLE_KEYS
        .iter()
        .flat_map(|&(code, names)| names.iter().map(move |&name| (name, code)))
        .collect()
});

static CODE_TO_NAME: Lazy<HashMap<u16, &'static str>> = Lazy::new(|| {
    BINDABLE_KEYS
        .iter()
        .filter_map(|&(code, names)| names.first().map(|&name| (code, name)))
        .collect()
});

/// Имена клавиш конфигурации и коды evdev
pub struct KeycodeMap;

impl KeycodeMap {
    /// Код клавиши по имени, без учёта регистра
    pub fn get_keycode(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.trim().to_lowercase();
        NAME_TO_CODE.get(normalized.as_str()).copied().ok_or_else(|| {
            format!(
                "неизвестная клавиша '{}' (доступны: {})",
                key_name,
                Self::canonical_names().join(", ")
            )
        })
    }

    /// Каноническое имя клавиши по коду
    pub fn get_key_name(keycode: u16) -> Option<&'static str> {
        CODE_TO_NAME.get(&keycode).copied()
    }

    /// Канонические имена в порядке таблицы
    pub fn canonical_names() -> Vec<&'static str> {
        BINDABLE_KEYS
            .iter()
            .filter_map(|(_, names)| names.first().copied())
            .collect()
    }
}
