use thiserror::Error;

use crate::vision::CaptureRegion;

#[derive(Error, Debug)]
pub enum DinoError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Ошибка захвата экрана: {0}")]
    Capture(String),

    #[error("Ошибка обработки изображения: {0}")]
    Image(#[from] image::ImageError),

    #[error("Область {region} не помещается в кадр {width}x{height}")]
    RegionOutOfBounds {
        region: CaptureRegion,
        width: u32,
        height: u32,
    },

    #[error("Неизвестная клавиша: {0}")]
    InvalidKey(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Неподдерживаемая платформа: {0}")]
    Unsupported(String),

    #[error("Экран недоступен: {0}")]
    ScreenUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl DinoError {
    pub fn screen_unavailable<T>(msg: impl Into<String>) -> Result<T> {
        Err(DinoError::ScreenUnavailable(msg.into()))
    }
}

impl From<xcap::XCapError> for DinoError {
    fn from(e: xcap::XCapError) -> Self {
        DinoError::Capture(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DinoError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! dino_error {
    (invalid_key, $($arg:tt)*) => {
        $crate::error::DinoError::InvalidKey(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::DinoError::Permission(format!($($arg)*))
    };
    (screen_unavailable, $($arg:tt)*) => {
        $crate::error::DinoError::ScreenUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::DinoError::Internal(format!($($arg)*))
    };
}
