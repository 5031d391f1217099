use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;
mod vision;

use config::Config;
use error::DinoError;
use services::{create_screen_capture, Jumper, ObstacleWatcher, Starter};

#[derive(Parser, Debug)]
#[command(name = "auto-dino")]
#[command(about = "Прыгает через препятствия в браузерной игре, следя за областью экрана")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "auto-dino.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция экрана, клавиши только в лог)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,

    /// Не выполнять обратный отсчёт и перезагрузку страницы
    #[arg(long)]
    skip_start: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(level) = &args.log_level {
        config.override_log_level(level)?;
    }

    // Инициализация системы логирования
    init_tracing(&config.logging.level, &config.logging.format)?;

    info!("Запуск auto-dino v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    utils::permissions::ensure_supported_platform()?;

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else if let Err(e) = utils::permissions::check_permissions() {
        if matches!(e, DinoError::Permission(_)) {
            for line in utils::permissions::get_setup_commands() {
                warn!("{}", line);
            }
        }
        return Err(e.into());
    }

    // Инициализация компонентов (одна виртуальная клавиатура на все сервисы)
    let keyboard = Arc::new(services::VirtualDevice::new(
        "auto-dino Virtual Keyboard",
        args.dry_run,
    )?);
    let starter = Starter::new(keyboard.clone(), &config.keys, &config.timing)?;
    let jumper = Jumper::new(keyboard.clone(), &config.keys, &config.timing)?;
    let capture = create_screen_capture(&config, args.dry_run)?;
    let mut watcher = ObstacleWatcher::new(&config, capture, jumper)?;

    info!("Все компоненты инициализированы");

    let session = async {
        if !args.skip_start {
            starter.run().await?;
        }
        watcher.run().await
    };

    // Цикл работает до ошибки или до Ctrl+C
    let outcome = tokio::select! {
        result = session => result,
        signal_result = signal::ctrl_c() => {
            match signal_result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            Ok(())
        }
    };

    info!("Завершение работы...");

    // Гарантируем отсутствие залипших клавиш
    if let Err(e) = keyboard.release_all_keys() {
        warn!("Не удалось выполнить release_all_keys: {}", e);
    }

    info!("Итого: {}", watcher.stats());
    if keyboard.is_dry_run() {
        info!("[DRY RUN] Журнал клавиатуры: {} событий", keyboard.journal().len());
    }

    if let Err(e) = &outcome {
        error!("Цикл остановлен с ошибкой: {}", e);
    }

    info!("auto-dino завершил работу");
    outcome.map_err(Into::into)
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
