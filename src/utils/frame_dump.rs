use crate::error::Result;
use crate::vision::{signal, SignalMethod};
use image::GrayImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Сохраняет каждый N-й кадр в PNG для подбора области и порога
pub struct FrameDumper {
    dir: PathBuf,
    every: u64,
    method: SignalMethod,
}

impl FrameDumper {
    pub fn new(dir: &Path, every: u64, method: SignalMethod) -> Result<Self> {
        fs::create_dir_all(dir)?;
        info!("Отладочные кадры сохраняются в {:?} (каждый {}-й)", dir, every);

        Ok(Self {
            dir: dir.to_path_buf(),
            every: every.max(1),
            method,
        })
    }

    /// Вернуть пути сохранённых файлов; пусто, если кадр пропущен
    pub fn maybe_dump(&self, index: u64, gray: &GrayImage) -> Result<Vec<PathBuf>> {
        if index % self.every != 0 {
            return Ok(Vec::new());
        }

        let mut saved = Vec::with_capacity(2);

        let gray_path = self.dir.join(format!("frame_{:06}_gray.png", index));
        gray.save(&gray_path)?;
        saved.push(gray_path);

        if self.method == SignalMethod::Laplacian {
            let edges_path = self.dir.join(format!("frame_{:06}_edges.png", index));
            signal::edge_map(gray).save(&edges_path)?;
            saved.push(edges_path);
        }

        crate::trace_if_enabled!("Кадр #{} сохранён: {:?}", index, saved);
        Ok(saved)
    }
}
