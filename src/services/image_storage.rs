//! Almacenamiento de imágenes de vehículos en el sistema de archivos
//!
//! Las imágenes llegan en base64 (opcionalmente como data URL), se validan
//! por extensión y firma, y se guardan bajo `upload_dir/cars/`. La ruta
//! relativa es la que se persiste en `cars.image_path`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

const CAR_IMAGES_DIR: &str = "cars";

#[derive(Debug, Clone)]
pub struct ImageStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStorage {
    pub fn new(root: PathBuf, max_bytes: usize) -> Self {
        Self { root, max_bytes }
    }

    /// Decodificar el contenido y comprobar tamaño y formato
    pub fn decode(&self, filename: &str, content_base64: &str) -> AppResult<(Vec<u8>, &'static str)> {
        let extension = allowed_extension(filename)?;

        let payload = match content_base64.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => content_base64,
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| AppError::BadRequest("La imagen no es base64 válido".to_string()))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("La imagen está vacía".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "La imagen supera el tamaño máximo de {} bytes",
                self.max_bytes
            )));
        }
        if !signature_matches(extension, &bytes) {
            return Err(AppError::BadRequest(
                "El contenido no corresponde al tipo de imagen".to_string(),
            ));
        }

        Ok((bytes, extension))
    }

    /// Guardar la imagen de un vehículo y devolver la ruta relativa
    pub async fn save_car_image(&self, car_id: Uuid, filename: &str, content_base64: &str) -> AppResult<String> {
        let (bytes, extension) = self.decode(filename, content_base64)?;

        let relative = format!("{}/{}-{}.{}", CAR_IMAGES_DIR, car_id, Uuid::new_v4().simple(), extension);
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        info!(car_id = %car_id, path = %relative, bytes = bytes.len(), "🖼️ Imagen guardada");
        Ok(relative)
    }

    /// Borrar una imagen previa; si ya no existe no es un error
    pub async fn remove(&self, relative: &str) -> AppResult<()> {
        let Some(path) = self.resolve(relative) else {
            warn!(path = %relative, "⚠️ Ruta de imagen fuera del directorio de uploads");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Si la operación que debía registrar la imagen falló, borrarla del disco
    pub async fn discard_on_error<T>(&self, relative: &str, result: AppResult<T>) -> AppResult<T> {
        if result.is_err() {
            if let Err(e) = self.remove(relative).await {
                warn!(path = %relative, error = %e, "⚠️ No se pudo borrar la imagen huérfana");
            }
        }
        result
    }

    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        safe.then(|| self.root.join(path))
    }
}

fn allowed_extension(filename: &str) -> AppResult<&'static str> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => Ok("jpg"),
        Some("png") => Ok("png"),
        Some("webp") => Ok("webp"),
        _ => Err(AppError::BadRequest(
            "Formato de imagen no soportado (jpg, png, webp)".to_string(),
        )),
    }
}

fn signature_matches(extension: &str, bytes: &[u8]) -> bool {
    match extension {
        "jpg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "png" => bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "webp" => bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        _ => false,
    }
}
