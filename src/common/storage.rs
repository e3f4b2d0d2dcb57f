// src/common/storage.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::error::AppError;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
pub const PHOTO_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Subpastas de `/uploads` servidas publicamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadArea {
    Comprovantes,
    Vistorias,
}

impl UploadArea {
    pub fn dir_name(self) -> &'static str {
        match self {
            UploadArea::Comprovantes => "comprovantes",
            UploadArea::Vistorias => "vistorias",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    // Caminho público, ex: /uploads/vistorias/<uuid>.jpg
    pub public_path: String,
}

/// Extensão em minúsculas, com o ponto (".jpg"), ou vazia quando não há.
pub fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Regras de foto de vistoria: arquivo presente, até 5 MB e extensão de imagem.
/// Devolve a extensão normalizada a ser usada no nome gerado.
pub fn validate_photo(file_name: Option<&str>, size: usize) -> Result<String, AppError> {
    if size == 0 {
        return Err(AppError::MissingFile);
    }
    if size > MAX_PHOTO_BYTES {
        return Err(AppError::FileTooLarge);
    }

    let extension = file_extension(file_name.unwrap_or_default());
    if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::FileTypeNotAllowed);
    }

    Ok(extension)
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Grava o conteúdo com um nome aleatório e devolve o caminho público.
    async fn save(&self, area: UploadArea, extension: &str, bytes: &[u8]) -> Result<StoredFile, AppError>;

    /// Remove um arquivo previamente gravado (usado quando o registro no banco falha).
    async fn remove(&self, stored: &StoredFile) -> Result<(), AppError>;
}

/// Armazenamento em disco sob `{web_root}/uploads/{area}`.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    web_root: PathBuf,
}

impl LocalFileStore {
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.web_root.join("uploads")
    }

    fn path_for(&self, area: UploadArea, file_name: &str) -> PathBuf {
        self.uploads_dir().join(area.dir_name()).join(file_name)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, area: UploadArea, extension: &str, bytes: &[u8]) -> Result<StoredFile, AppError> {
        let folder = self.uploads_dir().join(area.dir_name());
        tokio::fs::create_dir_all(&folder).await?;

        let file_name = format!("{}{}", Uuid::new_v4(), extension);
        let path = folder.join(&file_name);

        tracing::debug!(path = %path.display(), size = bytes.len(), "Gravando upload");
        tokio::fs::write(&path, bytes).await?;

        Ok(StoredFile {
            public_path: format!("/uploads/{}/{}", area.dir_name(), file_name),
            file_name,
        })
    }

    async fn remove(&self, stored: &StoredFile) -> Result<(), AppError> {
        let area = if stored.public_path.starts_with("/uploads/comprovantes/") {
            UploadArea::Comprovantes
        } else {
            UploadArea::Vistorias
        };
        let path = self.path_for(area, &stored.file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(file_extension("FOTO.JPG"), ".jpg");
        assert_eq!(file_extension("sala.final.webp"), ".webp");
        assert_eq!(file_extension("sem_extensao"), "");
    }

    #[test]
    fn six_megabyte_photo_is_rejected_for_size() {
        let result = validate_photo(Some("sala.jpg"), 6 * 1024 * 1024);
        assert!(matches!(result, Err(AppError::FileTooLarge)));
    }

    #[test]
    fn bitmap_is_rejected_for_type() {
        let result = validate_photo(Some("sala.bmp"), 1024);
        assert!(matches!(result, Err(AppError::FileTypeNotAllowed)));
    }

    #[test]
    fn empty_upload_is_reported_as_missing() {
        assert!(matches!(validate_photo(Some("sala.jpg"), 0), Err(AppError::MissingFile)));
    }

    #[test]
    fn exactly_five_megabytes_is_accepted() {
        let ext = validate_photo(Some("Cozinha.PNG"), MAX_PHOTO_BYTES).unwrap();
        assert_eq!(ext, ".png");
    }

    #[tokio::test]
    async fn local_store_writes_under_uploads_and_removes() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(root.path());

        let stored = store.save(UploadArea::Vistorias, ".jpg", b"jpeg-bytes").await.unwrap();

        assert!(stored.public_path.starts_with("/uploads/vistorias/"));
        assert!(stored.file_name.ends_with(".jpg"));
        let on_disk = root.path().join("uploads/vistorias").join(&stored.file_name);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"jpeg-bytes");

        store.remove(&stored).await.unwrap();
        assert!(!on_disk.exists());
    }
}
