//! 上传文件读取
//!
//! 只接受单个文件名，路径部分一律丢弃。

use crate::{error::AppError, middleware::AppState};
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::{path::Path as FsPath, sync::Arc};

/// 按扩展名猜测 Content-Type
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = FsPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// 取文件名的最后一段；空名和隐藏文件返回 None
pub fn sanitize_filename(raw: &str) -> Option<&str> {
    let name = raw.rsplit(['/', '\\']).next()?;
    if name.is_empty() || name.starts_with('.') {
        return None;
    }
    Some(name)
}

pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let name = sanitize_filename(&filename).ok_or_else(|| AppError::not_found("File"))?;
    let path = FsPath::new(&state.config.uploads.dir).join(name);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found("File"));
        }
        Err(e) => {
            return Err(AppError::internal(format!(
                "Failed to read upload {}: {}",
                path.display(),
                e
            )));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(name)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_directories() {
        assert_eq!(sanitize_filename("logo.png"), Some("logo.png"));
        assert_eq!(sanitize_filename("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitize_filename("..\\secret.txt"), Some("secret.txt"));
        assert_eq!(sanitize_filename("a/"), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename(".env"), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("menu.JPG"), "image/jpeg");
        assert_eq!(content_type_for("logo.webp"), "image/webp");
        assert_eq!(content_type_for("favicon.ico"), "image/x-icon");
        assert_eq!(content_type_for("menu.pdf"), "application/pdf");
        assert_eq!(content_type_for("photo.avif"), "application/octet-stream");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }
}
