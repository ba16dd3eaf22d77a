// src/api/static_files.rs
// Serves the dashboard's own HTML/JS/CSS from a directory.

use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path onto the static root. `/` is `index.html`.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, ServiceError> {
        let relative = request_path.trim_start_matches('/');
        let relative = if relative.is_empty() { "index.html" } else { relative };

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ServiceError::Forbidden)
                }
            }
        }
        Ok(resolved)
    }
}

pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

/// GET on any path no API route claimed.
pub async fn serve_static(
    req: HttpRequest,
    files: web::Data<StaticFiles>,
) -> Result<HttpResponse, ServiceError> {
    let path = files.resolve(req.match_info().query("tail"))?;
    let body = match tokio::fs::read(&path).await {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ServiceError::NotFound),
        Err(e) if e.kind() == ErrorKind::IsADirectory => return Err(ServiceError::NotFound),
        Err(e) => return Err(e.into()),
    };
    debug!("Serving {} ({} bytes)", path.display(), body.len());
    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&path))
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index_and_nested_paths() {
        let files = StaticFiles::new("public");
        assert_eq!(files.resolve("/").unwrap(), PathBuf::from("public/index.html"));
        assert_eq!(files.resolve("").unwrap(), PathBuf::from("public/index.html"));
        assert_eq!(
            files.resolve("/js/dashboard.js").unwrap(),
            PathBuf::from("public/js/dashboard.js")
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let files = StaticFiles::new("public");
        assert!(matches!(files.resolve("/../secret.txt"), Err(ServiceError::Forbidden)));
        assert!(matches!(files.resolve("js/../../etc/passwd"), Err(ServiceError::Forbidden)));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Path::new("app.JS")), "application/javascript");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("top.json")), "application/json");
        assert_eq!(content_type_for(Path::new("run.csv")), "text/csv");
        assert_eq!(content_type_for(Path::new("logo.png")), "application/octet-stream");
    }
}
