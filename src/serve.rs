//! Static preview server for a rendered HTML report.

use crate::error::{GitanalError, Result};
use crate::render::html::INDEX_FILE;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Response, Server};

pub const DEFAULT_PORT: u16 = 5555;

/// Map a request URL onto a file below `root`, refusing anything that escapes it.
pub fn resolve_request_path(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_start_matches('/');
    let path = if path.is_empty() { INDEX_FILE } else { path };

    let mut resolved = root.to_path_buf();
    for component in Path::new(path).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(resolved)
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Serve `root` on `port` until the process is interrupted.
pub fn serve_directory(root: &Path, port: u16) -> Result<()> {
    let server = Server::http(("0.0.0.0", port)).map_err(|e| GitanalError::Serve(e.to_string()))?;
    println!(
        "{} http://0.0.0.0:{}/",
        console::style("Serving report at").bold(),
        port
    );

    for request in server.incoming_requests() {
        let target = resolve_request_path(root, request.url()).filter(|p| p.is_file());
        tracing::debug!("{} {}", request.method(), request.url());

        let result = match target.and_then(|p| File::open(&p).ok().map(|f| (p, f))) {
            Some((path, file)) => {
                let mut response = Response::from_file(file);
                if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type(&path).as_bytes()) {
                    response = response.with_header(header);
                }
                request.respond(response)
            }
            None => request.respond(Response::from_string("Not Found").with_status_code(404)),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to answer request: {}", e);
        }
    }

    Ok(())
}
