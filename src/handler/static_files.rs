//! Static file serving module
//!
//! Maps request paths beneath the root directory and builds the response for
//! files, directories and misses.

use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, response, ResponseBody};
use crate::logger;
use futures::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio_util::io::ReaderStream;

/// Files tried, in order, when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

const FILE_NOT_FOUND: &str = "File not found";

/// Read size for each chunk of a streamed file body
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Translate a URL path into a filesystem path beneath `root`
///
/// The path is percent-decoded and split on `/`. Empty, `.` and `..`
/// segments are dropped, as are segments that could change the meaning of
/// the join on this platform, so the result never leaves `root`.
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();

    decoded
        .split('/')
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .filter(|segment| !segment.contains(&['\\', '\0'][..]))
        .filter(|segment| !(cfg!(windows) && segment.contains(':')))
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Serve whatever `ctx.path` names beneath `root`
pub async fn serve(ctx: &RequestContext<'_>, root: &Path) -> Response<ResponseBody> {
    let fs_path = translate_path(root, ctx.path);

    // Any lookup failure means the path does not resolve to anything
    let Ok(metadata) = fs::metadata(&fs_path).await else {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    };

    if metadata.is_dir() {
        return serve_directory(ctx, &fs_path).await;
    }

    if ctx.path.ends_with('/') {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }

    serve_file(ctx, &fs_path).await
}

/// Redirect to the slash form, then try index files, then list
async fn serve_directory(ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&redirect_location(ctx.path, ctx.query));
    }

    for index_file in INDEX_FILES {
        let index_path = dir.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::render_directory(dir, ctx.path).await {
        Ok(page) => response::build_html_response(page, ctx.is_head),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}

/// Slash form of a directory path
///
/// Leading slashes are collapsed so `//host/` style paths never turn into a
/// scheme-relative `Location` pointing at another host.
pub fn redirect_location(path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

/// Serve a regular file, honouring `If-Modified-Since`
///
/// The body is streamed from disk in chunks; `HEAD` never reads the file.
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<ResponseBody> {
    let file = match fs::File::open(path).await {
        Ok(f) => f,
        Err(e) => return read_failure(ctx, path, &e),
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => return read_failure(ctx, path, &e),
    };

    let modified = metadata.modified().ok();
    if let Some(modified) = modified {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response();
        }
    }

    let body = if ctx.is_head {
        http::empty_body()
    } else {
        let stream = ReaderStream::with_capacity(file, STREAM_CHUNK_SIZE).map_ok(Frame::data);
        StreamBody::new(stream).boxed_unsync()
    };

    let last_modified = modified.map(cache::format_http_date);
    response::build_file_response(
        body,
        mime::content_type_for(path),
        metadata.len(),
        last_modified.as_deref(),
    )
}

fn read_failure(
    ctx: &RequestContext<'_>,
    path: &Path,
    err: &std::io::Error,
) -> Response<ResponseBody> {
    if err.kind() == ErrorKind::NotFound {
        return http::build_404_response(FILE_NOT_FOUND, ctx.is_head);
    }
    logger::log_error(&format!("Failed to read file '{}': {err}", path.display()));
    http::build_500_response(ctx.is_head)
}
