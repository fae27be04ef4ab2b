//! Minimal static file server for the theme pages.
//!
//! Serves files from one root directory over HTTP/1.1 (GET and HEAD only),
//! maps `/` to `index.html`, and closes the connection after each response.

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

const INDEX_FILE: &str = "index.html";
/// Upper bound on header lines read per request
const MAX_HEADER_LINES: usize = 100;
/// Longest request line or single header line accepted
const MAX_LINE_BYTES: usize = 8 * 1024;
/// Total header bytes accepted per request
const MAX_HEADER_BYTES: usize = 32 * 1024;
/// Unread input consumed after a rejection so the close is clean
const MAX_DRAIN_BYTES: u64 = 1024 * 1024;
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct StaticServer {
    listener: TcpListener,
    root: PathBuf,
}

impl StaticServer {
    pub async fn bind(root: impl Into<PathBuf>, addr: SocketAddr) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        Ok(Self {
            listener,
            root: root.into(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is cancelled
    pub async fn serve(self) -> Result<()> {
        let addr = self.local_addr()?;
        info!("Server running at http://localhost:{}", addr.port());

        loop {
            match self.listener.accept().await {
                Ok((socket, peer_addr)) => {
                    let root = self.root.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(socket, &root).await {
                            warn!(peer_addr = %peer_addr, "Connection error: {:#}", e);
                        }
                    });
                }
                Err(e) => warn!("Failed to accept connection: {}", e),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Forbidden,
}

/// Map a request target onto a file under `root`
pub fn resolve_path(root: &Path, target: &str) -> Resolved {
    let path = target.split(['?', '#']).next().unwrap_or("/");
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut resolved = root.to_path_buf();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Resolved::Forbidden
            }
        }
    }

    if decoded.ends_with('/') || resolved == root || resolved.is_dir() {
        resolved.push(INDEX_FILE);
    }
    Resolved::File(resolved)
}

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("ttf") => "font/ttf",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

enum LineRead {
    Line(String),
    TooLong,
    Eof,
}

/// Read one line of at most `limit` bytes without buffering past it
async fn read_bounded_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    limit: usize,
) -> Result<LineRead> {
    let mut line = String::new();
    let n = (&mut *reader)
        .take(limit as u64)
        .read_line(&mut line)
        .await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if n >= limit && !line.ends_with('\n') {
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line(line))
}

async fn handle_connection(stream: TcpStream, root: &Path) -> Result<()> {
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    let request_line = match read_bounded_line(&mut reader, MAX_LINE_BYTES).await? {
        LineRead::Line(line) => line,
        LineRead::Eof => return Ok(()),
        LineRead::TooLong => {
            debug!("Request line over {} bytes", MAX_LINE_BYTES);
            write_response(
                &mut writer,
                414,
                "URI Too Long",
                "text/plain",
                b"URI Too Long",
                false,
            )
            .await?;
            return drain(&mut reader).await;
        }
    };

    // Drain headers; nothing in them changes the response
    let mut header_bytes = 0;
    let mut header_lines = 0;
    loop {
        let header = match read_bounded_line(&mut reader, MAX_LINE_BYTES).await? {
            LineRead::Line(header) => header,
            LineRead::Eof => break,
            LineRead::TooLong => return reject_headers(&mut reader, &mut writer).await,
        };
        if header == "\r\n" || header == "\n" {
            break;
        }
        header_bytes += header.len();
        header_lines += 1;
        if header_bytes > MAX_HEADER_BYTES || header_lines > MAX_HEADER_LINES {
            return reject_headers(&mut reader, &mut writer).await;
        }
    }

    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("/");
    debug!("{} {}", method, target);

    let head_only = method == "HEAD";
    if method != "GET" && !head_only {
        return write_response(
            &mut writer,
            405,
            "Method Not Allowed",
            "text/plain",
            b"Method Not Allowed",
            false,
        )
        .await;
    }

    match resolve_path(root, target) {
        Resolved::Forbidden => {
            write_response(&mut writer, 403, "Forbidden", "text/plain", b"Forbidden", head_only).await
        }
        Resolved::File(path) => match tokio::fs::read(&path).await {
            Ok(body) => {
                write_response(&mut writer, 200, "OK", content_type(&path), &body, head_only).await
            }
            Err(e) => {
                debug!("Not found {:?}: {}", path, e);
                write_response(&mut writer, 404, "Not Found", "text/plain", b"Not Found", head_only)
                    .await
            }
        },
    }
}

async fn reject_headers<R, W>(reader: &mut R, writer: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    debug!("Request headers too large");
    write_response(
        writer,
        431,
        "Request Header Fields Too Large",
        "text/plain",
        b"Request Header Fields Too Large",
        false,
    )
    .await?;
    drain(reader).await
}

/// Swallow what the client already sent, bounded in size and time
async fn drain<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<()> {
    let mut rest = (&mut *reader).take(MAX_DRAIN_BYTES);
    let mut sink = tokio::io::sink();
    let _ = tokio::time::timeout(DRAIN_TIMEOUT, tokio::io::copy(&mut rest, &mut sink)).await;
    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: u16,
    reason: &str,
    content_type: &str,
    body: &[u8],
    head_only: bool,
) -> Result<()> {
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        content_type,
        body.len()
    );
    writer.write_all(header.as_bytes()).await?;
    if !head_only {
        writer.write_all(body).await?;
    }
    writer.flush().await?;
    Ok(())
}
