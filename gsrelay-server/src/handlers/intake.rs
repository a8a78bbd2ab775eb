//! HTTP intake: turn a POST into a conversion job on the convert queue.

use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Extension, RawQuery};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use gsrelay_pipeline::device_extension;
use gsrelay_queue::Job;

use crate::error::IntakeError;
use crate::state::AppState;

/// Control parameters extracted from the query string.
///
/// Keys are matched case-insensitively. `print`, `sDEVICE` and `sOutputFile`
/// are consumed; every other pair passes through to the engine argv in query
/// order, `k=v` as `-k=v` and a bare `k` as `-k`.
#[derive(Debug, Default)]
struct IntakeParams {
    device: Option<String>,
    base_name: Option<String>,
    printers: Vec<String>,
    gs_args: Vec<String>,
}

fn parse_query(query: &str) -> IntakeParams {
    let mut params = IntakeParams::default();
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        if k.eq_ignore_ascii_case("print") {
            params.printers.extend(parse_printer_list(&v));
        } else if k.eq_ignore_ascii_case("sDEVICE") {
            params.device = Some(v.into_owned());
        } else if k.eq_ignore_ascii_case("sOutputFile") {
            params.base_name = Some(v.into_owned());
        } else if v.is_empty() {
            params.gs_args.push(format!("-{k}"));
        } else {
            params.gs_args.push(format!("-{k}={v}"));
        }
    }
    params
}

/// Split a printer list on `,` and `;`, trimming whitespace and dropping
/// empty tokens.
fn parse_printer_list(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reduce the client-supplied output name to a bare file stem: directory
/// components are stripped and any extension is discarded.
fn sanitize_base_name(raw: &str) -> Option<String> {
    let name = Path::new(raw).file_name()?;
    let stem = Path::new(name).file_stem()?;
    let stem = stem.to_string_lossy();
    if stem.is_empty() {
        None
    } else {
        Some(stem.into_owned())
    }
}

/// The single intake endpoint. The path is not inspected; the query string
/// carries the control parameters and the body is the raw PDF.
///
/// The body is buffered before any validation, so every error response
/// follows a fully drained request and the connection stays reusable.
pub async fn submit(
    Extension(state): Extension<Arc<AppState>>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, IntakeError> {
    if method != Method::POST {
        return Err(IntakeError::MethodNotAllowed);
    }

    let params = parse_query(query.as_deref().unwrap_or(""));

    let device = params
        .device
        .filter(|d| !d.is_empty())
        .ok_or(IntakeError::MissingDevice)?;
    let base_name = params
        .base_name
        .as_deref()
        .and_then(sanitize_base_name)
        .ok_or(IntakeError::MissingFileName)?;
    let ext = device_extension(&device).ok_or(IntakeError::UnsupportedDevice)?;

    if body.is_empty() {
        return Err(IntakeError::MissingBody);
    }

    let input_path = state.files_dir.join(format!("{base_name}.pdf"));
    let output_path = state.files_dir.join(format!("{base_name}.{ext}"));

    let mut gs_args = params.gs_args;
    gs_args.push(format!("-sDEVICE={device}"));
    gs_args.push(format!("-sOutputFile={}", output_path.display()));
    gs_args.push(input_path.display().to_string());

    tokio::fs::create_dir_all(&state.files_dir).await?;
    tokio::fs::write(&input_path, &body).await?;

    let job = Job::new(
        input_path.clone(),
        output_path,
        ext.to_uppercase(),
        gs_args,
        params.printers,
    );
    let job_id = job.job_id;
    let printer_count = job.printers.len();

    if let Err(e) = state.convert_queue.try_enqueue(job).await {
        warn!(%job_id, size = body.len(), "convert queue full, rejecting request");
        // best effort: don't leave the uploaded body behind for a job that
        // was never enqueued
        let _ = tokio::fs::remove_file(&input_path).await;
        return Err(e.into());
    }

    info!(
        service = %state.service_name,
        %job_id,
        input = %input_path.display(),
        printers = printer_count,
        size = body.len(),
        "job enqueued"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        format!("OK enqueued {printer_count} job(s)\n"),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printer_list_drops_empty_tokens_and_trims() {
        assert_eq!(
            parse_printer_list("a:1,b:2;;c:3"),
            vec!["a:1", "b:2", "c:3"]
        );
        assert_eq!(parse_printer_list(" 10.0.0.5:9100 , "), vec!["10.0.0.5:9100"]);
        assert!(parse_printer_list("").is_empty());
        assert!(parse_printer_list(" ; , ").is_empty());
    }

    #[test]
    fn base_name_is_stripped_to_a_stem() {
        assert_eq!(sanitize_base_name("foo"), Some("foo".into()));
        assert_eq!(sanitize_base_name("foo.pdf"), Some("foo".into()));
        assert_eq!(sanitize_base_name("a/b/foo.tmp"), Some("foo".into()));
        assert_eq!(sanitize_base_name("../../etc/passwd"), Some("passwd".into()));
        assert_eq!(sanitize_base_name(""), None);
        assert_eq!(sanitize_base_name("/"), None);
        assert_eq!(sanitize_base_name(".."), None);
    }

    #[test]
    fn query_keys_are_case_insensitive_and_order_preserving() {
        let params = parse_query("q&dNOPAUSE&SDEVICE=pxlmono&soutputfile=j1&PRINT=a:1&r=300");
        assert_eq!(params.device.as_deref(), Some("pxlmono"));
        assert_eq!(params.base_name.as_deref(), Some("j1"));
        assert_eq!(params.printers, vec!["a:1"]);
        assert_eq!(params.gs_args, vec!["-q", "-dNOPAUSE", "-r=300"]);
    }

    #[test]
    fn repeated_print_params_accumulate() {
        let params = parse_query("print=a:1&print=b:2;c:3");
        assert_eq!(params.printers, vec!["a:1", "b:2", "c:3"]);
    }

    #[test]
    fn valueless_keys_become_bare_flags() {
        let params = parse_query("q&dBATCH&dSAFER");
        assert_eq!(params.gs_args, vec!["-q", "-dBATCH", "-dSAFER"]);
    }
}
