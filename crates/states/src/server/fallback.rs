use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>US States API</title></head>
<body>
<h1>US States API</h1>
<ul>
<li><code>GET /states</code> (<code>?contig=true|false</code>)</li>
<li><code>GET /states/:state</code></li>
<li><code>GET|POST|PATCH|DELETE /states/:state/funfact</code></li>
<li><code>GET /states/:state/capital</code></li>
<li><code>GET /states/:state/nickname</code></li>
<li><code>GET /states/:state/population</code></li>
<li><code>GET /states/:state/admission</code></li>
</ul>
</body>
</html>
"#;

const NOT_FOUND_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>404 Not Found</title></head>
<body><h1>404 Not Found</h1></body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundFormat {
    Html,
    Json,
    Text,
}

/// Pick the 404 representation from an `Accept` header.
///
/// HTML wins whenever the client accepts it, including `*/*` and a missing
/// header; JSON is next; plain text otherwise. Media ranges with `q=0` are
/// ignored.
pub fn negotiate(accept: Option<&str>) -> NotFoundFormat {
    let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
        return NotFoundFormat::Html;
    };

    let ranges: Vec<String> = accept
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let media = pieces.next()?.trim().to_ascii_lowercase();
            let refused = pieces.any(|param| {
                let param = param.trim().replace(' ', "");
                param == "q=0" || param == "q=0.0" || param == "q=0.00" || param == "q=0.000"
            });
            (!refused && !media.is_empty()).then_some(media)
        })
        .collect();

    let accepts = |candidates: &[&str]| ranges.iter().any(|r| candidates.contains(&r.as_str()));

    if accepts(&["text/html", "text/*", "*/*"]) {
        NotFoundFormat::Html
    } else if accepts(&["application/json", "application/*"]) {
        NotFoundFormat::Json
    } else {
        NotFoundFormat::Text
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn not_found(headers: HeaderMap) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());

    match negotiate(accept) {
        NotFoundFormat::Html => (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response(),
        NotFoundFormat::Json => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "404 Not Found" })),
        )
            .into_response(),
        NotFoundFormat::Text => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
