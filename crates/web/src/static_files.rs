//! Embedded stylesheet under `/assets/`

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Asset name to body
const ASSETS: &[(&str, &str)] = &[("quotes.css", QUOTES_CSS)];

/// Look up an embedded asset; 404 for anything else
pub fn serve(path: &str) -> Response {
    let Some((name, body)) = ASSETS.iter().find(|(name, _)| *name == path) else {
        debug!("No embedded asset {}", path);
        return (StatusCode::NOT_FOUND, "File not found").into_response();
    };

    let mime = mime_guess::from_path(name).first_or_octet_stream();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        *body,
    )
        .into_response()
}

const QUOTES_CSS: &str = r#"
body {
  font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
  max-width: 40rem;
  margin: 2rem auto;
  padding: 0 1rem;
  color: #111827;
}
form#quoteForm {
  display: flex;
  flex-direction: column;
  gap: 0.5rem;
  padding: 1rem;
  border: 1px solid #e5e7eb;
  border-radius: 8px;
}
form#quoteForm label { display: flex; flex-direction: column; font-size: 0.9rem; }
form#quoteForm input { padding: 0.4rem; font-size: 1rem; }
.actions { display: flex; gap: 0.5rem; }
button { padding: 0.35rem 0.8rem; cursor: pointer; }
button:disabled { cursor: not-allowed; opacity: 0.5; }
.notice { color: #b91c1c; }
ul#quotes { list-style: none; padding: 0; }
li.quote {
  display: flex;
  align-items: center;
  gap: 0.5rem;
  padding: 0.5rem 0;
  border-bottom: 1px solid #f3f4f6;
}
li.quote .quote-text { flex: 1; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_content_type() {
        let resp = serve("quotes.css");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[test]
    fn test_serve_unknown_asset() {
        assert_eq!(serve("missing.css").status(), StatusCode::NOT_FOUND);
        assert_eq!(serve("../quotes.css").status(), StatusCode::NOT_FOUND);
    }
}
