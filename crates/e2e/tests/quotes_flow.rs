//! Quotes flow integration tests
//!
//! Runs the web server in-process on an ephemeral port and drives the page
//! the way a browser would: form posts, followed redirects, rendered HTML.
//! Each test gets its own server since the form buffer is single-session.

use std::sync::Arc;

use quotes_common::{FormSnapshot, Mode, MemoryStore, Quote, SubmitState};
use quotes_web::{WebServer, WebServerConfig};
use test_case::test_case;

struct App {
    base_url: String,
    http: reqwest::Client,
}

impl App {
    async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cfg = WebServerConfig {
            addr,
            test_mode: true,
            ..Default::default()
        };
        let server = WebServer::with_store(cfg, Arc::new(MemoryStore::new()));
        tokio::spawn(server.serve_on(listener));

        Self {
            base_url: format!("http://{}", addr),
            http: reqwest::Client::new(),
        }
    }

    async fn page(&self) -> String {
        self.http
            .get(&self.base_url)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, fields: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .form(fields)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.text().await.unwrap())
    }

    async fn submit(&self, text: &str, author: &str) -> String {
        let (status, html) = self
            .post("/form/submit", &[("text", text), ("author", author)])
            .await;
        assert!(status.is_success(), "submit returned {}", status);
        html
    }

    async fn quotes(&self) -> Vec<Quote> {
        self.http
            .get(format!("{}/api/quotes", self.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn form(&self) -> FormSnapshot {
        self.http
            .get(format!("{}/api/form", self.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

fn input_value<'a>(html: &'a str, name: &str) -> &'a str {
    let marker = format!("name=\"{}\" value=\"", name);
    let start = html.find(&marker).map(|i| i + marker.len()).unwrap();
    let end = html[start..].find('"').unwrap();
    &html[start..start + end]
}

#[tokio::test]
async fn test_page_elements_showing() {
    let app = App::start().await;
    let html = app.page().await;

    assert!(html.contains(r#"name="text""#));
    assert!(html.contains(r#"name="author""#));
    assert!(!html.contains(r#"name="foobar""#));
    assert!(html.contains(r#"id="submitBtn" disabled>Submit Quote</button>"#));
    assert!(html.contains(r#"id="cancelBtn""#));
}

#[tokio::test]
async fn test_health() {
    let app = App::start().await;
    let resp = app
        .http
        .get(format!("{}/health", app.base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

#[test_case("CSS rulez", "CRHarding" ; "css rulez by crharding")]
#[test_case("CSS rulez", "Kevin" ; "css rulez by kevin")]
#[tokio::test]
async fn test_add_then_delete(text: &str, author: &str) {
    let app = App::start().await;

    let html = app.submit(text, author).await;
    let line = format!("{} ({})", text, author);
    assert!(html.contains(&line));
    assert_eq!(input_value(&html, "text"), "");
    assert_eq!(input_value(&html, "author"), "");
    assert_eq!(app.form().await.submit, SubmitState::Disabled);

    let quotes = app.quotes().await;
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].text, text);
    assert_eq!(quotes[0].author, author);

    let (status, html) = app
        .post(&format!("/quotes/{}/delete", quotes[0].id), &[])
        .await;
    assert!(status.is_success());
    assert!(!html.contains(text));
    assert!(app.quotes().await.is_empty());
}

#[tokio::test]
async fn test_edit_quote_in_place() {
    let app = App::start().await;
    app.submit("Lorem ipsum", "CRHarding").await;
    let id = app.quotes().await[0].id;

    let (_, html) = app.post(&format!("/quotes/{}/edit", id), &[]).await;
    assert_eq!(input_value(&html, "text"), "Lorem ipsum");
    assert_eq!(input_value(&html, "author"), "CRHarding");
    assert_eq!(app.form().await.mode, Mode::Editing(id));

    let html = app
        .submit("Lorem ipsum dolor sit", "CRHarding Rocks!")
        .await;
    assert!(html.contains("Lorem ipsum dolor sit (CRHarding Rocks!)"));

    let quotes = app.quotes().await;
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].id, id);
    assert_eq!(app.form().await.mode, Mode::Create);

    let (_, html) = app.post(&format!("/quotes/{}/delete", id), &[]).await;
    assert!(!html.contains("Lorem ipsum"));
}

#[tokio::test]
async fn test_cancel_clears_form_and_keeps_quotes() {
    let app = App::start().await;
    app.submit("CSS rulez", "CRHarding").await;
    let id = app.quotes().await[0].id;
    app.post(&format!("/quotes/{}/edit", id), &[]).await;

    let (status, html) = app.post("/form/cancel", &[]).await;
    assert!(status.is_success());
    assert_eq!(input_value(&html, "text"), "");
    assert_eq!(input_value(&html, "author"), "");
    assert!(html.contains(r#"id="submitBtn" disabled"#));

    let form = app.form().await;
    assert_eq!(form.mode, Mode::Create);
    assert_eq!(app.quotes().await.len(), 1);
}

#[tokio::test]
async fn test_incomplete_submit_is_rejected() {
    let app = App::start().await;

    let (status, html) = app
        .post("/form/submit", &[("text", "CSS rulez"), ("author", "  ")])
        .await;
    assert_eq!(status, reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("notice"));
    assert!(app.quotes().await.is_empty());
}

#[tokio::test]
async fn test_reset_endpoint_clears_state() {
    let app = App::start().await;
    app.submit("CSS rulez", "CRHarding").await;

    let resp = app
        .http
        .post(format!("{}/api/test/reset", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(app.quotes().await.is_empty());
}
