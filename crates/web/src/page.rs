//! Server-rendered quotes page
//!
//! Element contract relied on by the browser specs:
//! - `input[name=text]`, `input[name=author]`
//! - `button#submitBtn` ("Submit Quote"), disabled unless both inputs are filled
//! - `button#cancelBtn`
//! - one `li.quote` per quote: a `span.quote-text` followed by sibling
//!   Edit and Delete buttons, in that order

use quotes_common::{Mode, Quote, QuoteForm};

/// Characters `str::trim` strips, i.e. Unicode `White_Space`
///
/// JavaScript's `trim` and `\s` disagree with Rust on U+0085 and U+FEFF, so
/// the page builds its own class from this list.
const BLANK_CHARS: &[char] = &[
    '\u{0009}', '\u{000A}', '\u{000B}', '\u{000C}', '\u{000D}', '\u{0020}', '\u{0085}', '\u{00A0}',
    '\u{1680}', '\u{2000}', '\u{2001}', '\u{2002}', '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}',
    '\u{2007}', '\u{2008}', '\u{2009}', '\u{200A}', '\u{2028}', '\u{2029}', '\u{202F}', '\u{205F}',
    '\u{3000}',
];

/// A JS regex literal matching strings made only of `BLANK_CHARS`
fn js_blank_pattern() -> String {
    let class: String = BLANK_CHARS
        .iter()
        .map(|c| format!("\\u{:04x}", *c as u32))
        .collect();
    format!("/^[{}]*$/", class)
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full page for the current list and form buffer
pub fn render_page(quotes: &[Quote], form: &QuoteForm, notice: Option<&str>) -> String {
    let heading = match form.mode() {
        Mode::Create => "Add a quote".to_string(),
        Mode::Editing(id) => format!("Editing quote #{}", id),
    };
    let disabled = if form.submit_state().is_enabled() { "" } else { " disabled" };
    let notice = notice
        .map(|n| format!("\n    <p class=\"notice\" role=\"alert\">{}</p>", escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Quotes</title>
    <link rel="stylesheet" href="/assets/quotes.css" />
  </head>
  <body>
    <h1>Quotes</h1>{notice}
    <form id="quoteForm" method="post" action="/form/submit" autocomplete="off">
      <h2>{heading}</h2>
      <label>Text <input type="text" name="text" value="{text}" /></label>
      <label>Author <input type="text" name="author" value="{author}" /></label>
      <div class="actions">
        <button type="submit" id="submitBtn"{disabled}>Submit Quote</button>
        <button type="submit" id="cancelBtn" formaction="/form/cancel">Cancel</button>
      </div>
    </form>
    <form id="quoteActions" method="post"></form>
    <ul id="quotes">
{items}    </ul>
    <script>
      (function () {{
        var form = document.getElementById('quoteForm');
        var submit = document.getElementById('submitBtn');
        var blank = {blank};
        function filled(name) {{
          return !blank.test(form.elements.namedItem(name).value);
        }}
        function sync() {{
          submit.disabled = !(filled('text') && filled('author'));
        }}
        form.addEventListener('input', sync);
        sync();
      }})();
    </script>
  </body>
</html>
"#,
        notice = notice,
        heading = heading,
        text = escape_html(form.text()),
        author = escape_html(form.author()),
        disabled = disabled,
        items = render_items(quotes),
        blank = js_blank_pattern(),
    )
}

fn render_items(quotes: &[Quote]) -> String {
    let mut items = String::new();
    for quote in quotes {
        items.push_str(&format!(
            concat!(
                "      <li class=\"quote\" data-id=\"{id}\">",
                "<span class=\"quote-text\">{line}</span>",
                "<button type=\"submit\" form=\"quoteActions\" ",
                "formaction=\"/quotes/{id}/edit\" class=\"edit\">Edit</button>",
                "<button type=\"submit\" form=\"quoteActions\" ",
                "formaction=\"/quotes/{id}/delete\" class=\"delete\">Delete</button>",
                "</li>\n"
            ),
            id = quote.id,
            line = escape_html(&quote.display_line()),
        ));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotes_common::{MemoryStore, QuoteDraft, QuoteStore};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_page_has_form_contract() {
        let html = render_page(&[], &QuoteForm::new(), None);
        assert!(html.contains(r#"name="text" value="""#));
        assert!(html.contains(r#"name="author" value="""#));
        let submit = r#"<button type="submit" id="submitBtn" disabled>Submit Quote</button>"#;
        assert!(html.contains(submit));
        assert!(html.contains(r#"id="cancelBtn""#));
        assert!(!html.contains("foobar"));
        assert!(!html.contains("<li"));
    }

    #[test]
    fn test_quote_entry_layout() {
        let store = MemoryStore::new();
        let q = store.insert(&QuoteDraft::new("CSS rulez", "CRHarding")).unwrap();
        let html = render_page(&store.list().unwrap(), &QuoteForm::new(), None);

        let span = r#"<span class="quote-text">CSS rulez (CRHarding)</span>"#;
        let edit = format!(r#"formaction="/quotes/{}/edit""#, q.id);
        let delete = format!(r#"formaction="/quotes/{}/delete""#, q.id);
        let span_at = html.find(span).unwrap();
        let edit_at = html.find(&edit).unwrap();
        let delete_at = html.find(&delete).unwrap();
        assert!(span_at < edit_at && edit_at < delete_at);
    }

    #[test]
    fn test_editing_prefills_and_enables() {
        let store = MemoryStore::new();
        let q = store.insert(&QuoteDraft::new("Lorem ipsum", "CRHarding")).unwrap();
        let mut form = QuoteForm::new();
        form.edit(&store, q.id).unwrap();

        let html = render_page(&store.list().unwrap(), &form, None);
        assert!(html.contains(r#"name="text" value="Lorem ipsum""#));
        assert!(html.contains(r#"name="author" value="CRHarding""#));
        assert!(html.contains(r#"<button type="submit" id="submitBtn">Submit Quote</button>"#));
        assert!(html.contains("Editing quote #1"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let store = MemoryStore::new();
        store
            .insert(&QuoteDraft::new("<script>alert(1)</script>", "\"Mallory\""))
            .unwrap();
        let html = render_page(&store.list().unwrap(), &QuoteForm::new(), Some("<oops>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; (&quot;Mallory&quot;)"));
        assert!(html.contains("&lt;oops&gt;"));
    }

    #[test]
    fn test_blank_chars_match_rust_whitespace() {
        for c in '\0'..='\u{FFFF}' {
            assert_eq!(
                BLANK_CHARS.contains(&c),
                c.is_whitespace(),
                "U+{:04X}",
                c as u32
            );
        }
    }

    #[test]
    fn test_script_blank_pattern() {
        let html = render_page(&[], &QuoteForm::new(), None);
        let pattern = js_blank_pattern();
        assert!(html.contains(&format!("var blank = {};", pattern)));
        assert!(pattern.contains("\\u0085"));
        assert!(!pattern.contains("\\ufeff"));
        assert!(!html.contains(".trim()"));
    }
}
