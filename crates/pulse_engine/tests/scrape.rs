use pretty_assertions::assert_eq;
use pulse_engine::{
    decode_page, handle_message, ScrapeRequest, ScrapeResponse, Scraper, SelectorScraper,
};

fn page_with_comments(count: usize) -> String {
    let body: String = (0..count)
        .map(|i| format!(r#"<ytd-comment><span id="content-text">  comment {i}  </span></ytd-comment>"#))
        .collect();
    format!("<html><body>{body}</body></html>")
}

#[test]
fn scraper_trims_text_in_document_order() {
    let html = r#"
    <html><body>
        <div id="content-text">
            first <b>bold</b>
        </div>
        <p>not a comment</p>
        <div id="content-text">second</div>
    </body></html>
    "#;

    let snippets = SelectorScraper::default().scrape(html);
    assert_eq!(snippets, vec!["first bold".to_string(), "second".to_string()]);
}

#[test]
fn scraper_caps_results() {
    let html = page_with_comments(150);

    let snippets = SelectorScraper::default().scrape(&html);
    assert_eq!(snippets.len(), 100);
    assert_eq!(snippets[0], "comment 0");
    assert_eq!(snippets[99], "comment 99");
}

#[test]
fn scraper_returns_empty_when_nothing_matches() {
    let snippets = SelectorScraper::comments(100).scrape("<html><body><p>hi</p></body></html>");
    assert!(snippets.is_empty());
}

#[test]
fn custom_selector_is_honoured() {
    let scraper = SelectorScraper::new("p.note", 10).unwrap();
    let snippets = scraper.scrape(r#"<p class="note"> a </p><p>b</p>"#);
    assert_eq!(snippets, vec!["a".to_string()]);
    let err = SelectorScraper::new("<<<", 10).unwrap_err();
    assert_eq!(err.selector, "<<<");
}

#[test]
fn get_comments_message_gets_exactly_one_reply() {
    let html = page_with_comments(2);
    let response = handle_message(&ScrapeRequest::get_comments(), &html, &SelectorScraper::default());
    assert_eq!(
        response,
        Some(ScrapeResponse {
            comments: vec!["comment 0".to_string(), "comment 1".to_string()],
        })
    );
}

#[test]
fn unknown_action_gets_no_reply() {
    let request: ScrapeRequest = serde_json::from_str(r#"{"action":"ping"}"#).unwrap();
    let response = handle_message(&request, &page_with_comments(1), &SelectorScraper::default());
    assert!(response.is_none());
}

#[test]
fn response_serializes_to_message_contract() {
    let response = ScrapeResponse {
        comments: vec!["x".to_string()],
    };
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"comments":["x"]}"#
    );
}

#[test]
fn decode_respects_declared_charset() {
    let bytes = b"caf\xe9";
    let decoded = decode_page(bytes, Some("text/html; charset=ISO-8859-1")).unwrap();
    assert_eq!(decoded.html, "café");
}

#[test]
fn decode_reads_meta_charset() {
    let bytes = b"<html><head><meta charset=\"windows-1252\"></head><body>caf\xe9</body></html>";
    let decoded = decode_page(bytes, None).unwrap();
    assert_eq!(decoded.encoding_label, "windows-1252");
    assert!(decoded.html.contains("café"));
}

#[test]
fn decode_handles_utf8_bom() {
    let decoded = decode_page(b"\xEF\xBB\xBFhello", None).unwrap();
    assert_eq!(decoded.html, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}
