use std::fs;

use notebook_sourcer::events::{Event, RecordingSink};
use notebook_sourcer::extract::Extractor;
use notebook_sourcer::links::{read_links, LinkSources};
use notebook_sourcer::Error;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn toc_page(base: &str) -> String {
    format!(
        r##"<html><body>
        <nav>
          <a href="{base}/latest/html/release_notes/index">Release notes</a>
          <a href="/docs/product/latest/html-single/installing/index">Installing</a>
          <a href="upgrading">Upgrading</a>
          <a href="/docs/product/latest/api">API</a>
          <a href="/docs/product/latest/api">API (again)</a>
          <a href="/docs/product/latest/getting_started">Getting started</a>
          <a href="https://www.example.org/blog">Blog</a>
          <a href="/docs/other/latest/intro">Other product</a>
          <a href="#main">Skip to content</a>
          <a href="mailto:docs@example.com">Contact</a>
          <a href="/docs/product/latest/diagram.png">Diagram</a>
        </nav>
        </body></html>"##
    )
}

#[tokio::test]
async fn extraction_writes_sorted_in_scope_links() {
    let server = MockServer::start().await;
    let base = format!("{}/docs/product", server.uri());

    Mock::given(method("GET"))
        .and(path("/docs/product/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(toc_page(&base)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("urls.txt");
    let sink = RecordingSink::new();

    let count = Extractor::new()
        .unwrap()
        .extract_to_file(&format!("{base}/latest/"), &[], &output, &sink)
        .await
        .unwrap();

    let written = read_links(&output).unwrap();
    assert_eq!(count, 5);
    assert_eq!(
        written,
        vec![
            format!("{base}/latest/api"),
            format!("{base}/latest/getting_started"),
            format!("{base}/latest/html-single/installing/index"),
            format!("{base}/latest/html-single/release_notes/index"),
            format!("{base}/upgrading"),
        ]
    );
    let mut sorted = written.clone();
    sorted.sort();
    assert_eq!(written, sorted);
    assert!(sink.contains(|e| matches!(e, Event::ExtractionWritten { count: 5, .. })));
}

#[tokio::test]
async fn extraction_without_links_fails_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs/product/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>nothing here</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("urls.txt");

    let result = Extractor::new()
        .unwrap()
        .extract_to_file(
            &format!("{}/docs/product", server.uri()),
            &[],
            &output,
            &RecordingSink::new(),
        )
        .await;

    assert!(matches!(result, Err(Error::EmptyExtraction { .. })));
    assert!(!output.exists());
}

#[test]
fn extracted_file_merges_with_static_links_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("urls.txt");
    let extra = dir.path().join("CQA_res.txt");
    fs::write(&main, "https://d/a\nhttps://d/b\n").unwrap();
    fs::write(&extra, "https://q/z\nhttps://d/a\n").unwrap();

    let links = LinkSources {
        main,
        static_file: extra,
        skip_static: false,
    }
    .combine(&RecordingSink::new())
    .unwrap();

    assert_eq!(links, vec!["https://d/a", "https://d/b", "https://q/z"]);
}
