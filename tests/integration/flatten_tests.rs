use doc_flattener::config::CrawlConfig;
use doc_flattener::output::render_document;
use doc_flattener::{FlattenError, Flattener, PageResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration allowing only the mock server's host
fn create_test_config(server: &MockServer, max_retries: u32) -> CrawlConfig {
    let host = url::Url::parse(&server.uri())
        .expect("Failed to parse server URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    CrawlConfig {
        user_agent: "TestAgent".to_string(),
        parallelism: 2,
        politeness_delay_ms: 0,
        allowed_domains: vec![host],
        max_retries,
        retry_backoff_ms: 1,
        ..CrawlConfig::default()
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn find<'a>(results: &'a [PageResult], suffix: &str) -> Option<&'a PageResult> {
    results.iter().find(|r| r.url.ends_with(suffix))
}

fn assert_sorted_unique(results: &[PageResult]) {
    for pair in results.windows(2) {
        assert!(
            pair[0].url < pair[1].url,
            "results not strictly ascending: {} then {}",
            pair[0].url,
            pair[1].url
        );
    }
}

const ROOT_PAGE: &str = r#"
<html>
    <body>
        <main>
        <div class="UnitReadme">
            <h1>Root Package</h1>
            <p>This is the root readme.</p>
        </div>

        <div class="UnitFiles js-unitFiles">
            <ul class="UnitFiles-fileList">
                <li><a href="/pkg/file.go">file.go</a></li>
            </ul>
        </div>

        <div class="UnitDirectories">
            <table>
                <tr>
                    <td><a href="/pkg/sub">Subpackage</a></td>
                </tr>
            </table>
        </div>
        </main>
    </body>
</html>
"#;

const SUB_PAGE: &str = r#"
<html>
    <body>
        <main>
        <div class="Documentation-content">
            <h2>Subpackage Doc</h2>
            <p>This is the subpackage documentation.</p>
            <div class="Documentation-index">Index (should be removed)</div>
        </div>
        </main>
    </body>
</html>
"#;

#[tokio::test]
async fn test_full_flatten_with_source_file() {
    let server = MockServer::start().await;

    mount_html(&server, "/pkg", ROOT_PAGE).await;
    mount_html(&server, "/pkg/sub", SUB_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/pkg/file.go"))
        .respond_with(ResponseTemplate::new(200).set_body_string("package pkg\n\nfunc Foo() {}"))
        .expect(1)
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 1)).expect("Invalid config");
    let results = flattener
        .flatten(&format!("{}/pkg", server.uri()))
        .await
        .expect("Flatten failed");

    assert_eq!(results.len(), 3, "urls: {:?}", results.iter().map(|r| &r.url).collect::<Vec<_>>());
    assert_sorted_unique(&results);

    let urls: Vec<String> = results.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/pkg", server.uri()),
            format!("{}/pkg/file.go", server.uri()),
            format!("{}/pkg/sub", server.uri()),
        ]
    );

    let root = find(&results, "/pkg").expect("root result missing");
    assert!(root.content.contains("# Root Package"), "got:\n{}", root.content);
    assert!(root.content.contains(&format!("URL: {}/pkg", server.uri())));

    let sub = find(&results, "/pkg/sub").expect("subpackage result missing");
    assert!(sub.content.contains("Subpackage Doc"));
    assert!(!sub.content.contains("should be removed"));

    let source = find(&results, "/pkg/file.go").expect("source result missing");
    assert!(source.content.contains("```go"));
    assert!(source.content.contains("package pkg\n\nfunc Foo() {}"));
}

#[tokio::test]
async fn test_readme_and_subpackage_yield_two_results() {
    let server = MockServer::start().await;

    let root = r#"<main>
        <div class="UnitReadme"><h1>Root Package</h1></div>
        <div class="UnitDirectories"><table><tr><td><a href="/pkg/sub">sub</a></td></tr></table></div>
    </main>"#;
    mount_html(&server, "/pkg", root).await;
    mount_html(&server, "/pkg/sub", SUB_PAGE).await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg/", server.uri())).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].content.contains("Root Package"));
    assert!(results[1].content.contains("Subpackage Doc"));
    assert!(!results[1].content.contains("Index (should be removed)"));
}

#[tokio::test]
async fn test_out_of_scope_links_never_fetched() {
    let server = MockServer::start().await;
    let port = url::Url::parse(&server.uri()).unwrap().port().unwrap();

    let root = format!(
        r#"<main>
        <div class="UnitReadme"><h1>Root Package</h1></div>
        <div class="UnitDirectories"><table>
            <tr><td><a href="/other">outside prefix</a></td></tr>
            <tr><td><a href="http://localhost:{port}/pkg/elsewhere">outside domains</a></td></tr>
        </table></div>
    </main>"#
    );
    mount_html(&server, "/pkg", &root).await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pkg/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, format!("{}/pkg", server.uri()));
}

#[tokio::test]
async fn test_shared_source_downloaded_once() {
    let server = MockServer::start().await;

    let files = r#"<ul class="UnitFiles-fileList"><li><a href="/pkg/shared.go">shared.go</a></li></ul>"#;
    let root = format!(
        r#"<main>
        <div class="UnitReadme"><p>root</p></div>
        {files}
        <div class="UnitDirectories"><table>
            <tr><td><a href="/pkg/a">a</a></td></tr>
            <tr><td><a href="/pkg/b">b</a></td></tr>
        </table></div>
    </main>"#
    );
    let child = format!(r#"<main><div class="Documentation"><p>child</p></div>{files}</main>"#);

    mount_html(&server, "/pkg", &root).await;
    mount_html(&server, "/pkg/a", &child).await;
    mount_html(&server, "/pkg/b", &child).await;
    Mock::given(method("GET"))
        .and(path("/pkg/shared.go"))
        .respond_with(ResponseTemplate::new(200).set_body_string("package shared"))
        .expect(1)
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 4);
    assert_sorted_unique(&results);
    let shared: Vec<_> = results.iter().filter(|r| r.url.ends_with("/pkg/shared.go")).collect();
    assert_eq!(shared.len(), 1);
}

#[tokio::test]
async fn test_pages_linked_twice_fetched_once() {
    let server = MockServer::start().await;

    let root = r#"<main>
        <div class="UnitReadme"><p>root</p></div>
        <div class="UnitDirectories"><table>
            <tr><td><a href="/pkg/a">a</a></td></tr>
            <tr><td><a href="/pkg/b">b</a></td></tr>
        </table></div>
    </main>"#;
    let a = r#"<main>
        <div class="Documentation"><p>a</p></div>
        <div class="UnitDirectories"><table>
            <tr><td><a href="/pkg/b">b</a></td></tr>
            <tr><td><a href="/pkg">root</a></td></tr>
        </table></div>
    </main>"#;

    mount_html(&server, "/pkg", root).await;
    mount_html(&server, "/pkg/a", a).await;
    Mock::given(method("GET"))
        .and(path("/pkg/b"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<main><div class="Documentation"><p>b</p></div></main>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_sorted_unique(&results);
}

#[tokio::test]
async fn test_failed_download_left_out() {
    let server = MockServer::start().await;

    let root = r#"<main>
        <div class="UnitReadme"><p>root</p></div>
        <ul class="UnitFiles-fileList">
            <li><a href="/pkg/broken.go">broken.go</a></li>
            <li><a href="/pkg/ok.go">ok.go</a></li>
        </ul>
    </main>"#;
    mount_html(&server, "/pkg", root).await;
    Mock::given(method("GET"))
        .and(path("/pkg/broken.go"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pkg/ok.go"))
        .respond_with(ResponseTemplate::new(200).set_body_string("package ok"))
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 2)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(find(&results, "/pkg/broken.go").is_none());
    assert!(find(&results, "/pkg/ok.go").is_some());
}

#[tokio::test]
async fn test_page_retried_after_transient_failure() {
    let server = MockServer::start().await;

    let root = r#"<main>
        <div class="UnitReadme"><p>root</p></div>
        <div class="UnitDirectories"><table><tr><td><a href="/pkg/flaky">flaky</a></td></tr></table></div>
    </main>"#;
    mount_html(&server, "/pkg", root).await;
    Mock::given(method("GET"))
        .and(path("/pkg/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/pkg/flaky",
        r#"<main><div class="Documentation"><p>Recovered page</p></div></main>"#,
    )
    .await;

    let flattener = Flattener::new(create_test_config(&server, 1)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 2);
    let flaky = find(&results, "/pkg/flaky").expect("retried page missing");
    assert!(flaky.content.contains("Recovered page"));
}

#[tokio::test]
async fn test_failed_child_page_does_not_stop_crawl() {
    let server = MockServer::start().await;

    let root = r#"<main>
        <div class="UnitReadme"><p>root</p></div>
        <div class="UnitDirectories"><table>
            <tr><td><a href="/pkg/gone">gone</a></td></tr>
            <tr><td><a href="/pkg/ok">ok</a></td></tr>
        </table></div>
    </main>"#;
    mount_html(&server, "/pkg", root).await;
    mount_html(&server, "/pkg/ok", r#"<div class="Documentation"><p>ok</p></div>"#).await;
    Mock::given(method("GET"))
        .and(path("/pkg/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let flattener = Flattener::new(create_test_config(&server, 1)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(find(&results, "/pkg/gone").is_none());
}

#[tokio::test]
async fn test_page_without_documentation_is_not_an_error() {
    let server = MockServer::start().await;
    mount_html(&server, "/pkg", "<html><body><main><p>nothing</p></main></body></html>").await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/pkg", server.uri())).await.unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    let config = CrawlConfig {
        user_agent: "TestAgent".to_string(),
        politeness_delay_ms: 0,
        allowed_domains: vec!["127.0.0.1".to_string()],
        max_retries: 1,
        ..CrawlConfig::default()
    };

    let flattener = Flattener::new(config).unwrap();
    let result = flattener.flatten("http://127.0.0.1:1/pkg").await;

    assert!(matches!(result, Err(FlattenError::RootFetch { .. })));
}

#[tokio::test]
async fn test_root_error_status_yields_empty_result() {
    for status in [404, 500] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pkg"))
            .respond_with(ResponseTemplate::new(status))
            .expect(2)
            .mount(&server)
            .await;

        let flattener = Flattener::new(create_test_config(&server, 1)).unwrap();
        let results = flattener
            .flatten(&format!("{}/pkg", server.uri()))
            .await
            .unwrap();

        assert!(results.is_empty(), "status {} should leave no results", status);
    }
}

#[tokio::test]
async fn test_host_only_root_identity_has_no_trailing_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <div class="UnitReadme"><p>Root readme</p></div>
                    <div class="UnitDirectories"><table>
                        <tr><td><a href="/">Self</a></td></tr>
                        <tr><td><a href="/pkg">Pkg</a></td></tr>
                    </table></div>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/pkg",
        r#"<html><body><div class="Documentation"><p>Pkg docs</p></div></body></html>"#,
    )
    .await;

    let flattener = Flattener::new(create_test_config(&server, 0)).unwrap();
    let results = flattener.flatten(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, server.uri());
    assert!(results[0].content.contains("Root readme"));
    assert_eq!(results[1].url, format!("{}/pkg", server.uri()));
}

#[tokio::test]
async fn test_disallowed_root_never_dispatched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, 0);
    config.allowed_domains = vec!["pkg.go.dev".to_string()];

    let flattener = Flattener::new(config).unwrap();
    let result = flattener.flatten(&format!("{}/pkg", server.uri())).await;

    assert!(matches!(result, Err(FlattenError::UrlError(_))));
}

#[tokio::test]
async fn test_malformed_root_is_fatal() {
    let flattener = Flattener::new(CrawlConfig::default()).unwrap();
    let result = flattener.flatten("not a url").await;
    assert!(matches!(result, Err(FlattenError::UrlError(_))));
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let config = CrawlConfig {
        parallelism: 0,
        ..CrawlConfig::default()
    };
    assert!(matches!(Flattener::new(config), Err(FlattenError::Config(_))));
}

#[tokio::test]
async fn test_parallel_crawl_output_is_deterministic() {
    let server = MockServer::start().await;

    let mut rows = String::new();
    for i in 0..8 {
        rows.push_str(&format!(r#"<tr><td><a href="/pkg/sub{i}">sub{i}</a></td></tr>"#));
        mount_html(
            &server,
            &format!("/pkg/sub{i}"),
            &format!(r#"<div class="Documentation"><p>Sub {i}</p></div>"#),
        )
        .await;
    }
    let root = format!(
        r#"<main><div class="UnitReadme"><p>root</p></div>
        <div class="UnitDirectories"><table>{rows}</table></div></main>"#
    );
    mount_html(&server, "/pkg", &root).await;

    let mut config = create_test_config(&server, 0);
    config.parallelism = 4;
    config.politeness_delay_ms = 5;
    let flattener = Flattener::new(config).unwrap();
    let target = format!("{}/pkg", server.uri());

    let first = flattener.flatten(&target).await.unwrap();
    let second = flattener.flatten(&target).await.unwrap();

    assert_eq!(first.len(), 9);
    assert_sorted_unique(&first);
    assert_eq!(render_document(&first), render_document(&second));
}
