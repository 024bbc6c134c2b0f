// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::routing::get;
use axum::Router;
use readiness_scanner::models::robots::RobotsStatus;
use readiness_scanner::services::robots::analyze_robots;
use url::Url;

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("readiness-scanner-tests/0.1")
        .build()
        .expect("client builds")
}

/// Serve `app` on an ephemeral local port and return a page URL on it.
async fn serve(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("binds");
    let addr = listener.local_addr().expect("has address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serves");
    });
    Url::parse(&format!("http://{addr}/page")).expect("valid url")
}

#[tokio::test]
async fn test_missing_robots_maps_to_not_found() {
    // no routes at all, so /robots.txt answers 404
    let target = serve(Router::new()).await;

    let analysis = analyze_robots(&http_client(), &target).await;

    assert_eq!(analysis.status, RobotsStatus::NotFound);
    assert_eq!(analysis.raw_content, "");
    assert_eq!(
        analysis.summary,
        "No robots.txt file found. AI crawlers will use default permissions."
    );
}

#[tokio::test]
async fn test_served_robots_text_is_analyzed() {
    let app = Router::new().route(
        "/robots.txt",
        get(|| async { "User-agent: *\nDisallow: /" }),
    );
    let target = serve(app).await;

    let analysis = analyze_robots(&http_client(), &target).await;

    assert_eq!(analysis.status, RobotsStatus::MostlyBlocked);
    assert_eq!(analysis.raw_content, "User-agent: *\nDisallow: /");
    assert_eq!(
        analysis.summary,
        "0 out of 4 major AI crawlers are allowed to access your site."
    );
}

#[tokio::test]
async fn test_connection_refused_maps_to_cors_blocked() {
    // grab an ephemeral port and release it, then connect to it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("binds");
    let addr = listener.local_addr().expect("has address");
    drop(listener);
    let target = Url::parse(&format!("http://{addr}/")).expect("valid url");

    let analysis = analyze_robots(&http_client(), &target).await;

    assert_eq!(analysis.status, RobotsStatus::CorsBlocked);
    assert_eq!(analysis.raw_content, "");
    assert_eq!(
        analysis.summary,
        "Unable to access robots.txt due to network restrictions."
    );
}
