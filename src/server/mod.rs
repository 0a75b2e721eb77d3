//! Preview server: JSON API, rendered posts and raw markdown over the index

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{BlogPost, PostStore};
use crate::generator::{render_feed, render_robots, render_sitemap};
use crate::helpers::{escape_xml, full_date, parse_date, post_path, url_for};
use crate::Folio;

/// Shared by every request
struct ServerState {
    config: SiteConfig,
    store: PostStore,
    timeout: Duration,
}

impl ServerState {
    fn new(folio: &Folio) -> Self {
        Self {
            config: folio.config.clone(),
            store: folio.store(),
            timeout: Duration::from_millis(folio.config.server.read_timeout_ms),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PostsQuery {
    category: Option<String>,
    q: Option<String>,
}

/// Build the application router
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(ServerState::new(folio));
    let config = &folio.config;

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:key", get(show_post))
        .route("/api/categories", get(list_categories))
        .route("/blog/:key", get(post_page))
        .route("/blog/:key/md", get(post_markdown))
        .route(&format!("/{}", config.feed.path), get(feed))
        .route(&format!("/{}", config.sitemap.path), get(sitemap))
        .route("/robots.txt", get(robots))
        .fallback_service(ServeDir::new(&folio.public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching {} for changes...", folio.content_dir.display());
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let folio = folio.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_rebuild(&folio) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Rebuild the index whenever a markdown file in the content directory changes
fn watch_and_rebuild(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&folio.content_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", folio.content_dir);

    for result in rx {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| e.path.extension().and_then(|x| x.to_str()) == Some("md"))
                    .collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }
                match folio.build_index() {
                    Ok(summary) => tracing::info!("Reindexed {} posts", summary.posts),
                    Err(e) => tracing::error!("Index rebuild failed: {:#}", e),
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Run a store query off the async runtime, bounded by the configured timeout
async fn with_store<T, F>(state: Arc<ServerState>, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&PostStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let timeout = state.timeout;
    let task = tokio::task::spawn_blocking(move || f(&state.store));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!("Store query panicked: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(_) => {
            tracing::warn!("Store query exceeded {:?}", timeout);
            Err(StatusCode::GATEWAY_TIMEOUT)
        }
    }
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostsQuery>,
) -> Result<Response, StatusCode> {
    let posts = with_store(state, move |store| {
        let posts = match query.q.as_deref() {
            Some(term) => store.search(term),
            None => store.all_posts(),
        };
        match query.category.as_deref() {
            Some(category) => posts
                .into_iter()
                .filter(|p| p.in_category(category))
                .collect(),
            None => posts,
        }
    })
    .await?;

    Ok(Json(posts).into_response())
}

async fn show_post(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
) -> Result<Response, StatusCode> {
    let post = with_store(state, move |store| store.get_post(&key)).await?;

    Ok(match post {
        Some(post) => Json(post).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Post not found" })),
        )
            .into_response(),
    })
}

async fn list_categories(State(state): State<Arc<ServerState>>) -> Result<Response, StatusCode> {
    let counts = with_store(state, |store| store.category_counts()).await?;
    Ok(Json(counts).into_response())
}

async fn post_page(
    State(state): State<Arc<ServerState>>,
    Path(key): Path<String>,
) -> Result<Response, StatusCode> {
    let config = state.config.clone();
    let post = with_store(state, move |store| store.get_post(&key)).await?;

    Ok(match post {
        Some(post) => Html(render_article(&config, &post)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(not_found_page(&config))).into_response(),
    })
}

async fn post_markdown(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Response, StatusCode> {
    let lookup = slug.clone();
    let source = with_store(state, move |store| store.raw_markdown(&lookup)).await?;

    Ok(match source {
        Some(source) => markdown_response(&slug, source),
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    })
}

async fn feed(State(state): State<Arc<ServerState>>) -> Result<Response, StatusCode> {
    let config = state.config.clone();
    let posts = with_store(state, |store| store.all_posts()).await?;
    let body = render_feed(&config, &posts, Utc::now());
    Ok(([(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")], body).into_response())
}

async fn sitemap(State(state): State<Arc<ServerState>>) -> Result<Response, StatusCode> {
    let config = state.config.clone();
    let posts = with_store(state, |store| store.all_posts()).await?;
    let body = render_sitemap(&config, &posts, Utc::now());
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response())
}

async fn robots(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config),
    )
        .into_response()
}

/// Raw markdown with download-friendly headers
fn markdown_response(slug: &str, source: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (
                header::CACHE_CONTROL,
                "public, max-age=3600, s-maxage=3600".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.md\"", slug.replace('"', "")),
            ),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        ],
        source,
    )
        .into_response()
}

fn render_article(config: &SiteConfig, post: &BlogPost) -> String {
    let meta = &post.meta;
    let date = parse_date(&meta.date, config.timezone())
        .map(|d| full_date(&d))
        .unwrap_or_else(|| meta.date.clone());
    let categories: Vec<String> = meta.categories.iter().map(|c| escape_xml(c)).collect();
    let keywords: Vec<&str> = config
        .keywords
        .iter()
        .chain(meta.tags.iter())
        .map(String::as_str)
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title} | {site}</title>
<meta name="description" content="{excerpt}">
<meta name="keywords" content="{keywords}">
<link rel="alternate" type="application/rss+xml" href="{feed}">
</head>
<body>
<article>
<header>
<h1>{title}</h1>
<p class="meta">{date} &middot; {read_time} &middot; {author}</p>
<p class="categories">{categories}</p>
</header>
{content}
<footer><a href="{path}/md">View markdown</a> &middot; <a href="/">Home</a></footer>
</article>
</body>
</html>
"#,
        lang = escape_xml(&config.technical.language),
        title = escape_xml(&meta.title),
        site = escape_xml(&config.name),
        excerpt = escape_xml(&meta.excerpt),
        keywords = escape_xml(&keywords.join(", ")),
        feed = url_for(&config.feed.path),
        date = escape_xml(&date),
        read_time = escape_xml(&meta.read_time),
        author = escape_xml(&meta.author.name),
        categories = categories.join(", "),
        content = post.content,
        path = post_path(&meta.slug),
    )
}

fn not_found_page(config: &SiteConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Post not found | {site}</title></head>
<body>
<h1>Post not found</h1>
<p><a href="/">Back to home</a></p>
</body>
</html>
"#,
        site = escape_xml(&config.name)
    )
}
