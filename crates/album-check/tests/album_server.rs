// Album Server - Local HTTP server for browser tests
//
// Serves a minimal photo album page under /ps/v1 and /ps/v2: a login form and a
// date search over 49 photos uploaded daily from 2018-06-01, ten per page.
// Photos are rendered as `div > p > img` with the album position as `id` and the
// photo number as the `src` file name.

// Note: Functions appear "unused" because each test binary compiles separately,
// but they ARE used across multiple test files. Suppress false-positive warnings.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Response, StatusCode},
    routing::get,
};
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Album server handle
pub struct AlbumServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl AlbumServer {
    /// Start the album server on a random available port
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/ps/v1/index.html", get(album_page))
            .route("/ps/v2/index.html", get(album_page));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind album server");

        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Album server failed");
        });

        AlbumServer { addr, handle }
    }

    /// Base URL the suites append `/{version}/index.html` to
    pub fn base_url(&self) -> String {
        format!("http://{}/ps", self.addr)
    }

    /// Shutdown the album server
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn album_page() -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html")
        .body(Body::from(
            r#"<!DOCTYPE html>
<html>
<head><title>Photo Album</title></head>
<body>
  <section id="login-view">
    <input type="text" placeholder="username">
    <input type="password" placeholder="password">
    <button id="login">Login</button>
  </section>
  <section id="search-view" style="display:none">
    <input type="text" placeholder="Type start date in RFC3339 format">
    <input type="text" placeholder="Type end date in RFC3339 format">
    <button id="view-search">Search</button>
    <button id="view-next">Next</button>
  </section>
  <section id="results"></section>
  <script>
    const photos = Array.from({ length: 49 }, (_, i) => ({
      n: i + 1,
      date: new Date(Date.UTC(2018, 5, 1 + i, 12)).toISOString().replace('.000Z', 'Z'),
    }));
    let results = [];
    let page = 0;

    const field = (name) => document.querySelector(`input[placeholder="${name}"]`).value;

    function render() {
      document.getElementById('results').innerHTML = results
        .slice(page * 10, page * 10 + 10)
        .map((p) => `<div><p><img id="${p.n - 1}" src="img/${p.n}.jpg"></p></div>`)
        .join('');
    }

    document.getElementById('login').onclick = () => {
      if (field('username') !== 'user' || field('password') !== 'password') {
        return;
      }
      document.getElementById('login-view').style.display = 'none';
      document.getElementById('search-view').style.display = '';
      results = photos;
      page = 0;
      render();
    };

    document.getElementById('view-search').onclick = () => {
      const start = field('Type start date in RFC3339 format');
      const end = field('Type end date in RFC3339 format');
      results = photos.filter((p) => (!start || p.date >= start) && (!end || p.date <= end));
      page = 0;
      render();
    };

    document.getElementById('view-next').onclick = () => {
      if ((page + 1) * 10 < results.length) {
        page += 1;
        render();
      }
    };
  </script>
</body>
</html>"#,
        ))
        .unwrap()
}
