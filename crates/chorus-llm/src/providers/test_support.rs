//! Throwaway HTTP servers standing in for vendor APIs

use axum::Router;
use tokio::net::TcpListener;

/// Address nothing listens on
pub(crate) const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Serve `app` on a random local port and return its base URL
pub(crate) async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
