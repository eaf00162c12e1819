use mock_server::{AppState, MockConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let app_key = std::env::var("APP_KEY").unwrap_or_else(|_| "mock-key".to_string());
    let app_secret = std::env::var("APP_SECRET").unwrap_or_else(|_| "mock-secret".to_string());

    let state = AppState::new(MockConfig::new(&app_key, &app_secret))
        .seed("rust", 7)
        .seed("linux", 3);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run(listener, state).await
}
