//! `sut-forge-server` — the `.sut` builder's HTTP front end.

#[tokio::main]
async fn main() {
    sut_forge::init();

    let config = sut_forge::config::ServerConfig::from_env();
    sut_forge::server::serve(config).await;
}
