use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = finsight_backend::run().await {
        error!("Server exited with error: {}", error);
        std::process::exit(1);
    }
}
