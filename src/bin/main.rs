//! Binary entrypoint for the handover tool

#[tokio::main]
async fn main() {
    if let Err(e) = handover::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
