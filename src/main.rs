#[actix_web::main]
async fn main() {
    if let Err(e) = sentiment_intelligence::run().await {
        eprintln!("sentiment-intelligence: {}", e);
        std::process::exit(1);
    }
}
