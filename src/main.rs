#[tokio::main]
async fn main() {
    team_booking::run().await;
}
