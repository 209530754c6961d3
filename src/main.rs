mod cli;

use crate::cli::app::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let app = App::new();
    app.run().await
}
