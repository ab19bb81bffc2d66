use clap::Parser;
use log::error;
use todo_server::{init_logging, AppState, Args, ServerError, TodoServer};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("event=server_exit module=server status=error error={err}");
        eprintln!("todo-server: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = Args::parse().into_config()?;
    init_logging(&config)?;

    let state = AppState::open(&config)?;
    TodoServer::new(config, state).serve().await
}
