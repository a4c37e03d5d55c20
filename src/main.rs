use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use student_registry::app::App;
use student_registry::config::Arguments;
use student_registry::gateway::HttpGateway;
use student_registry::terminal::{read_commands, TerminalView};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Arguments::parse();
    log::info!("Starting student registry against {}", args.server_url);
    log::debug!("configuration:\n{}", args);

    let gateway = HttpGateway::new(args.server_url.clone(), args.request_timeout())?;
    let app = App::new(Arc::new(gateway), TerminalView, args.debounce());

    let (events, rx) = mpsc::channel(32);
    log::info!("Reading commands from stdin, `help` lists them");
    let input = tokio::spawn(read_commands(tokio::io::stdin(), events));

    app.run(rx).await;
    input.await??;
    Ok(())
}
