//! mlp-serve
//!
//! Serves one trained network over HTTP with a synchronous tiny_http server.
//!
//! Routes:
//!   GET  /health   liveness probe, answers `ok`
//!   GET  /network  the network in its text form
//!   POST /predict  body `x1,x2,...`, answers `{"class":k,"outputs":[...]}`

mod handlers;
mod routes;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use bipolar_mlp::{init_logging, Network};
use clap::Parser;
use tiny_http::Server;
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Serve predictions from a saved network")]
struct Args {
    /// Network file written by `bipolar-mlp train`
    #[arg(long, value_name = "PATH")]
    network: PathBuf,
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let network = Arc::new(Network::load(&args.network)?);
    let topology = network.topology();
    let server = Server::http(&args.addr).map_err(|e| e as Box<dyn Error>)?;
    info!(
        "serving {} ({}) on http://{}",
        args.network.display(),
        topology,
        args.addr
    );

    // Requests only read the network.
    for request in server.incoming_requests() {
        let network = network.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, &network);
        });
    }
    Ok(())
}
