//! Binary entrypoint that launches the MHI relay server.

use std::process::ExitCode;

use mhi_relay::start_relay;

/// Start the relay: load configuration and knowledge, then serve HTTP.
fn main() -> ExitCode {
    start_relay::run()
}
