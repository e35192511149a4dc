//! Stock App downloads bridge
//!
//! Host side of the `com.stock_app/downloads` method channel. The
//! application layer sends method calls; every outcome, including failure,
//! goes back as a [`MethodResult`].

pub mod channel;
pub mod commands;
mod state;

use std::io::{self, BufRead, Write};

pub use channel::{MethodCall, MethodResult, CHANNEL};
pub use state::BridgeState;

/// Dispatch one call.
pub fn handle_method_call(state: &BridgeState, call: &MethodCall) -> MethodResult {
    match call.method.as_str() {
        commands::downloads::SAVE_TO_DOWNLOADS => commands::downloads::save_to_downloads(state, call),
        other => {
            tracing::debug!(method = other, "Method not implemented");
            MethodResult::NotImplemented
        }
    }
}

/// Serve JSON-lines method calls from `reader`, one result line per call.
///
/// Malformed lines are answered with an `INVALID_ARGUMENT` error; only I/O
/// failures on the streams themselves end the loop.
pub fn serve<R: BufRead, W: Write>(state: &BridgeState, reader: R, mut writer: W) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<MethodCall>(&line) {
            Ok(call) => handle_method_call(state, &call),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed method call");
                MethodResult::error(
                    stock_core::INVALID_ARGUMENT,
                    format!("Malformed method call: {e}"),
                )
            }
        };

        serde_json::to_writer(&mut writer, &result)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    Ok(())
}
