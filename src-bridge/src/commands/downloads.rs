use crate::channel::{MethodCall, MethodResult};
use crate::state::BridgeState;

pub const SAVE_TO_DOWNLOADS: &str = "saveToDownloads";

/// `saveToDownloads(bytes, fileName)` -> saved path
pub fn save_to_downloads(state: &BridgeState, call: &MethodCall) -> MethodResult {
    let bytes: Option<Vec<u8>> = call.argument("bytes");
    let file_name: Option<String> = call.argument("fileName");

    match state.saver().save(bytes.as_deref(), file_name.as_deref()) {
        Ok(saved) => MethodResult::success(saved.path),
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "saveToDownloads failed");
            MethodResult::error(e.code(), e.to_string())
        }
    }
}
