use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;

use super::command::Command;
use crate::api::{ApiResponse, FETCH_FAILED, ListingService};
use crate::errors::ApiError;
use crate::filter::FilterOptions;
use crate::store::MemoryStore;

fn parse_options(filter_json: Option<&str>) -> Result<FilterOptions, ApiError> {
    filter_json.map_or_else(|| Ok(FilterOptions::default()), FilterOptions::from_json_str)
}

// Same envelope the service gives a rejected list body.
fn rejected_options(e: &ApiError) -> ApiResponse {
    log::warn!("rejected filter options: {e}");
    ApiResponse::failure(e, FETCH_FAILED)
}

fn emit<W: Write>(out: &mut W, resp: &ApiResponse) -> std::io::Result<bool> {
    writeln!(out, "{}", resp.to_json())?;
    Ok(resp.success)
}

/// Execute one command, writing its output to `out`. Returns whether the
/// request succeeded.
///
/// # Errors
/// Returns an error only when writing output or saving the data file fails.
pub fn run<W: Write>(
    service: &ListingService<MemoryStore>,
    cmd: Command,
    data_file: Option<&Path>,
    out: &mut W,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        Command::List { filter_json } => {
            let resp = match parse_options(filter_json.as_deref()) {
                Ok(opts) => service.list(&opts),
                Err(e) => rejected_options(&e),
            };
            Ok(emit(out, &resp)?)
        }
        Command::Stats => Ok(emit(out, &service.statistics())?),
        Command::Get { id } => Ok(emit(out, &service.get(&id))?),
        Command::SetState { id, state, token, save } => {
            let body = json!({ "stateMaloi": Value::String(state) });
            let header = format!("Bearer {token}");
            let resp = service.update_state(&id, &body, Some(&header));
            if resp.success && save {
                let path = data_file.ok_or("--save needs a data file")?;
                service.store().save(path)?;
            }
            Ok(emit(out, &resp)?)
        }
        Command::Explain { filter_json } => {
            let resp = match parse_options(filter_json.as_deref()) {
                Ok(opts) => service.explain(&opts),
                Err(e) => rejected_options(&e),
            };
            Ok(emit(out, &resp)?)
        }
        Command::Health => Ok(emit(out, &service.health())?),
        Command::Metrics => {
            write!(out, "{}", crate::telemetry::metrics_text())?;
            Ok(true)
        }
        Command::CheckOrigin { origin } => {
            let allowed = service.origin_allowed(Some(&origin));
            writeln!(out, "{}", json!({"origin": origin, "allowed": allowed}))?;
            Ok(allowed)
        }
    }
}
