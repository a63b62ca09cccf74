// Submitters: send prepared payloads through a `Transport` and report each
// outcome as a console line on `out`.

use crate::api::{ApiRequest, Transport};
use crate::json_payload::build_guest_user_json;
use crate::records::GuestUserRecord;
use anyhow::Result;
use crossterm::style::Stylize;
use std::io::{self, IsTerminal, Write};
use tracing::{info, warn};

const BULK_ACCEPTED: u16 = 202;
const CREATED: u16 = 201;

/// Success/failure coloring, only when stdout is a terminal so redirected
/// reports stay plain text.
fn paint(text: String, ok: bool, color: bool) -> String {
    match (color, ok) {
        (false, _) => text,
        (true, true) => text.green().to_string(),
        (true, false) => text.red().to_string(),
    }
}

fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Result of a bulk submission. `Rejected` carries the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    Accepted,
    Rejected(u16),
}

/// Tally of a per-record run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitSummary {
    pub created: usize,
    pub failed: usize,
}

/// PUT the bulk XML document once. Only the acceptance of the job is
/// checked; the asynchronous bulk job itself is not polled.
///
/// A transport error is returned to the caller and ends the run.
pub fn submit_bulk<T: Transport, W: Write>(
    transport: &T,
    xml: String,
    out: &mut W,
) -> Result<BulkOutcome> {
    let color = stdout_is_terminal();
    let response = transport.send(&ApiRequest::bulk_submit(xml))?;
    if response.status == BULK_ACCEPTED {
        info!(status = response.status, "bulk request accepted");
        writeln!(
            out,
            "{}",
            paint("Bulk guest users created successfully.".into(), true, color)
        )?;
        Ok(BulkOutcome::Accepted)
    } else {
        warn!(status = response.status, "bulk request rejected");
        writeln!(
            out,
            "{}",
            paint(
                format!(
                    "Failed to create bulk guest users. Status code: {}",
                    response.status
                ),
                false,
                color
            )
        )?;
        writeln!(out, "Response: {}", response.body)?;
        Ok(BulkOutcome::Rejected(response.status))
    }
}

/// POST one JSON document per user, strictly in order. A failed record,
/// whether rejected by ISE or lost in transport, is reported and the loop
/// moves on to the next one.
///
/// `on_progress` is called after each record so the UI can advance a bar.
pub fn submit_each<T: Transport, W: Write>(
    transport: &T,
    users: &[GuestUserRecord],
    portal_id: &str,
    out: &mut W,
    mut on_progress: impl FnMut(),
) -> Result<SubmitSummary> {
    let total = users.len();
    let color = stdout_is_terminal();
    let mut summary = SubmitSummary::default();

    for (idx, user) in users.iter().enumerate() {
        writeln!(
            out,
            "Creating guest user {}/{}: {}",
            idx + 1,
            total,
            user.user_name
        )?;

        let json = build_guest_user_json(user, portal_id)?;
        match transport.send(&ApiRequest::create_guest_user(json)) {
            Ok(response) if response.status == CREATED => {
                summary.created += 1;
                info!(user = %user.user_name, "guest user created");
                writeln!(
                    out,
                    "{}",
                    paint(
                        format!("Guest user '{}' created successfully.", user.user_name),
                        true,
                        color
                    )
                )?;
            }
            Ok(response) => {
                summary.failed += 1;
                warn!(user = %user.user_name, status = response.status, "guest user rejected");
                writeln!(
                    out,
                    "{}",
                    paint(
                        format!(
                            "Failed to create guest user '{}'. Status code: {}",
                            user.user_name, response.status
                        ),
                        false,
                        color
                    )
                )?;
                writeln!(out, "Response: {}", response.body)?;
            }
            Err(e) => {
                summary.failed += 1;
                warn!(user = %user.user_name, error = %e, "guest user request failed");
                writeln!(
                    out,
                    "{}",
                    paint(
                        format!("Failed to create guest user '{}': {:#}", user.user_name, e),
                        false,
                        color
                    )
                )?;
            }
        }
        on_progress();
    }

    writeln!(out, "{} created, {} failed", summary.created, summary.failed)?;
    Ok(summary)
}
