// UI layer: fills in the session with `dialoguer` prompts and drives one
// import run. The functions are small and synchronous to keep the flow
// easy to follow: collect -> read CSV -> build payload(s) -> submit.

use crate::api::ApiClient;
use crate::config::{Cli, Mode, SessionConfig};
use crate::json_payload::build_guest_user_json;
use crate::records::{read_guest_users, GuestUserRecord};
use crate::submit::{submit_bulk, submit_each, BulkOutcome};
use crate::xml_payload::build_bulk_xml;
use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Use the flag value when present, otherwise ask for it.
fn flag_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v.trim().to_string()),
        None => {
            let v: String = Input::new().with_prompt(prompt).interact_text()?;
            Ok(v.trim().to_string())
        }
    }
}

/// Build the session from command-line flags, prompting for whatever is
/// missing. Host and credentials are skipped on a dry run since nothing is
/// sent.
pub fn collect_session(cli: &Cli) -> Result<SessionConfig> {
    let (host, username, password) = if cli.dry_run {
        (
            cli.host.clone().unwrap_or_default(),
            cli.username.clone().unwrap_or_default(),
            String::new(),
        )
    } else {
        let host = flag_or_prompt(
            cli.host.clone(),
            "Enter Cisco ISE Host (e.g., https://ise-hostname-or-ip)",
        )?;
        let username = flag_or_prompt(cli.username.clone(), "Enter API Username")?;
        // `Password` hides input in terminal for passwords.
        let password = match &cli.password {
            Some(p) => p.trim().to_string(),
            None => Password::new()
                .with_prompt("Enter API Password")
                .interact()?
                .trim()
                .to_string(),
        };
        (host, username, password)
    };

    let csv_path = match &cli.csv {
        Some(path) => path.clone(),
        None => PathBuf::from(flag_or_prompt(
            None,
            "Enter path to CSV file with guest users",
        )?),
    };
    let portal_id = flag_or_prompt(
        cli.portal_id.clone(),
        "Enter portal ID for ISE Sponsor Portal",
    )?;

    Ok(SessionConfig {
        host,
        username,
        password,
        csv_path,
        portal_id,
        insecure: cli.insecure,
        timeout: cli.timeout.map(Duration::from_secs),
    })
}

/// Run one import. Input errors surface before any request is made.
pub fn run(cli: Cli) -> Result<()> {
    let session = collect_session(&cli)?;
    info!(mode = ?cli.mode, dry_run = cli.dry_run, "starting import");

    let users = read_guest_users(&session.csv_path).with_context(|| {
        format!(
            "Failed to read guest users from {}",
            session.csv_path.display()
        )
    })?;
    info!(count = users.len(), "loaded guest users");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dry_run {
        return print_payloads(cli.mode, &users, &session.portal_id, &mut out);
    }

    let client = ApiClient::new(session.clone())?;
    match cli.mode {
        Mode::Bulk => {
            let xml = build_bulk_xml(&users, &session.portal_id)?;
            // indicatif's spinner runs while the single PUT is in flight.
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            spinner.set_message(format!("Submitting {} guest users...", users.len()));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let mut report = Vec::new();
            let outcome = submit_bulk(&client, xml, &mut report);
            spinner.finish_and_clear();
            out.write_all(&report)?;
            if outcome? == BulkOutcome::Accepted {
                info!("bulk job status is not polled; check the ISE bulk request status page");
            }
        }
        Mode::Single => {
            let bar = ProgressBar::new(users.len() as u64);
            bar.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len}")?);
            let mut out = bar_writer(&bar, &mut out);
            submit_each(&client, &users, &session.portal_id, &mut out, || bar.inc(1))?;
            bar.finish_and_clear();
        }
    }
    Ok(())
}

/// Write the payload(s) that would have been sent.
fn print_payloads<W: Write>(
    mode: Mode,
    users: &[GuestUserRecord],
    portal_id: &str,
    out: &mut W,
) -> Result<()> {
    match mode {
        Mode::Bulk => {
            writeln!(out, "Generated XML Payload:")?;
            write!(out, "{}", build_bulk_xml(users, portal_id)?)?;
        }
        Mode::Single => {
            for (idx, user) in users.iter().enumerate() {
                writeln!(out, "Guest user {}/{}: {}", idx + 1, users.len(), user.user_name)?;
                writeln!(out, "{}", build_guest_user_json(user, portal_id)?)?;
            }
        }
    }
    Ok(())
}

/// Report lines go to `inner` (stdout) with the progress bar cleared
/// while each complete line is written.
struct BarWriter<'a, W: Write> {
    bar: &'a ProgressBar,
    inner: &'a mut W,
    line: Vec<u8>,
}

fn bar_writer<'a, W: Write>(bar: &'a ProgressBar, inner: &'a mut W) -> BarWriter<'a, W> {
    BarWriter {
        bar,
        inner,
        line: Vec::new(),
    }
}

impl<W: Write> Write for BarWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.line.extend_from_slice(buf);
        while let Some(pos) = self.line.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.line.drain(..=pos).collect();
            let inner = &mut *self.inner;
            self.bar.suspend(|| {
                inner.write_all(&line)?;
                inner.flush()
            })?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
