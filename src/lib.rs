// Library root
// -----------
// This crate exposes a small library surface for the importer. The binary
// (`main.rs`) parses flags and hands them to `ui::run`.
//
// Module responsibilities:
// - `records`: reads the guest-user CSV into `GuestUserRecord`s.
// - `xml_payload` / `json_payload`: turn records into ERS request bodies,
//   one bulk XML document or one JSON document per guest.
// - `api`: the blocking HTTP client behind the `Transport` trait.
// - `submit`: sends payloads and reports success/failure per request.
// - `config`: command-line flags and the per-run `SessionConfig`.
// - `ui`: interactive prompts and the end-to-end run.
//
// Both submission modes share the same reader and record type, so the
// payload builders can be tested without a terminal or a live ISE node.
pub mod api;
pub mod config;
pub mod error;
pub mod json_payload;
pub mod records;
pub mod submit;
pub mod ui;
pub mod xml_payload;

pub use error::ImportError;
pub use records::{read_guest_users, GuestUserRecord};
