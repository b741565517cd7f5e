// Library root
// -----------
// This crate exposes a small library surface for the AlphaFold DB CLI. The
// binary (`main.rs`) wires logging and settings, then hands over to `ui`.
//
// Module responsibilities:
// - `config`: Settings read from the environment (base URL, timeout,
//   retries, output directory).
// - `api`: HTTP transport, retry policy and the two fetch operations.
// - `model`: Typed model entries and the summary records derived from them.
// - `output`: Output file naming and pretty JSON writing.
// - `process` / `analysis`: Build summary records and persist them.
// - `download`: Retrieve structure files referenced by model entries.
// - `dispatch`: Run one menu action from an explicit `RunConfig`.
// - `ui`: Terminal prompts that collect a `RunConfig`.
pub mod analysis;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod model;
pub mod output;
pub mod process;
pub mod ui;
