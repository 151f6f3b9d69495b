//! Load Files Tool
//!
//! Starts a new working set, either from inline file records handed over by
//! an external loader or from a local directory.

use std::path::Path;

use eyre::{Result, WrapErr};
use serde_json::{json, Value};

use super::Session;
use crate::loader::{self, LoadOptions, DEFAULT_MAX_FILE_BYTES};
use crate::mcp_types::{CallToolResult, CallToolResultExt};
use crate::prompt::SourceFile;

/// Execute the load_files tool
///
/// # Arguments
/// * `files` - array of `{path, name?, content}` records, or
/// * `path` - local file or directory to load (with optional glob `pattern`
///   and `max_file_bytes`)
///
/// Exactly one of `files` and `path` must be given. Replaces the working set
/// and returns the per-file token counts.
pub fn execute(session: &Session, arguments: &Value) -> Result<CallToolResult> {
    let files = match (arguments.get("files"), arguments["path"].as_str()) {
        (Some(files), None) if !files.is_null() => parse_records(files)?,
        (None, Some(path)) | (Some(Value::Null), Some(path)) => {
            let options = LoadOptions {
                pattern: arguments["pattern"].as_str().map(str::to_string),
                max_file_bytes: arguments["max_file_bytes"]
                    .as_u64()
                    .unwrap_or(DEFAULT_MAX_FILE_BYTES),
            };
            loader::load_path(Path::new(path), &options)?
        }
        _ => eyre::bail!("Provide exactly one of 'files' or 'path'"),
    };

    log::info!("Loading {} files into the working set", files.len());

    let assembler = session.assembler();
    assembler.initialize(files);

    let entries = assembler.entries();
    let total: usize = entries.iter().map(|e| e.token_used).sum();
    let response = json!({
        "loaded": entries.len(),
        "files_token_used": total,
        "files": entries
            .iter()
            .enumerate()
            .map(|(index, e)| json!({
                "index": index,
                "path": e.path,
                "token_used": e.token_used,
            }))
            .collect::<Vec<_>>(),
    });

    Ok(CallToolResult::success(response.to_string()))
}

fn parse_records(files: &Value) -> Result<Vec<SourceFile>> {
    let records = files
        .as_array()
        .ok_or_else(|| eyre::eyre!("'files' must be an array"))?;

    records
        .iter()
        .enumerate()
        .map(|(i, record)| -> Result<SourceFile> {
            let path = record["path"]
                .as_str()
                .ok_or_else(|| eyre::eyre!("File record {i} is missing 'path'"))?;
            let content = record["content"]
                .as_str()
                .ok_or_else(|| eyre::eyre!("File record {i} is missing 'content'"))?;

            let mut file = SourceFile::from_path(path, content);
            if let Some(name) = record["name"].as_str() {
                file.name = name.to_string();
            }
            Ok(file)
        })
        .collect::<Result<Vec<_>>>()
        .wrap_err("Invalid 'files' argument")
}
