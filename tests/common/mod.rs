#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use repo_prompt_mcp::models::ModelSpec;
use repo_prompt_mcp::prompt::SourceFile;
use repo_prompt_mcp::session::Session;
use repo_prompt_mcp::tokens::{HeuristicCounter, TokenCounter};

pub const DEBOUNCE: Duration = Duration::from_millis(500);

/// Build loader records from (path, content) pairs
pub fn files(specs: &[(&str, &str)]) -> Vec<SourceFile> {
    specs
        .iter()
        .map(|(path, content)| SourceFile::from_path(*path, *content))
        .collect()
}

/// Counter that remembers every text it was asked to count
#[derive(Default)]
pub struct RecordingCounter {
    seen: Mutex<Vec<String>>,
}

impl RecordingCounter {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

impl TokenCounter for RecordingCounter {
    fn count(&self, text: &str) -> usize {
        self.seen.lock().unwrap().push(text.to_string());
        HeuristicCounter.count(text)
    }
}

/// Session over the character heuristic so counts are easy to predict
pub fn test_session(max_tokens: u64, instruction: &str) -> Session {
    Session::with_counter(
        ModelSpec::new("test-model", max_tokens),
        Arc::new(HeuristicCounter),
        DEBOUNCE,
        instruction,
    )
}

/// Helper to extract text from CallToolResult
pub fn get_result_text(result: &repo_prompt_mcp::mcp_types::CallToolResult) -> String {
    // The CallToolResult has a content field which is a Vec<ContentBlock>
    // We serialize and deserialize to extract the text field
    if let Some(first_content) = result.content.first() {
        let json_str = serde_json::to_string(first_content).unwrap();
        let json_val: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        json_val["text"].as_str().unwrap().to_string()
    } else {
        panic!("No content in result");
    }
}

pub fn get_result_json(result: &repo_prompt_mcp::mcp_types::CallToolResult) -> serde_json::Value {
    serde_json::from_str(&get_result_text(result)).unwrap()
}
