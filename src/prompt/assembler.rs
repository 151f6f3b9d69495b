//! Working set and token accounting
//!
//! The assembler owns the files and the instruction of one session. Editing
//! a file writes the new content immediately and schedules a single debounced
//! recount for that file. Only one recount is ever pending: a later edit,
//! to any file, supersedes it. Pending recounts are keyed by [`EntryId`], so
//! deleting other entries can never redirect them to the wrong file.
//!
//! Token counting never happens while the state lock is held. Work is
//! snapshotted under the lock, counted without it, and applied only if the
//! state has not moved on in the meantime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::template;
use super::{EntryId, FileEntry, SourceFile, DEFAULT_INSTRUCTION};
use crate::common::budget::Budget;
use crate::error::{AssemblerError, Result};
use crate::models::ModelSpec;
use crate::tokens::TokenCounter;

/// Delay between the last edit and the recount of the edited file
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct PromptAssembler {
    debounce: Duration,
    state: Arc<Mutex<AssemblyState>>,
}

struct AssemblyState {
    counter: Arc<dyn TokenCounter>,
    template_tokens: usize,
    entries: Vec<FileEntry>,
    instruction: String,
    next_id: u64,
    /// Bumped by every edit; a pending recount only applies to its own
    generation: u64,
    /// Bumped whenever the counter is swapped
    counter_epoch: u64,
    pending: Option<PendingRecount>,
}

struct PendingRecount {
    entry: EntryId,
    generation: u64,
    task: JoinHandle<()>,
}

impl PendingRecount {
    fn cancel(self) {
        self.task.abort();
    }
}

impl AssemblyState {
    fn allocate_id(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        id
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            log::debug!("Cancelling pending recount for entry {:?}", pending.entry);
            pending.cancel();
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(AssemblerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    fn counter_snapshot(&self) -> (Arc<dyn TokenCounter>, u64) {
        (Arc::clone(&self.counter), self.counter_epoch)
    }

    fn is_pending(&self, generation: u64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation)
    }
}

fn lock(state: &Mutex<AssemblyState>) -> MutexGuard<'_, AssemblyState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn debounced_recount(state: Arc<Mutex<AssemblyState>>, delay: Duration, generation: u64) {
    tokio::time::sleep(delay).await;

    let (id, content, counter) = {
        let state = lock(&state);
        // Superseded after the timer already fired
        let Some(pending) = state.pending.as_ref().filter(|p| p.generation == generation) else {
            return;
        };
        let Some(entry) = state.entries.iter().find(|e| e.id == pending.entry) else {
            log::debug!("Entry {:?} was removed before its recount", pending.entry);
            return;
        };
        (entry.id, entry.content.clone(), Arc::clone(&state.counter))
    };

    let token_used = counter.count(&content);

    let mut state = lock(&state);
    // An edit, delete, reload or counter swap while counting drops this result
    if !state.is_pending(generation) {
        return;
    }
    state.pending = None;
    match state.entries.iter_mut().find(|e| e.id == id) {
        Some(entry) => {
            entry.token_used = token_used;
            log::debug!("Recounted {}: {} tokens", entry.path, token_used);
        }
        None => log::debug!("Entry {id:?} was removed before its recount"),
    }
}

impl PromptAssembler {
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        let template_tokens = counter.count(&template::skeleton());

        Self {
            debounce: DEFAULT_DEBOUNCE,
            state: Arc::new(Mutex::new(AssemblyState {
                counter,
                template_tokens,
                entries: Vec::new(),
                instruction: DEFAULT_INSTRUCTION.to_string(),
                next_id: 0,
                generation: 0,
                counter_epoch: 0,
                pending: None,
            })),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Replace the working set with a freshly loaded file list.
    ///
    /// Every entry is counted synchronously and starts collapsed.
    pub fn initialize(&self, files: Vec<SourceFile>) {
        let (counter, epoch) = lock(&self.state).counter_snapshot();
        let counts: Vec<usize> = files.iter().map(|f| counter.count(&f.content)).collect();

        let mut state = lock(&self.state);
        state.cancel_pending();

        let recount = state.counter_epoch != epoch;
        let counter = Arc::clone(&state.counter);
        let mut entries = Vec::with_capacity(files.len());
        for (file, counted) in files.into_iter().zip(counts) {
            let token_used = if recount {
                counter.count(&file.content)
            } else {
                counted
            };
            entries.push(FileEntry {
                id: state.allocate_id(),
                path: file.path,
                name: file.name,
                content: file.content,
                is_expanded: false,
                token_used,
            });
        }
        state.entries = entries;

        log::info!("Working set initialized with {} files", state.entries.len());
    }

    /// Write new content for the file at `index` and schedule its recount.
    ///
    /// The content is visible to readers right away; `token_used` follows
    /// after the debounce delay. Outside a tokio runtime the recount happens
    /// immediately.
    ///
    /// Returns the entry as it stands after the write, before any recount.
    pub fn edit_content(&self, index: usize, content: impl Into<String>) -> Result<FileEntry> {
        let content = content.into();
        let runtime = tokio::runtime::Handle::try_current().ok();

        // Nothing to debounce on, so count up front
        let counted = match runtime {
            Some(_) => None,
            None => {
                let (counter, epoch) = lock(&self.state).counter_snapshot();
                Some((counter.count(&content), epoch))
            }
        };

        let mut state = lock(&self.state);
        state.check_index(index)?;

        state.cancel_pending();
        state.generation += 1;
        let generation = state.generation;
        let counter = Arc::clone(&state.counter);
        let epoch = state.counter_epoch;

        let entry = &mut state.entries[index];
        entry.content = content;
        let id = entry.id;

        if let Some((token_used, counted_epoch)) = counted {
            entry.token_used = if counted_epoch == epoch {
                token_used
            } else {
                counter.count(&entry.content)
            };
        }
        let snapshot = entry.clone();

        match runtime {
            Some(runtime) => {
                let task = runtime.spawn(debounced_recount(
                    Arc::clone(&self.state),
                    self.debounce,
                    generation,
                ));
                state.pending = Some(PendingRecount {
                    entry: id,
                    generation,
                    task,
                });
                log::debug!("Scheduled recount for entry {id:?} in {:?}", self.debounce);
            }
            None => {
                log::debug!("Recounted {}: {} tokens", snapshot.path, snapshot.token_used);
            }
        }

        Ok(snapshot)
    }

    /// Remove the file at `index`; later files shift down by one.
    pub fn delete_file(&self, index: usize) -> Result<FileEntry> {
        let mut state = lock(&self.state);
        state.check_index(index)?;

        let removed = state.entries.remove(index);
        if state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.entry == removed.id)
        {
            state.cancel_pending();
        }

        log::info!("Removed {} from working set", removed.path);
        Ok(removed)
    }

    /// Flip the expanded flag of the file at `index` and return the new value.
    pub fn toggle_expand(&self, index: usize) -> Result<bool> {
        let mut state = lock(&self.state);
        state.check_index(index)?;

        let entry = &mut state.entries[index];
        entry.is_expanded = !entry.is_expanded;
        Ok(entry.is_expanded)
    }

    pub fn set_instruction(&self, instruction: impl Into<String>) {
        lock(&self.state).instruction = instruction.into();
    }

    pub fn instruction(&self) -> String {
        lock(&self.state).instruction.clone()
    }

    pub fn instruction_tokens(&self) -> usize {
        let (counter, instruction) = {
            let state = lock(&self.state);
            (Arc::clone(&state.counter), state.instruction.clone())
        };
        counter.count(&instruction)
    }

    /// Tokens taken by the template scaffolding alone
    pub fn template_tokens(&self) -> usize {
        lock(&self.state).template_tokens
    }

    /// Swap the token counter (e.g. after switching model family).
    ///
    /// All entries and the template are recounted; any pending recount is
    /// dropped since every count is fresh afterwards.
    pub fn set_counter(&self, counter: Arc<dyn TokenCounter>) {
        let snapshot: Vec<(EntryId, String)> = lock(&self.state)
            .entries
            .iter()
            .map(|e| (e.id, e.content.clone()))
            .collect();

        let template_tokens = counter.count(&template::skeleton());
        let counts: HashMap<EntryId, (String, usize)> = snapshot
            .into_iter()
            .map(|(id, content)| {
                let tokens = counter.count(&content);
                (id, (content, tokens))
            })
            .collect();

        let mut state = lock(&self.state);
        state.cancel_pending();
        state.counter_epoch += 1;
        state.template_tokens = template_tokens;
        for entry in &mut state.entries {
            entry.token_used = match counts.get(&entry.id) {
                Some((content, tokens)) if *content == entry.content => *tokens,
                // Added or edited while counting
                _ => counter.count(&entry.content),
            };
        }
        state.counter = counter;
    }

    /// Snapshot of the working set in order
    pub fn entries(&self) -> Vec<FileEntry> {
        lock(&self.state).entries.clone()
    }

    pub fn entry(&self, index: usize) -> Result<FileEntry> {
        let state = lock(&self.state);
        state.check_index(index)?;
        Ok(state.entries[index].clone())
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).entries.is_empty()
    }

    pub fn has_pending_recount(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Current token usage against `model`.
    pub fn compute_budget(&self, model: &ModelSpec) -> Result<Budget> {
        let (files_tokens, template_tokens, instruction, counter) = {
            let state = lock(&self.state);
            (
                state.entries.iter().map(|e| e.token_used).sum(),
                state.template_tokens,
                state.instruction.clone(),
                Arc::clone(&state.counter),
            )
        };
        let instruction_tokens = counter.count(&instruction);

        Budget::compute(model, files_tokens, instruction_tokens, template_tokens)
    }

    /// Serialize the working set and instruction into the final prompt.
    ///
    /// Does not look at the budget; gating is up to the caller.
    pub fn render_prompt(&self) -> String {
        let state = lock(&self.state);
        template::render(
            state
                .entries
                .iter()
                .map(|e| (e.path.as_str(), e.content.as_str())),
            &state.instruction,
        )
    }
}

impl Drop for PromptAssembler {
    fn drop(&mut self) {
        lock(&self.state).cancel_pending();
    }
}

impl fmt::Debug for PromptAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("PromptAssembler")
            .field("debounce", &self.debounce)
            .field("entries", &state.entries.len())
            .field("pending", &state.pending.as_ref().map(|p| p.entry))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::HeuristicCounter;

    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn assembler() -> PromptAssembler {
        PromptAssembler::new(Arc::new(HeuristicCounter))
    }

    fn files(specs: &[(&str, &str)]) -> Vec<SourceFile> {
        specs
            .iter()
            .map(|(path, content)| SourceFile::from_path(*path, *content))
            .collect()
    }

    #[test]
    fn initialize_counts_every_entry() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "abcd"), ("b.txt", "abcdefgh")]));

        let entries = asm.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].token_used, 1);
        assert_eq!(entries[1].token_used, 2);
        assert!(!entries[0].is_expanded);
        assert_ne!(entries[0].id, entries[1].id);
    }

    #[test]
    fn edit_without_runtime_recounts_immediately() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "abcd")]));
        let edited = asm.edit_content(0, "abcdefghijkl").unwrap();

        assert_eq!(edited.token_used, 3);
        assert_eq!(asm.entry(0).unwrap().token_used, 3);
        assert!(!asm.has_pending_recount());
    }

    #[tokio::test(start_paused = true)]
    async fn edit_returns_the_edited_entry() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "abcd"), ("b.txt", "efgh")]));

        let edited = asm.edit_content(1, "efghijklmnop").unwrap();
        // Another caller shifting the list must not change what was edited
        asm.delete_file(0).unwrap();

        assert_eq!(edited.path, "b.txt");
        assert_eq!(edited.content, "efghijklmnop");
        assert_eq!(edited.token_used, 1);
        assert!(asm.has_pending_recount());
    }

    #[test]
    fn set_counter_recounts_template_and_entries() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "one two three four five")]));

        asm.set_counter(Arc::new(WordCounter));

        assert_eq!(asm.entry(0).unwrap().token_used, 5);
        assert_eq!(
            asm.template_tokens(),
            template::skeleton().split_whitespace().count()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn counter_swap_drops_pending_recount() {
        let asm = assembler().with_debounce(Duration::from_millis(100));
        asm.initialize(files(&[("a.txt", "abcd")]));
        asm.edit_content(0, "one two three").unwrap();

        asm.set_counter(Arc::new(WordCounter));
        assert!(!asm.has_pending_recount());
        assert_eq!(asm.entry(0).unwrap().token_used, 3);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(asm.entry(0).unwrap().token_used, 3);
    }

    #[test]
    fn invalid_index_leaves_state_untouched() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "abcd")]));
        let before = asm.entries();

        assert_eq!(
            asm.edit_content(1, "x"),
            Err(AssemblerError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(asm.delete_file(5).is_err());
        assert!(asm.toggle_expand(1).is_err());
        assert_eq!(asm.entries(), before);
    }

    #[test]
    fn toggle_has_no_token_effect() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "abcd")]));
        let model = ModelSpec::new("test", 1_000);
        let before = asm.compute_budget(&model).unwrap();

        assert!(asm.toggle_expand(0).unwrap());
        assert!(!asm.toggle_expand(0).unwrap());
        assert_eq!(asm.compute_budget(&model).unwrap(), before);
    }

    #[test]
    fn ids_are_not_reused_after_reinitialize() {
        let asm = assembler();
        asm.initialize(files(&[("a.txt", "")]));
        let first = asm.entry(0).unwrap().id;
        asm.initialize(files(&[("a.txt", "")]));
        assert_ne!(asm.entry(0).unwrap().id, first);
    }
}
