//! [`FakeEngine`]: a scripted, in-process [`TransferEngine`].

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use offsite_engine::{
    AgeWindow, Error, ExitOutcome, ListEntry, OutputLine, Result, TransferEngine,
};
use tokio::sync::mpsc::UnboundedSender;

/// One recorded call into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Obscure(String),
    Sync { src: String, dst: String },
    List { remote: String, window: Option<AgeWindow> },
    Read(String),
}

#[derive(Debug, Clone)]
struct ScriptedSync {
    lines: Vec<OutputLine>,
    outcome: ExitOutcome,
}

#[derive(Debug, Default)]
struct State {
    syncs: HashMap<(String, String), ScriptedSync>,
    listings: HashMap<String, std::result::Result<Vec<ListEntry>, String>>,
    reads: HashMap<String, std::result::Result<u64, String>>,
    calls: Vec<EngineCall>,
}

/// Engine double with per-address scripted results.
///
/// Unscripted syncs succeed silently, unscripted listings are empty, and
/// unscripted reads fail as if the object were missing. `obscure` prefixes
/// the secret with `obscured:`.
///
/// # Example
///
/// ```rust,no_run
/// use offsite_engine::OutputLine;
/// use offsite_test_utils::engine::FakeEngine;
///
/// let engine = FakeEngine::new()
///     .with_sync("nas:photos", "b2:backup", vec![OutputLine::stderr("boom")], 1)
///     .with_read("b2:backup/a.jpg", 512);
/// ```
#[derive(Debug, Default)]
pub struct FakeEngine {
    state: Mutex<State>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the lines and exit code for a sync of `src` to `dst`.
    pub fn with_sync(mut self, src: &str, dst: &str, lines: Vec<OutputLine>, code: i32) -> Self {
        self.state_mut().syncs.insert(
            (src.to_string(), dst.to_string()),
            ScriptedSync {
                lines,
                outcome: ExitOutcome { code: Some(code) },
            },
        );
        self
    }

    pub fn with_listing(mut self, remote: &str, entries: Vec<ListEntry>) -> Self {
        self.state_mut()
            .listings
            .insert(remote.to_string(), Ok(entries));
        self
    }

    pub fn with_listing_error(mut self, remote: &str, message: &str) -> Self {
        self.state_mut()
            .listings
            .insert(remote.to_string(), Err(message.to_string()));
        self
    }

    pub fn with_read(mut self, path: &str, bytes: u64) -> Self {
        self.state_mut().reads.insert(path.to_string(), Ok(bytes));
        self
    }

    pub fn with_read_error(mut self, path: &str, message: &str) -> Self {
        self.state_mut()
            .reads
            .insert(path.to_string(), Err(message.to_string()));
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Paths passed to `read_head`, in order.
    pub fn reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::Read(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    fn state_mut(&mut self) -> &mut State {
        self.state.get_mut().unwrap()
    }

    fn record(&self, call: EngineCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn failure(subcommand: &str, message: &str) -> Error {
    Error::CommandFailed {
        command: format!("fake {}", subcommand),
        code: 1,
        output: message.to_string(),
    }
}

#[async_trait]
impl TransferEngine for FakeEngine {
    async fn obscure(&self, secret: &str) -> Result<String> {
        self.record(EngineCall::Obscure(secret.to_string()));
        Ok(format!("obscured:{}", secret))
    }

    async fn sync(
        &self,
        src: &str,
        dst: &str,
        lines: UnboundedSender<OutputLine>,
    ) -> Result<ExitOutcome> {
        self.record(EngineCall::Sync {
            src: src.to_string(),
            dst: dst.to_string(),
        });
        let scripted = self
            .state
            .lock()
            .unwrap()
            .syncs
            .get(&(src.to_string(), dst.to_string()))
            .cloned();

        let Some(scripted) = scripted else {
            return Ok(ExitOutcome::success());
        };
        for line in scripted.lines {
            let _ = lines.send(line);
        }
        Ok(scripted.outcome)
    }

    async fn list_files(&self, remote: &str, window: Option<AgeWindow>) -> Result<Vec<ListEntry>> {
        self.record(EngineCall::List {
            remote: remote.to_string(),
            window,
        });
        match self.state.lock().unwrap().listings.get(remote) {
            Some(Ok(entries)) => Ok(entries.clone()),
            Some(Err(message)) => Err(failure("lsjson", message)),
            None => Ok(Vec::new()),
        }
    }

    async fn read_head(&self, path: &str) -> Result<u64> {
        self.record(EngineCall::Read(path.to_string()));
        match self.state.lock().unwrap().reads.get(path) {
            Some(Ok(bytes)) => Ok(*bytes),
            Some(Err(message)) => Err(failure("cat", message)),
            None => Err(failure("cat", "object not found")),
        }
    }
}

/// A listing entry `age` old at `now`.
pub fn list_entry(path: &str, size: i64, age: chrono::Duration, now: DateTime<Utc>) -> ListEntry {
    ListEntry {
        path: path.to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        size,
        mod_time: Some((now - age).to_rfc3339()),
        is_dir: false,
    }
}
