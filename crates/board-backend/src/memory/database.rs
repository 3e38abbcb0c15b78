//! In-memory realtime database.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use ulid::{Generator, Ulid};

use crate::traits::{Database, ListenEvent, Listener, ListenerId};
use crate::value::{child, overlaps, segments, ServerValue};
use crate::{BackendError, BackendResult};

/// Database operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbOp {
    Push,
    Set,
    Update,
    Remove,
    Get,
    Listen,
}

struct ListenerEntry {
    path: String,
    sender: mpsc::UnboundedSender<ListenEvent>,
}

struct DbState {
    root: Value,
    listeners: BTreeMap<ListenerId, ListenerEntry>,
    next_listener: u64,
    last_timestamp: i64,
    keys: Generator,
    failures: HashMap<DbOp, VecDeque<BackendError>>,
    writes: usize,
    reads: usize,
    latency: Duration,
}

impl DbState {
    fn new() -> Self {
        Self {
            root: Value::Null,
            listeners: BTreeMap::new(),
            next_listener: 1,
            last_timestamp: 0,
            keys: Generator::new(),
            failures: HashMap::new(),
            writes: 0,
            reads: 0,
            latency: Duration::ZERO,
        }
    }

    fn take_failure(&mut self, op: DbOp) -> Option<BackendError> {
        self.failures.get_mut(&op).and_then(VecDeque::pop_front)
    }

    /// Server clock in milliseconds, strictly increasing per write.
    fn server_now(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let ts = now.max(self.last_timestamp + 1);
        self.last_timestamp = ts;
        ts
    }

    fn next_key(&mut self) -> String {
        // The generator only fails when a millisecond's random space is exhausted.
        self.keys
            .generate()
            .unwrap_or_else(|_| Ulid::new())
            .to_string()
    }

    fn read(&self, path: &str) -> Option<Value> {
        let mut node = &self.root;
        for seg in segments(path) {
            node = node.as_object()?.get(seg)?;
        }
        if node.is_null() {
            None
        } else {
            Some(node.clone())
        }
    }

    /// Applies a batch of `(path, value)` writes and notifies every listener
    /// whose value changed.
    fn apply(&mut self, writes: Vec<(String, Value)>) {
        let touched: Vec<ListenerId> = self
            .listeners
            .iter()
            .filter(|(_, entry)| writes.iter().any(|(path, _)| overlaps(&entry.path, path)))
            .map(|(id, _)| *id)
            .collect();
        let before: Vec<Option<Value>> = touched
            .iter()
            .map(|id| self.read(&self.listeners[id].path))
            .collect();

        for (path, value) in writes {
            let segs: Vec<&str> = segments(&path).collect();
            match normalize(value) {
                Value::Null => remove_at(&mut self.root, &segs),
                value => set_at(&mut self.root, &segs, value),
            }
        }
        self.writes += 1;

        for (id, old) in touched.into_iter().zip(before) {
            let entry = &self.listeners[&id];
            let new = self.read(&entry.path);
            if new != old {
                trace!(listener = %id, path = %entry.path, "Delivering snapshot");
                let _ = entry
                    .sender
                    .send(ListenEvent::Snapshot(new.unwrap_or(Value::Null)));
            }
        }
    }
}

/// Replaces server-timestamp sentinels with `now`.
fn resolve(value: Value, now: i64) -> Value {
    if ServerValue::is_timestamp(&value) {
        return Value::from(now);
    }
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, resolve(v, now)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| resolve(v, now)).collect()),
        other => other,
    }
}

/// Drops null fields and empty objects; the tree never stores either.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !v.is_null())
                .collect();
            if map.is_empty() {
                Value::Null
            } else {
                Value::Object(map)
            }
        }
        other => other,
    }
}

fn set_at(node: &mut Value, segs: &[&str], value: Value) {
    let Some((first, rest)) = segs.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Some(obj) = node.as_object_mut() {
        let entry = obj.entry(first.to_string()).or_insert(Value::Null);
        set_at(entry, rest, value);
    }
}

fn remove_at(node: &mut Value, segs: &[&str]) {
    let Some((first, rest)) = segs.split_first() else {
        *node = Value::Null;
        return;
    };
    let Some(obj) = node.as_object_mut() else {
        return;
    };
    if rest.is_empty() {
        obj.remove(*first);
    } else if let Some(child) = obj.get_mut(*first) {
        remove_at(child, rest);
        if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
            obj.remove(*first);
        }
    }
    if obj.is_empty() {
        *node = Value::Null;
    }
}

/// A realtime database held entirely in memory.
///
/// Listener bookkeeping mirrors a hosted backend: a listener stays attached
/// (and counted) until it is detached, even if its receiver was dropped.
#[derive(Clone)]
pub struct MemoryDatabase {
    state: Arc<Mutex<DbState>>,
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryDatabase")
            .field("listeners", &state.listeners.len())
            .field("writes", &state.writes)
            .finish()
    }
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DbState::new())),
        }
    }

    /// Makes the next call of `op` fail with `err`. Failures queue up.
    pub fn fail_next(&self, op: DbOp, err: BackendError) {
        self.state
            .lock()
            .failures
            .entry(op)
            .or_default()
            .push_back(err);
    }

    /// Delays every operation by `latency` before it is applied.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// Cancels every listener on or below `path` with `err` and detaches it.
    pub fn cancel_listeners(&self, path: &str, err: BackendError) {
        let mut state = self.state.lock();
        let cancelled: Vec<ListenerId> = state
            .listeners
            .iter()
            .filter(|(_, entry)| overlaps(&entry.path, path))
            .map(|(id, _)| *id)
            .collect();
        for id in cancelled {
            if let Some(entry) = state.listeners.remove(&id) {
                let _ = entry.sender.send(ListenEvent::Cancelled(err.clone()));
                debug!(listener = %id, path = %entry.path, "Listener cancelled");
            }
        }
    }

    /// Number of attached listeners on exactly `path`.
    pub fn listener_count(&self, path: &str) -> usize {
        let wanted: Vec<&str> = segments(path).collect();
        self.state
            .lock()
            .listeners
            .values()
            .filter(|entry| segments(&entry.path).eq(wanted.iter().copied()))
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Number of successful writes applied so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Number of successful one-shot reads so far.
    pub fn read_count(&self) -> usize {
        self.state.lock().reads
    }

    /// Reads a value without counting it as a client read.
    pub fn peek(&self, path: &str) -> Option<Value> {
        self.state.lock().read(path)
    }

    /// Takes the queued failure for `op`, then waits out the configured latency.
    async fn begin(&self, op: DbOp) -> BackendResult<()> {
        let (failure, latency) = {
            let mut state = self.state.lock();
            (state.take_failure(op), state.latency)
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(err) => {
                debug!(?op, error = %err, "Injected failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn push(&self, path: &str, value: Value) -> BackendResult<String> {
        self.begin(DbOp::Push).await?;
        let mut state = self.state.lock();
        let key = state.next_key();
        let now = state.server_now();
        state.apply(vec![(child(path, &key), resolve(value, now))]);
        Ok(key)
    }

    async fn set(&self, path: &str, value: Value) -> BackendResult<()> {
        self.begin(DbOp::Set).await?;
        let mut state = self.state.lock();
        let now = state.server_now();
        state.apply(vec![(path.to_string(), resolve(value, now))]);
        Ok(())
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> BackendResult<()> {
        self.begin(DbOp::Update).await?;
        if fields.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock();
        let now = state.server_now();
        let writes = fields
            .into_iter()
            .map(|(k, v)| (child(path, &k), resolve(v, now)))
            .collect();
        state.apply(writes);
        Ok(())
    }

    async fn remove(&self, path: &str) -> BackendResult<()> {
        self.begin(DbOp::Remove).await?;
        self.state
            .lock()
            .apply(vec![(path.to_string(), Value::Null)]);
        Ok(())
    }

    async fn get(&self, path: &str) -> BackendResult<Option<Value>> {
        self.begin(DbOp::Get).await?;
        let mut state = self.state.lock();
        state.reads += 1;
        Ok(state.read(path))
    }

    async fn listen(&self, path: &str) -> BackendResult<Listener> {
        self.begin(DbOp::Listen).await?;
        let (sender, events) = mpsc::unbounded_channel();
        let mut state = self.state.lock();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;

        let initial = state.read(path).unwrap_or(Value::Null);
        let _ = sender.send(ListenEvent::Snapshot(initial));
        state.listeners.insert(
            id,
            ListenerEntry {
                path: path.to_string(),
                sender,
            },
        );
        debug!(listener = %id, path, "Listener attached");
        Ok(Listener { id, events })
    }

    fn detach(&self, id: ListenerId) {
        if let Some(entry) = self.state.lock().listeners.remove(&id) {
            debug!(listener = %id, path = %entry.path, "Listener detached");
        }
    }
}
