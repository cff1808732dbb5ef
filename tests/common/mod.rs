//! Common test utilities for hive-adapter integration tests.
//!
//! The tests drive the full adapter against [`FakeHive`], a scripted
//! in-memory driver. Statements are matched by their exact text:
//!
//! - `show databases` answers with the registered databases
//! - `show tables in `schema`` answers with the tables registered for it
//! - `show create table ...` and `describe ...` answer with the DDL lines
//!   and columns registered by [`FakeHive::with_table`]
//! - anything else finishes with an empty result
//!
//! Every driver call is appended to a shared call log so tests can check
//! what was sent and in which order.

#![allow(dead_code)]

use async_trait::async_trait;
use hive_adapter::error::TransportError;
use hive_adapter::transport::{
    HiveDriver, HiveSession, OperationStatus, PollResponse, ResultData, SessionParams,
};
use hive_adapter::{AdapterConfig, Credentials, HiveAdapter};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Host used by [`credentials`].
pub const DEFAULT_HOST: &str = "hive.test";

/// Credentials pointing at the fake server.
pub fn credentials() -> Credentials {
    Credentials::from_json(&json!({ "host": DEFAULT_HOST, "schema": "default" }))
        .expect("valid credentials")
}

/// Adapter over `hive` with the default configuration.
pub fn adapter(hive: &FakeHive) -> HiveAdapter {
    adapter_with_config(hive, AdapterConfig::default())
}

/// Adapter over `hive` with a custom configuration.
pub fn adapter_with_config(hive: &FakeHive, config: AdapterConfig) -> HiveAdapter {
    HiveAdapter::new(Arc::new(hive.clone()), credentials(), config)
}

#[derive(Clone)]
enum Scripted {
    Rows(ResultData),
    Fail(Vec<String>),
}

#[derive(Default)]
struct FakeState {
    databases: Vec<String>,
    tables: HashMap<String, Vec<String>>,
    scripted: HashMap<String, Scripted>,
    pending_polls: usize,
    logs: Vec<String>,
    connect_failure: Option<String>,
    close_failure: bool,
    cancel_on: Option<(String, CancellationToken)>,
    connects: usize,
    closes: usize,
    calls: Vec<String>,
}

/// Scripted in-memory Hive server.
#[derive(Clone, Default)]
pub struct FakeHive {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHive {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }

    /// Register databases returned by `show databases`.
    pub fn with_databases(self, databases: &[&str]) -> Self {
        self.state()
            .databases
            .extend(databases.iter().map(|d| d.to_string()));
        self
    }

    /// Register a table: its `show create table` lines and `describe` columns.
    pub fn with_table(self, schema: &str, table: &str, ddl: &[&str], columns: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state();
            state
                .tables
                .entry(schema.to_string())
                .or_default()
                .push(table.to_string());

            let ddl_rows = ddl.iter().map(|line| vec![json!(line)]).collect();
            state.scripted.insert(
                format!("show create table `{}`.`{}`", schema, table),
                Scripted::Rows(ResultData::new(vec!["createtab_stmt".to_string()], ddl_rows)),
            );

            let describe_rows = columns
                .iter()
                .map(|(name, data_type)| vec![json!(name), json!(data_type), json!("")])
                .collect();
            state.scripted.insert(
                format!("describe `{}`.`{}`", schema, table),
                Scripted::Rows(describe_columns(describe_rows)),
            );
        }
        self
    }

    /// Answer `sql` with the given rows.
    pub fn with_rows(self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.state()
            .scripted
            .insert(sql.to_string(), Scripted::Rows(ResultData::new(columns, rows)));
        self
    }

    /// Reject `sql` at submission with the given message fragments.
    pub fn with_failure(self, sql: &str, messages: &[&str]) -> Self {
        self.state().scripted.insert(
            sql.to_string(),
            Scripted::Fail(messages.iter().map(|m| m.to_string()).collect()),
        );
        self
    }

    /// Report every operation as running `polls` times before it finishes,
    /// producing `logs` on the first log fetch.
    pub fn with_pending_polls(self, polls: usize, logs: &[&str]) -> Self {
        {
            let mut state = self.state();
            state.pending_polls = polls;
            state.logs = logs.iter().map(|l| l.to_string()).collect();
        }
        self
    }

    /// Cancel `token` when a statement starting with `prefix` is submitted,
    /// and leave that statement running forever.
    pub fn cancel_on(self, prefix: &str, token: &CancellationToken) -> Self {
        self.state().cancel_on = Some((prefix.to_string(), token.clone()));
        self
    }

    /// Refuse new sessions.
    pub fn refuse_connections(self, message: &str) -> Self {
        self.state().connect_failure = Some(message.to_string());
        self
    }

    /// Fail every session close.
    pub fn fail_close(self) -> Self {
        self.state().close_failure = true;
        self
    }

    /// Statements submitted so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("execute: ").map(str::to_string))
            .collect()
    }

    /// Every driver call so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.state().connects
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }
}

fn describe_columns(rows: Vec<Vec<Value>>) -> ResultData {
    ResultData::new(
        vec![
            "col_name".to_string(),
            "data_type".to_string(),
            "comment".to_string(),
        ],
        rows,
    )
}

fn names(column: &str, values: &[String]) -> ResultData {
    ResultData::new(
        vec![column.to_string()],
        values.iter().map(|v| vec![json!(v)]).collect(),
    )
}

#[async_trait]
impl HiveDriver for FakeHive {
    async fn connect(&self, params: &SessionParams) -> Result<Box<dyn HiveSession>, TransportError> {
        let mut state = self.state();
        state.calls.push(format!("connect: {}:{}/{}", params.host, params.port, params.database));
        if let Some(message) = &state.connect_failure {
            return Err(TransportError::Transport(message.clone()));
        }
        state.connects += 1;

        Ok(Box::new(FakeSession {
            state: Arc::clone(&self.state),
            result: ResultData::empty(),
            polls_left: 0,
            logs: Vec::new(),
        }))
    }
}

struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    result: ResultData,
    polls_left: usize,
    logs: Vec<String>,
}

impl FakeSession {
    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state lock")
    }
}

#[async_trait]
impl HiveSession for FakeSession {
    async fn execute_async(&mut self, sql: &str) -> Result<(), TransportError> {
        let (scripted, pending, logs) = {
            let mut state = self.state();
            state.calls.push(format!("execute: {}", sql));

            let scripted = if let Some(scripted) = state.scripted.get(sql) {
                scripted.clone()
            } else if sql == "show databases" {
                Scripted::Rows(names("database_name", &state.databases))
            } else if let Some(schema) = sql
                .strip_prefix("show tables in `")
                .and_then(|rest| rest.strip_suffix('`'))
            {
                let tables = state.tables.get(schema).cloned().unwrap_or_default();
                Scripted::Rows(names("tab_name", &tables))
            } else {
                Scripted::Rows(ResultData::empty())
            };

            let pending = match &state.cancel_on {
                Some((prefix, token)) if sql.starts_with(prefix.as_str()) => {
                    token.cancel();
                    usize::MAX
                }
                _ => state.pending_polls,
            };

            (scripted, pending, state.logs.clone())
        };

        match scripted {
            Scripted::Rows(data) => {
                self.result = data;
                self.polls_left = pending;
                self.logs = logs;
                Ok(())
            }
            Scripted::Fail(messages) => Err(TransportError::Database { messages }),
        }
    }

    async fn poll_status(&mut self) -> Result<PollResponse, TransportError> {
        let status = if self.polls_left > 0 {
            self.polls_left -= 1;
            OperationStatus::Running
        } else {
            OperationStatus::Finished
        };
        self.state().calls.push(format!("poll: {}", status));
        Ok(PollResponse::new(status))
    }

    async fn fetch_logs(&mut self) -> Result<Vec<String>, TransportError> {
        let logs: Vec<String> = self.logs.drain(..).collect();
        self.state().calls.push(format!("logs: {}", logs.len()));
        Ok(logs)
    }

    async fn fetch_all(&mut self) -> Result<ResultData, TransportError> {
        self.state().calls.push("fetch".to_string());
        Ok(std::mem::take(&mut self.result))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state();
        state.calls.push("close".to_string());
        if state.close_failure {
            return Err(TransportError::Io("Broken pipe".to_string()));
        }
        state.closes += 1;
        Ok(())
    }
}
