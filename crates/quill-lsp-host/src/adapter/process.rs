//! Language server backed by a child process.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::LspServerConfig;
use super::error::AdapterError;
use super::lifecycle::{ADAPTER_TARGET, spawn_process, terminate_child};
use super::messaging;
use super::state::ProcessState;
use super::transport::StdioTransport;
use crate::Language;

/// A language server reached through a spawned process.
///
/// The process is started by [`LanguageServer::initialize`](crate::LanguageServer::initialize)
/// and shut down with `shutdown`/`exit` when the adapter is dropped.
pub struct ProcessLanguageServer {
    language: Language,
    config: LspServerConfig,
    state: ProcessState,
    next_id: i64,
}

impl ProcessLanguageServer {
    /// Creates an adapter using the default command for `language`.
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self::with_config(language, LspServerConfig::for_language(language))
    }

    /// Creates an adapter with an explicit configuration.
    #[must_use]
    pub const fn with_config(language: Language, config: LspServerConfig) -> Self {
        Self {
            language,
            config,
            state: ProcessState::NotStarted,
            next_id: 1,
        }
    }

    /// Language this adapter serves.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Launch configuration.
    #[must_use]
    pub const fn config(&self) -> &LspServerConfig {
        &self.config
    }

    pub(super) fn start(&mut self) -> Result<(), AdapterError> {
        let (child, transport) = spawn_process(self.language, &self.config)?;
        self.state = ProcessState::Running { child, transport };
        Ok(())
    }

    fn transport(&mut self) -> Result<&mut StdioTransport, AdapterError> {
        match &mut self.state {
            ProcessState::Running { transport, .. } => Ok(transport),
            ProcessState::NotStarted | ProcessState::Stopped => Err(AdapterError::ProcessExited),
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub(super) fn request<P, T>(&mut self, method: &str, params: P) -> Result<T, AdapterError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.allocate_id();
        messaging::send_request(self.transport()?, id, method, params)
    }

    pub(super) fn request_optional<P, T>(
        &mut self,
        method: &str,
        params: P,
    ) -> Result<Option<T>, AdapterError>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.allocate_id();
        messaging::send_request_optional(self.transport()?, id, method, params)
    }

    pub(super) fn notify<P: Serialize>(&mut self, method: &str, params: P) -> Result<(), AdapterError> {
        messaging::send_notification(self.transport()?, method, params)
    }

    /// Sends `shutdown` and `exit`, then reaps the process.
    ///
    /// Failures are logged; the process is killed if it does not exit.
    pub fn shutdown(&mut self) {
        if !matches!(self.state, ProcessState::Running { .. }) {
            return;
        }
        debug!(target: ADAPTER_TARGET, language = %self.language, "initiating graceful shutdown");

        let id = self.allocate_id();
        if let Ok(transport) = self.transport()
            && let Err(error) =
                messaging::send_request_raw(transport, id, "shutdown", serde_json::Value::Null)
        {
            debug!(target: ADAPTER_TARGET, language = %self.language, %error, "shutdown request failed");
        }
        if let Err(error) = self.notify("exit", serde_json::Value::Null) {
            debug!(target: ADAPTER_TARGET, language = %self.language, %error, "exit notification failed");
        }

        if let ProcessState::Running { mut child, .. } =
            std::mem::replace(&mut self.state, ProcessState::Stopped)
        {
            terminate_child(&mut child, self.language);
        }
    }
}

impl Drop for ProcessLanguageServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ProcessLanguageServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessLanguageServer")
            .field("language", &self.language)
            .field("command", &self.config.command)
            .field("state", &self.state.label())
            .finish()
    }
}
