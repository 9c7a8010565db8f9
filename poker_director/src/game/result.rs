//! The directive produced by one engine tick.

use serde::Serialize;
use std::{collections::BTreeMap, fmt};

use super::{entities::TableState, events::GameEvent};

/// Opaque parameters handed to the presentation phase unchanged.
pub type PhaseParams = BTreeMap<String, serde_json::Value>;

/// What the caller should do with a table after one tick.
///
/// Built through [`TableProcessResultBuilder`]. Once built the result is
/// read-only: fields are private and collections are only ever exposed
/// through shared references.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableProcessResult {
    next_state: Option<TableState>,
    pending_state: Option<TableState>,
    phase_to_run: Option<String>,
    phase_params: PhaseParams,
    should_save: bool,
    should_auto_save: bool,
    should_sleep: bool,
    should_run_on_client: bool,
    should_add_all_humans: bool,
    should_only_send_to_wait_list: bool,
    events: Vec<GameEvent>,
}

impl TableProcessResult {
    #[must_use]
    pub fn builder() -> TableProcessResultBuilder {
        TableProcessResultBuilder::default()
    }

    /// No transition: the caller keeps ticking.
    #[must_use]
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// State to move the table to right away.
    #[must_use]
    pub const fn next_state(&self) -> Option<TableState> {
        self.next_state
    }

    /// State to adopt once the phase (or wait-list) completes.
    #[must_use]
    pub const fn pending_state(&self) -> Option<TableState> {
        self.pending_state
    }

    #[must_use]
    pub fn phase_to_run(&self) -> Option<&str> {
        self.phase_to_run.as_deref()
    }

    #[must_use]
    pub const fn phase_params(&self) -> &PhaseParams {
        &self.phase_params
    }

    #[must_use]
    pub const fn should_save(&self) -> bool {
        self.should_save
    }

    #[must_use]
    pub const fn should_auto_save(&self) -> bool {
        self.should_auto_save
    }

    #[must_use]
    pub const fn should_sleep(&self) -> bool {
        self.should_sleep
    }

    /// A client must run this directive locally too.
    #[must_use]
    pub const fn should_run_on_client(&self) -> bool {
        self.should_run_on_client
    }

    #[must_use]
    pub const fn should_add_all_humans(&self) -> bool {
        self.should_add_all_humans
    }

    /// Replicate only to the players on the wait-list.
    #[must_use]
    pub const fn should_only_send_to_wait_list(&self) -> bool {
        self.should_only_send_to_wait_list
    }

    /// Events published while producing this result, in publish order.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Whether the result asks for neither a transition nor a phase.
    #[must_use]
    pub const fn is_no_op(&self) -> bool {
        self.next_state.is_none() && self.pending_state.is_none() && self.phase_to_run.is_none()
    }
}

impl Default for TableProcessResult {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for TableProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = |state: Option<TableState>| state.map_or_else(|| "-".to_string(), |s| s.to_string());
        write!(
            f,
            "next={} pending={} phase={} sleep={} client={}",
            state(self.next_state),
            state(self.pending_state),
            self.phase_to_run.as_deref().unwrap_or("-"),
            self.should_sleep,
            self.should_run_on_client,
        )
    }
}

/// Consuming builder for [`TableProcessResult`].
#[derive(Clone, Debug)]
pub struct TableProcessResultBuilder {
    result: TableProcessResult,
}

impl Default for TableProcessResultBuilder {
    fn default() -> Self {
        Self {
            result: TableProcessResult {
                next_state: None,
                pending_state: None,
                phase_to_run: None,
                phase_params: PhaseParams::new(),
                should_save: false,
                should_auto_save: false,
                should_sleep: true,
                should_run_on_client: false,
                should_add_all_humans: true,
                should_only_send_to_wait_list: false,
                events: Vec::new(),
            },
        }
    }
}

impl TableProcessResultBuilder {
    #[must_use]
    pub fn next_state(mut self, state: TableState) -> Self {
        self.result.next_state = Some(state);
        self
    }

    #[must_use]
    pub fn pending_state(mut self, state: TableState) -> Self {
        self.result.pending_state = Some(state);
        self
    }

    #[must_use]
    pub fn phase(mut self, phase: &str) -> Self {
        self.result.phase_to_run = Some(phase.to_string());
        self
    }

    /// Sets the phase to run, or clears it when `None`.
    #[must_use]
    pub fn phase_to_run(mut self, phase: Option<String>) -> Self {
        self.result.phase_to_run = phase;
        self
    }

    #[must_use]
    pub fn phase_param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.result.phase_params.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn phase_params(mut self, params: PhaseParams) -> Self {
        self.result.phase_params = params;
        self
    }

    #[must_use]
    pub fn should_save(mut self, value: bool) -> Self {
        self.result.should_save = value;
        self
    }

    #[must_use]
    pub fn should_auto_save(mut self, value: bool) -> Self {
        self.result.should_auto_save = value;
        self
    }

    #[must_use]
    pub fn should_sleep(mut self, value: bool) -> Self {
        self.result.should_sleep = value;
        self
    }

    #[must_use]
    pub fn should_run_on_client(mut self, value: bool) -> Self {
        self.result.should_run_on_client = value;
        self
    }

    #[must_use]
    pub fn should_add_all_humans(mut self, value: bool) -> Self {
        self.result.should_add_all_humans = value;
        self
    }

    #[must_use]
    pub fn should_only_send_to_wait_list(mut self, value: bool) -> Self {
        self.result.should_only_send_to_wait_list = value;
        self
    }

    #[must_use]
    pub fn events(mut self, events: Vec<GameEvent>) -> Self {
        self.result.events = events;
        self
    }

    #[must_use]
    pub fn build(self) -> TableProcessResult {
        self.result
    }
}
