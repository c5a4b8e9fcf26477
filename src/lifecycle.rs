use std::fmt;

/// Where a scenario's connection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotConnected,
    Connecting,
    Connected,
    ToolsListed,
    ToolInvoked,
    Disconnecting,
    Disconnected,
    Errored,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Disconnected)
    }

    pub fn can_transition_to(self, next: State) -> bool {
        use State::*;

        match (self, next) {
            (Disconnected, _) => false,
            (Errored, Disconnecting) => true,
            (Errored, _) => false,
            (_, Errored) => true,
            (NotConnected, Connecting) => true,
            (Connecting, Connected) => true,
            (Connected, ToolsListed | Disconnecting) => true,
            (ToolsListed, ToolInvoked | Disconnecting) => true,
            (ToolInvoked, Disconnecting) => true,
            (Disconnecting, Disconnected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Records the states one scenario's connection passes through.
#[derive(Debug)]
pub struct Lifecycle {
    scenario: &'static str,
    history: Vec<State>,
}

impl Lifecycle {
    pub fn new(scenario: &'static str) -> Self {
        Self {
            scenario,
            history: vec![State::NotConnected],
        }
    }

    pub fn state(&self) -> State {
        self.history.last().copied().unwrap_or(State::NotConnected)
    }

    pub fn history(&self) -> &[State] {
        &self.history
    }

    /// Moves to `next`. Transitions outside the diagram are logged but
    /// still recorded.
    pub fn advance(&mut self, next: State) {
        let current = self.state();
        if current.can_transition_to(next) {
            tracing::debug!(scenario = self.scenario, from = %current, to = %next, "connection state");
        } else {
            tracing::warn!(scenario = self.scenario, from = %current, to = %next, "unexpected connection state transition");
        }
        self.history.push(next);
    }
}
