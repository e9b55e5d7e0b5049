//! Plugin lifecycle status.
//!
//! Mirrors the state machine in spec §4.5. Transitions are monotonic within
//! a single lifecycle attempt — a plugin that reaches `Failed` or
//! `Terminated` never transitions out of it without a fresh `Load`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PluginStatus {
    Unknown,
    Registered,
    Prepared,
    Initializing,
    Inactive,
    Starting,
    Active,
    Stopping,
    Failed,
    Terminated,
}

impl Default for PluginStatus {
    fn default() -> Self {
        PluginStatus::Unknown
    }
}

impl PluginStatus {
    /// Whether `next` is a legal transition from `self`.
    ///
    /// `Failed` is reachable from every non-terminal state (a step can fail
    /// at any point), and `Terminated` is only reachable from `Stopping`.
    pub fn can_transition_to(self, next: PluginStatus) -> bool {
        use PluginStatus::*;
        if next == Failed {
            return !matches!(self, Terminated | Failed);
        }
        matches!(
            (self, next),
            (Unknown, Registered)
                | (Registered, Prepared)
                | (Prepared, Initializing)
                | (Initializing, Inactive)
                | (Inactive, Starting)
                | (Starting, Active)
                | (Active, Stopping)
                | (Stopping, Terminated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PluginStatus::Failed | PluginStatus::Terminated)
    }

    pub fn is_active(self) -> bool {
        matches!(self, PluginStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PluginStatus::*;

    #[test]
    fn happy_path_transitions_are_legal() {
        let path = [
            Unknown,
            Registered,
            Prepared,
            Initializing,
            Inactive,
            Starting,
            Active,
            Stopping,
            Terminated,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn failed_reachable_from_any_non_terminal_state() {
        for state in [
            Registered,
            Prepared,
            Initializing,
            Inactive,
            Starting,
            Active,
            Stopping,
        ] {
            assert!(state.can_transition_to(Failed));
        }
        assert!(!Terminated.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    #[test]
    fn skipping_a_step_is_illegal() {
        assert!(!Registered.can_transition_to(Active));
        assert!(!Initializing.can_transition_to(Starting));
    }
}
