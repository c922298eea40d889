use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{AccountAddress, Balance};

/// The four states of a wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SessionStatus {
    /// No account is connected. Initial state.
    Disconnected,
    /// A connect request is waiting on the wallet.
    Connecting,
    /// An account is connected; address and balance are known.
    Connected,
    /// The last connect attempt failed.
    Error,
}

impl SessionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Events that drive session transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user asked to connect.
    ConnectRequested,
    /// The wallet approved the connection.
    ConnectSucceeded,
    /// The wallet rejected the connection or was unavailable.
    ConnectFailed,
    /// An already-authorized connection was found at startup.
    SessionRestored,
    /// The user asked to disconnect.
    DisconnectRequested,
    /// The wallet reported a (possibly new) active account.
    AccountChanged,
    /// The wallet reported that no account is active.
    AccountCleared,
}

/// Wallet session transitions.
///
/// Valid transitions:
/// - Disconnected → Connecting (ConnectRequested)
/// - Error → Connecting (ConnectRequested)
/// - Connecting → Connected (ConnectSucceeded)
/// - Connecting → Error (ConnectFailed)
/// - Disconnected → Connected (SessionRestored)
/// - Error → Connected (SessionRestored)
/// - any → Connected (AccountChanged)
/// - any → Disconnected (DisconnectRequested, AccountCleared)
///
/// There is no terminal state.
pub struct SessionStateMachine;

impl SessionStateMachine {
    /// Attempt a transition. Returns the new status, or an error for
    /// transitions the session does not allow.
    pub fn transition(
        current: SessionStatus,
        event: SessionEvent,
    ) -> Result<SessionStatus, CoreError> {
        use SessionEvent as E;
        use SessionStatus as S;

        let next = match (current, event) {
            (S::Disconnected | S::Error, E::ConnectRequested) => S::Connecting,
            (S::Connecting, E::ConnectSucceeded) => S::Connected,
            (S::Connecting, E::ConnectFailed) => S::Error,
            (S::Disconnected | S::Error, E::SessionRestored) => S::Connected,

            (_, E::AccountChanged) => S::Connected,
            (_, E::DisconnectRequested | E::AccountCleared) => S::Disconnected,

            _ => {
                let target = match event {
                    E::ConnectRequested => S::Connecting,
                    E::ConnectSucceeded | E::SessionRestored | E::AccountChanged => S::Connected,
                    E::ConnectFailed => S::Error,
                    E::DisconnectRequested | E::AccountCleared => S::Disconnected,
                };
                return Err(CoreError::InvalidStateTransition {
                    from: current,
                    to: target,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %next,
            event = ?event,
            "session state transition"
        );

        Ok(next)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: SessionStatus, event: SessionEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}

/// A consistent, read-only view of a wallet session.
///
/// Fields are private so that `address` and `balance` can only be present
/// together with `SessionStatus::Connected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    status: SessionStatus,
    address: Option<AccountAddress>,
    balance: Option<Balance>,
    last_error: Option<String>,
}

impl SessionSnapshot {
    pub fn disconnected() -> Self {
        Self {
            status: SessionStatus::Disconnected,
            address: None,
            balance: None,
            last_error: None,
        }
    }

    pub fn connecting() -> Self {
        Self {
            status: SessionStatus::Connecting,
            ..Self::disconnected()
        }
    }

    pub fn connected(address: AccountAddress, balance: Balance) -> Self {
        Self {
            status: SessionStatus::Connected,
            address: Some(address),
            balance: Some(balance),
            last_error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: SessionStatus::Error,
            last_error: Some(message.into()),
            ..Self::disconnected()
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn address(&self) -> Option<&AccountAddress> {
        self.address.as_ref()
    }

    pub fn balance(&self) -> Option<Balance> {
        self.balance
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::disconnected()
    }
}
