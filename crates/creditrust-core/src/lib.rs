//! CrediTrust Core: shared types, the wallet session state machine,
//! errors, and configuration.

pub mod config;
pub mod error;
pub mod session_state;
pub mod types;

pub use config::{ContractConfig, CrediTrustConfig, LoggingConfig, NetworkConfig, WalletConfig};
pub use error::CoreError;
pub use session_state::{SessionEvent, SessionSnapshot, SessionStateMachine, SessionStatus};
pub use types::{AccountAddress, Balance, NetworkInfo, WalletAccount, OCTAS_PER_APT};
