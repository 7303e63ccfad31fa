//! License verification: persisted record, process session, gate state and
//! the gate itself.

mod gate;
mod record;
mod session;
mod state;
mod view;

pub use gate::{LicenseGate, MountOutcome};
pub use record::{LicenseVerificationRecord, StoredVerification};
pub use session::{SessionResult, VerificationSession};
pub use state::GateState;
pub use view::GateView;
