//! Action domain.
//!
//! Actions are a closed enum of kinds ([`ActionKind`]) with a static
//! capability table ([`ActionFlags`]) plus three functions keyed by kind:
//! [`validate`], [`quote`] for the AP cost, and execution in
//! [`crate::engine`]. Queued actions wait in a per-unit [`ActionQueue`].
//!
//! # Module Structure
//!
//! - `kind`: action kinds and capability flags
//! - `target`: action targets and the bound [`Action`]
//! - `error`: [`ActionError`]
//! - `validation`: preconditions per kind
//! - `cost`: AP pricing and door rerouting
//! - `queue`: the per-unit FIFO
//! - `available`: kinds a unit could queue right now

mod available;
mod cost;
mod error;
mod kind;
mod queue;
mod target;
mod validation;

pub use available::available_actions;
pub use cost::{CostQuote, move_cost, quote};
pub use error::ActionError;
pub use kind::{ActionFlags, ActionKind};
pub use queue::{ActionQueue, QueueEntry};
pub use target::{Action, ActionTarget};
pub use validation::{acting_unit, melee_reach, validate, validate_queued};
