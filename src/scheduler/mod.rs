//! Invalidation scheduler: debounced, single-flight replanning
//!
//! Callers mark the session's plans invalid whenever something they depend
//! on changes. The scheduler coalesces a burst of invalidations behind one
//! debounce timer, then plans in a loop until a planning call finishes
//! without a newer invalidation having arrived, and publishes only that
//! final result.
//!
//! ```text
//!   mark_invalid ──► Idle ──(emit plans-cleared, arm timer)──► Debouncing
//!                                                                 │ timer
//!                     ▲                                           ▼
//!                     └──(emit plans-ready)── clean run ◄── Planning ◄─┐
//!                                                                 │    │
//!                                                 invalid again ──┴────┘
//! ```
//!
//! All state is owned by one task; handles only send it messages, so
//! there is never more than one timer or one planning call in flight.

mod handle;
mod messages;
mod task;

pub use handle::InvalidationScheduler;
pub use messages::{Invalidation, SchedulerCommand, SchedulerError, SchedulerPhase, SchedulerSnapshot, SchedulerStats};
pub use task::{DEFAULT_DEBOUNCE, SchedulerTask};
