//! Wheel core: ring structure, placement, dispatch, and lifecycle.
//!
//! The public API from this module is [`TimeWheel`] (with its companions
//! [`WheelInfo`], [`WheelState`], and [`ErrorStream`]); everything else is
//! internal machinery.
//!
//! Internal modules:
//! - [`placement`]: maps a delay to (slot, cycle count), pivot-relative;
//! - [`ring`]: fixed array of independently locked slots;
//! - [`store`]: id → handler map, shared by registration and execution;
//! - [`sink`]: bounded error channel with overflow policy;
//! - [`dispatch`]: the tick loop and per-entry execution units;
//! - [`wheel`]: the aggregate, its lifecycle state machine, and shutdown.

mod dispatch;
mod placement;
mod ring;
mod sink;
mod store;
mod wheel;

pub use sink::ErrorStream;
pub use wheel::{TimeWheel, WheelInfo, WheelState};
