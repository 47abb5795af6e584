//! MAGI Runtime - Animation loop infrastructure
//!
//! Provides the scheduling building blocks shared by every effect:
//! - `Clock`: high-resolution millisecond time source (`SystemClock`, `ManualClock`)
//! - `FrameGate`: phase-corrected frame-rate cap
//! - `FrameScheduler`: one capped animation loop multiplexing named draw tasks
//! - `TimerQueue` / `Debouncer`: wall-clock timers independent of frames
//! - `PageEvent` / `EventBus`: visibility, resize and theme notifications
//! - `RenderTask`: trait for effects drawn by the scheduler

mod clock;
mod event;
mod event_bus;
mod gate;
mod scheduler;
mod system;
mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use event::{PageEvent, Visibility};
pub use event_bus::EventBus;
pub use gate::{FrameGate, DEFAULT_FPS};
pub use scheduler::{FrameOutcome, FrameRequestId, FrameScheduler, SchedulerStats};
pub use system::{DrawFn, RenderTask, TaskRegistry};
pub use timer::{Debouncer, TimerId, TimerQueue};
