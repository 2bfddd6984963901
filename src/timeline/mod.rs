//! The timeline engine: coordinates, viewport windowing, calendar overlay,
//! weekend segmentation, the drag/resize controller, and headless layout.
//!
//! Nothing in here depends on a running UI; `crate::ui` paints what these
//! modules compute.

pub mod axis;
pub mod dates;
pub mod drag;
pub mod events;
pub mod layout;
pub mod overlay;
pub mod segments;
pub mod viewport;

pub use axis::{EdgeAnchorCache, TimeAxis};
pub use drag::{DragController, DragOutcome, DragState, PointerTarget, PreviewHandle};
pub use events::{CellAction, TimelineEvent};
pub use layout::{LayoutInput, Primitive, TimelineLayout};
pub use overlay::{CalendarDayIndex, OffloadPolicy, OverlayRequest, OverlayResolver, ThreadExecutor};
pub use segments::{weekday_segments, Segment};
pub use viewport::{FrameSlot, ViewportRange, ViewportTracker};
