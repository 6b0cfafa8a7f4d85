//! Page Pipeline
//!
//! Connects the static page content to what the renderer draws.
//!
//! # Pipeline Architecture
//!
//! ```text
//! PageSpec → PageLayout → observers → RevealControllers → Frame → renderer
//! ```
//!
//! ## Data Flow
//!
//! 1. **mount** - Lays out the page and registers one observer per controller
//! 2. **dispatch** - Every viewport change tests pending observers; a hit
//!    reveals its controller and the observation is dropped
//! 3. **frame** - Samples the motion of every visible element at one instant
//!
//! ## Key Design Principles
//!
//! - **One-way reveal**: a controller never returns to hidden, so scrolling
//!   back never replays an entrance
//! - **Pure frames**: building a frame reads state and changes nothing

pub mod frame;
pub mod mount;

pub use frame::{Frame, FrameElement};
pub use mount::{element_motions, mount, mount_with, ElementMotion, MountedPage};
