//! Presentation layer
//!
//! Hosts the loader mounts views into, the demo view type and the widgets
//! the terminal host draws with.

pub mod log_host;
pub mod tui_host;
pub mod view;
pub mod widgets;

pub use log_host::LogHost;
pub use tui_host::{MountedView, TuiHost};
pub use view::{Region, TextView};
