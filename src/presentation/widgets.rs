//! Stateless ratatui widgets used by the terminal host

pub mod module_view;
pub mod status_bar;

pub use module_view::ModuleViewWidget;
pub use status_bar::StatusBarWidget;
