//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`overview`]: KPI cards and the per-channel total/closed chart
//! - [`tabulation`]: Closed tickets by tabulation comment
//! - [`rankings`]: Top customers and top agents
//! - [`tickets`]: Sortable, searchable table of closed tickets
//! - [`detail`]: Modal overlay showing every field of one ticket
//! - [`filter`]: Date range and channel filter overlay
//! - [`common`]: Shared components (header, tabs, status bar, help overlay, charts)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (overview/tabulation/...::render)    │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - filter::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod filter;
pub mod overview;
pub mod rankings;
pub mod tabulation;
pub mod theme;
pub mod tickets;

pub use theme::Theme;
pub use tickets::TicketSortColumn;
