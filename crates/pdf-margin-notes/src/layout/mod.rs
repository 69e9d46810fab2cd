//! Margin-note layout
//!
//! Everything in here is pure geometry on page-local, top-left-origin
//! coordinates:
//! - Page expansion and the initial margin rectangle
//! - Ordering of a page's annotations
//! - Anchor, column detection, note placement and connector routing
//! - Note text measurement

mod frame;
mod margin;
mod metrics;
mod order;
mod page;
mod route;
mod types;

pub use frame::*;
pub use margin::*;
pub use metrics::*;
pub use order::*;
pub use page::*;
pub use route::*;
pub use types::*;
