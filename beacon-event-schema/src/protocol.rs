//! Types that constitute the event protocol.

mod breadcrumb;
mod event;
mod meta;
mod payload;
mod types;
mod user;

pub use self::breadcrumb::*;
pub use self::event::*;
pub use self::meta::*;
pub use self::payload::*;
pub use self::types::*;
pub use self::user::*;
