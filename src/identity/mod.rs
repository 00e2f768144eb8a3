//! Central identity and session management for the application.
//! Keep the public surface thin and split implementation across sub-modules.

mod cookie;
mod principal;
mod session;

pub use cookie::{SESSION_COOKIE, clear_session_cookie, parse_cookie, session_cookie, session_id_from_headers};
pub use principal::Principal;
pub use session::{Session, SessionManager};
