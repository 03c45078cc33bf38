//! Authentication: password hashing, tokens, cookie sessions

pub mod clock;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::{Claims, TokenKind, TokenPair, TokenService, TokenSubject};
pub use middleware::{page_guard, AdminSession, AnySession, OperatorSession};
pub use password::PasswordHasher;
pub use session::{Session, SessionCookies, SessionRole};
