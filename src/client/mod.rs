//! Client side of the auth flow: what a browser front end does with the
//! token, the cached user and the locally kept role profile.

pub mod api;
pub mod draft;
pub mod notify;
pub mod profile;
pub mod session;
pub mod storage;
pub mod view;

pub use api::{AuthApi, ClientError, HttpAuthApi};
pub use draft::DraftAutosaver;
pub use notify::{Notification, Severity, Toaster};
pub use profile::{Draft, FieldValue, MarketRole, Profile, UploadRef};
pub use session::{ClientSession, Guard, Outcome, Page, SessionState, SignupForm};
pub use storage::{KeyValueStore, MemoryStore};
pub use view::DashboardView;
