pub mod backends;
pub mod cursor;
pub mod dispatch;
pub mod format;
pub mod handlers;
pub mod memory;
pub mod session;
pub mod votes;
pub mod webhook;

pub use backends::{EventSource, FirebaseVotes, MeetupEvents, VoteStore};
pub use dispatch::{HandlerRegistry, IntentHandler, Surface, TurnContext};
pub use format::TurnResponse;
pub use session::{SessionState, ViewMode};
