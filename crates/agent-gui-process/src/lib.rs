//! Process resolution for agent-gui.
//!
//! Maps a loose human-supplied application reference -- a name, a bundle
//! identifier, a `PID:<n>` token, or a typo'd name -- to exactly one running
//! process, and provides the running-application snapshot the resolver
//! searches over.

#![deny(clippy::all)]

mod error;
mod resolver;
mod snapshot;

pub use error::ProcessError;
pub use resolver::MAX_EDIT_DISTANCE;
pub use resolver::MAX_IDENTIFIER_LEN;
pub use resolver::resolve;
pub use snapshot::RunningProcess;
pub use snapshot::system_snapshot;
pub use snapshot::visible_applications;
