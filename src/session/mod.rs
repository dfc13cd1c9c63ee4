mod session;

pub use session::{CdOutcome, Session};
