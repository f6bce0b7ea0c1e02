//! Port implementations: live systems, cassette recording and replay.

pub mod live;
pub mod recording;
pub mod replaying;
