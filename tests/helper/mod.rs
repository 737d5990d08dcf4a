#![allow(dead_code, unused_imports)]

mod corpus;
mod warner;

pub use corpus::{asset_body, fixture_corpus, fixture_path};
pub use warner::RecordingWarner;
