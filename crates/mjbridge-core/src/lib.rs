//! # mjbridge Core
//!
//! Everything between "the prompt was sent" and "four PNG files are on disk":
//!
//! - [`matcher`] - does a message belong to the submitted prompt?
//! - [`classifier`] - is it a finished grid, an upscale, or still running?
//! - [`poller`] - re-read the channel until a finished grid shows up
//! - [`splitter`] / [`store`] - cut the grid into quadrants and write them
//! - [`creator`] - one `create_image` call end to end
//!
//! The browser is only reached through the traits in `mjbridge-protocols`,
//! so all of this runs against [`fixture::FixtureSource`] in tests.

pub mod classifier;
pub mod creator;
pub mod download;
pub mod error;
pub mod fixture;
pub mod matcher;
pub mod poller;
pub mod splitter;
pub mod store;

pub use classifier::{ClassifierPatterns, MessageClassifier};
pub use creator::ImageCreator;
pub use download::ImageDownloader;
pub use error::{ImagineError, PatternError};
pub use fixture::FixtureSource;
pub use poller::{PollOptions, ResultPoller, SeenMessages};
pub use splitter::{split_into_quadrants, GridImage, Quadrant};
pub use store::ArtifactStore;
