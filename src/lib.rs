//! Core engine for an image dataset tag editor.
//!
//! The dataset is a directory tree of images whose tags live in `.txt`
//! sidecar files next to them. [`DatasetIndex`] owns the image records
//! and keeps the global tag aggregate exact under every mutation;
//! [`LiveView`] projects filtered, sorted views of images, global tags
//! and autocomplete suggestions; [`TagEditor`] runs the cursor state
//! machine a presentation layer drives.

pub mod dataset;
pub mod editor;
pub mod error;
pub mod live_view;
pub mod selection;
pub mod stats;
pub mod storage;

pub use dataset::{
    normalize, DatasetIndex, GlobalTag, ImageRecord, LoadSummary, MoveDirection, SaveFailure,
    SaveReport, TagSortOrder,
};
pub use editor::{ImageEntry, TagEditor};
pub use error::DatasetError;
pub use live_view::LiveView;
pub use selection::Selection;
