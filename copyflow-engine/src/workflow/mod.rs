//! Page lifecycle workflow

pub mod status;

pub use status::{apply_review, compute_status, ReviewAction};
