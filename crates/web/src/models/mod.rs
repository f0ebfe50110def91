//! View-state models.

pub mod session;

pub use session::DirectoryView;
