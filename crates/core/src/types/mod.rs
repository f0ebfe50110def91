//! Core types for the donor finder.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the directory and the request list.

pub mod attributes;
pub mod donor;
pub mod email;
pub mod id;
pub mod request;
pub mod status;

pub use attributes::{ALL_LABEL, BloodGroup, City, ParseAttributeError, Selection};
pub use donor::{Donor, RawUser};
pub use email::{Email, EmailError};
pub use id::*;
pub use request::Request;
pub use status::RequestStatus;
