//! # Shared
//!
//! Container plumbing that isn't specific to CR3.
//!
//! CR3 is built on BMFF, the same box layout used by MP4 and HEIF, so the
//! box parsing lives here instead of inside the CR3 provider.

use winnow::error::{StrContext, StrContextValue};

pub mod bmff;

/// Creates a string description for `winnow` context.
pub const fn desc(s: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(s))
}
