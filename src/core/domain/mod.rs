//! Domain types.

mod secret;
mod sync;

pub use secret::{BackendKind, DescriptorEntry, LabelParam, PathParam, SecretDescriptor, Selector};
pub use sync::{Entry, Outcome, SecretKind, SkipReason, SyncReport};
