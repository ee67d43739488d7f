//! Metadata store: append-only persistence of profiles and quality reports.

mod metadata;
mod records;

pub use metadata::{MetadataStore, IN_MEMORY};
pub use records::{
    ProfileId, StoredProfileRecord, StoredTransformationRecord, TransformationMetadata,
};
