// Contact list domain module
// Normalizes uploaded files, splits the records across agents and records the batch

pub mod batch;
pub mod columns;
pub mod contact;
pub mod distributor;
pub mod errors;
pub mod normalizer;
pub mod pipeline;

pub use batch::{Distribution, UploadBatch};
pub use columns::{ColumnMap, ContactField};
pub use contact::ContactRecord;
pub use distributor::distribute;
pub use errors::{UploadError, UploadResult};
pub use normalizer::{normalize, FileKind};
pub use pipeline::{process_upload, UploadOutcome, UploadRequest};
