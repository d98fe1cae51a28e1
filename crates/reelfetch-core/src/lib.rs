pub mod error;
pub mod input;
pub mod lookup;
pub mod merge;
pub mod recorder;
pub mod token;

pub use error::LookupError;
pub use input::{extract_identifier, LookupInput};
pub use lookup::LookupService;
pub use merge::{is_truncated, merge, TRUNCATION_MARKER};
pub use recorder::{LookupRecorder, RecordOptions, RecordOutcome, SinkStatus};
pub use token::{classify, CredentialRefreshError, TokenRefresher, TokenState};
