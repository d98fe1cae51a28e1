pub mod credential;
pub mod media_ref;
pub mod metadata;
pub mod record;
pub mod watch_history;

pub use credential::Credential;
pub use media_ref::MediaReference;
pub use metadata::{PrimaryMetadata, SecondaryMetadata};
pub use record::MergedRecord;
pub use watch_history::WatchedItem;
