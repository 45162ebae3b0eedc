mod credit;
mod metadata;
mod record;

pub use self::credit::Credit;
pub use self::metadata::GenericMetadata;
pub use self::record::IssueRecord;
