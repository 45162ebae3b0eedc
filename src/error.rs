use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// The command line step that failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load settings")]
    Settings,
    #[display("could not classify directory")]
    Classify,
    #[display("could not merge metadata documents")]
    Merge,
    #[display("could not start the async runtime")]
    Runtime,
    #[display("I/O error")]
    Io,
}
