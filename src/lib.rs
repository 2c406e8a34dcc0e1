pub mod allowlist;
pub mod bucket;
pub mod decode;
pub mod export;
pub mod lines;
pub mod parse;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod report;
pub mod source;
pub mod summary;

pub mod prelude {
    pub use crate::allowlist::AllowList;
    pub use crate::pipeline::{SiftConfig, SiftOutcome, Sifter};
    pub use crate::record::CredRecord;
}
