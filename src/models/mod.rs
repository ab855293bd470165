pub mod analysis;
pub mod job;
pub mod record;
pub mod request;
pub mod stats;
pub mod transcript;

pub use analysis::*;
pub use job::*;
pub use record::*;
pub use request::*;
pub use stats::*;
pub use transcript::*;
