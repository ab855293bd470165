pub mod stage0_normalize;
pub mod stage1_score;
pub mod stage2_aggregate;
pub mod stage3_persist;
pub mod stage_chat;

pub use stage0_normalize::*;
pub use stage1_score::*;
pub use stage2_aggregate::*;
pub use stage3_persist::*;
pub use stage_chat::*;
