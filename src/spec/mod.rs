mod load;
mod types;

pub use load::*;
pub use types::*;
pub(crate) use types::verb_serde;
