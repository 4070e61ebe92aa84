pub mod dispatch;

pub use dispatch::{build_agent, dispatch};
