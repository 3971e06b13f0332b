//! External service integrations.

pub mod llm_client {
    pub use crate::llm_client::*;
}

pub mod record_store {
    pub use crate::record_store::*;
}
