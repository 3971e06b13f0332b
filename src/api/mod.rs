// Thin namespace wrapper for API-layer components
pub mod handlers {
    pub use crate::handlers::*;
}

pub mod inquiry_handler {
    pub use crate::inquiry_handler::*;
}

pub mod project_handler {
    pub use crate::project_handler::*;
}
