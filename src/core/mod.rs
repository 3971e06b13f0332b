// Domain-layer modules and shared errors/models
pub mod extraction {
    pub use crate::extraction::*;
}

pub mod intelligence {
    pub use crate::intelligence::*;
}

pub mod pitch {
    pub use crate::pitch::*;
}

pub mod models {
    pub use crate::models::*;
    pub use crate::inquiry_models::*;
    pub use crate::project_models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
