// Domain-layer modules and shared errors/models
pub mod engine {
    pub use crate::engine::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod decision {
    pub use crate::decision::*;
}

pub mod escalation {
    pub use crate::escalation::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod policy {
    pub use crate::policy::*;
}

pub mod errors {
    pub use crate::errors::*;
}
