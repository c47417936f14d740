pub mod budget;
pub mod error;
pub mod flood;
pub mod nurture;
pub mod post_call;
pub mod report;

pub use budget::BatchBudget;
pub use error::{EngineError, Result};
pub use flood::FloodGuard;
pub use nurture::NurtureGenerator;
pub use post_call::PostCallGenerator;
pub use report::RunReport;
