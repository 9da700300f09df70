pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{
    DownloadRequest, Notice, NoticeLevel, OutputConfiguration, RunEvent, RunPlan, RunStatus,
};
