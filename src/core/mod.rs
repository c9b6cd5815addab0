pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Domain, IdentitySet, LoadReport};
pub use crate::domain::ports::{ConfigProvider, IdentitySource, Pipeline, Storage};
pub use crate::utils::error::Result;
