mod article;
mod report;

pub use article::*;
pub use report::*;
