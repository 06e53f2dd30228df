pub mod company;
pub mod job;

pub use company::{Company, CompanyFilter, COMPANY_FIELDS};
pub use job::{Job, JobFilter, JOB_FIELDS};
