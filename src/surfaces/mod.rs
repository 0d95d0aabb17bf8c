//! Concrete search pages and edit forms of the recruiting platform.

pub mod application;
pub mod company;
pub mod job_seeker;
pub mod profiles;
pub mod vacancy;

pub use application::ApplicationSearch;
pub use company::CompanySearch;
pub use job_seeker::JobSeekerSearch;
pub use profiles::{CompanyProfileForm, JobSeekerProfileForm, VacancyForm};
pub use vacancy::VacancySearch;
