mod types;
mod validation;

pub use types::{ApplicantProfile, ClientType, Profession};
pub use validation::validate_profile;
pub(crate) use validation::check_non_negative;
