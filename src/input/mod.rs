use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::profile::ApplicantProfile;

/// Load an applicant profile from a YAML file
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The YAML cannot be parsed into a profile (unknown fields included)
pub fn load_profile(path: &Path) -> Result<ApplicantProfile> {
    if !path.exists() {
        anyhow::bail!("Profile file not found at {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file at {}", path.display()))?;

    parse_profile(&content)
        .with_context(|| format!("Failed to parse profile: invalid YAML in {}", path.display()))
}

/// Parse a profile document from YAML text.
pub fn parse_profile(content: &str) -> Result<ApplicantProfile> {
    let profile: ApplicantProfile = serde_saphyr::from_str(content)?;
    Ok(profile)
}
