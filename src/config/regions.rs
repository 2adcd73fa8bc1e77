//! Region map loading
//!
//! The region map is a JSON array of records:
//!
//! ```json
//! [
//!   { "province": "北京", "联通": "bj-cu-v4.ip.example:80", "移动": "", "电信": "..." }
//! ]
//! ```
//!
//! Missing provider keys are treated as empty (provider not configured).

use crate::{
    defaults,
    error::{AppError, ErrorContext, Result},
    models::RegionRecord,
};
use std::fs;
use std::path::Path;

/// Read and parse the region map at `path`
pub fn load_region_map(path: &Path) -> Result<Vec<RegionRecord>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::io(format!("Failed to read region map '{}': {}", path.display(), e))
    })?;

    parse_region_map(&content)
        .with_context(|| format!("Invalid region map '{}'", path.display()))
}

/// Parse region map JSON
pub fn parse_region_map(content: &str) -> Result<Vec<RegionRecord>> {
    let regions: Vec<RegionRecord> = serde_json::from_str(content)?;

    if let Some(index) = regions.iter().position(|r| r.region.trim().is_empty()) {
        return Err(AppError::parse(format!("Region #{} has an empty name", index + 1)));
    }

    Ok(regions)
}

/// Keep only the first few regions when test mode is enabled
pub fn apply_test_mode(mut regions: Vec<RegionRecord>, test_mode: bool) -> Vec<RegionRecord> {
    if test_mode {
        regions.truncate(defaults::TEST_MODE_REGION_LIMIT);
    }
    regions
}
