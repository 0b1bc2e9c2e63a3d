// src/services/areas.rs

//! City name to area id resolution.

use crate::error::{AppError, Result};
use crate::models::Area;

use super::HttpSource;

/// Depth-first search for an area named `name` (case-insensitive, exact).
/// The first match in document order wins.
pub fn find_area_id(areas: &[Area], name: &str) -> Option<String> {
    let wanted = name.trim().to_lowercase();
    find(areas, &wanted)
}

fn find(areas: &[Area], wanted: &str) -> Option<String> {
    areas.iter().find_map(|area| {
        if area.name.to_lowercase() == wanted {
            Some(area.id.clone())
        } else {
            find(&area.areas, wanted)
        }
    })
}

/// Download the area tree and resolve `name` in it.
pub async fn resolve_area(source: &HttpSource, name: &str) -> Result<String> {
    let areas = source.fetch_areas().await?;
    let id = find_area_id(&areas, name)
        .ok_or_else(|| AppError::validation(format!("Unknown area: {name}")))?;
    log::info!("Resolved area '{}' to id {}", name, id);
    Ok(id)
}
