//! Surface geometry supplied per resource layer.
//!
//! Areas arrive already computed in square meters from the drawing layer;
//! this crate does no geodesic work of its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A closed polygon from the drawing layer, reduced to its area and an
/// optional catchment material key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfacePolygon {
    pub area_m2: f64,
    #[serde(default)]
    pub material: Option<String>,
}

/// Per-layer geometry: either one scalar area or a list of drawn polygons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GeometryInput {
    Area(f64),
    Polygons(Vec<SurfacePolygon>),
}

impl GeometryInput {
    /// Raw total area (m²), negative polygon areas floored at 0.
    pub fn total_area_m2(&self) -> f64 {
        match self {
            Self::Area(a) => super::finite_or_zero(*a).max(0.0),
            Self::Polygons(polys) => polys
                .iter()
                .map(|p| super::finite_or_zero(p.area_m2).max(0.0))
                .sum(),
        }
    }
}

impl Default for GeometryInput {
    fn default() -> Self {
        Self::Area(0.0)
    }
}

/// Water-layer geometry plus the material model used to turn raw area into
/// effective catchment area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatchmentSurfaces {
    pub geometry: GeometryInput,
    /// Material assumed for polygons without a material key and for the
    /// scalar fallback area.
    pub default_material: String,
    /// Runoff efficiency per material key, fraction of rainfall collected.
    pub materials: BTreeMap<String, f64>,
}

impl CatchmentSurfaces {
    /// Runoff efficiency for a polygon's material, clamped to [0, 1].
    /// Unknown keys fall back to the default material, then to 0.
    pub fn efficiency(&self, material: Option<&str>) -> f64 {
        let key = material.unwrap_or(&self.default_material);
        let raw = self
            .materials
            .get(key)
            .or_else(|| self.materials.get(&self.default_material))
            .copied()
            .unwrap_or(0.0);
        super::finite_or_zero(raw).clamp(0.0, 1.0)
    }

    /// Material label used for a polygon in the per-material breakdown.
    pub fn material_label<'a>(&'a self, material: Option<&'a str>) -> &'a str {
        material.unwrap_or(&self.default_material)
    }
}

impl Default for CatchmentSurfaces {
    fn default() -> Self {
        let mut materials = BTreeMap::new();
        materials.insert("metal".to_string(), 0.92);
        materials.insert("tile".to_string(), 0.84);
        materials.insert("concrete".to_string(), 0.76);
        materials.insert("asphalt".to_string(), 0.70);
        Self {
            geometry: GeometryInput::default(),
            default_material: "metal".to_string(),
            materials,
        }
    }
}
