use foundation::LngLat;

/// Initial view configuration handed to the rendering surface at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub style_url: String,
    pub center: LngLat,
    pub zoom: f64,
    /// Credential for the engine's tile requests. Absent token degrades to a
    /// blocked tile load; the core keeps working against a blank surface.
    pub access_token: Option<String>,
}

impl MapConfig {
    pub fn with_access_token(token: Option<String>) -> Self {
        Self {
            access_token: token,
            ..Self::default()
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style_url: "mapbox://styles/mapbox/streets-v11".to_string(),
            center: LngLat::new(-74.5, 40.0),
            zoom: 9.0,
            access_token: None,
        }
    }
}
