/// Settings for [`HierarchicalPathfinder`](crate::HierarchicalPathfinder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    /// Side length of a tile, in cells. Grid dimensions must be multiples
    /// of it.
    pub tile_split: i32,
    /// Refuse to place an endpoint outside the grid. The endpoint is then
    /// left unplaced and the query has no path.
    pub validate_endpoints: bool,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            tile_split: 8,
            validate_endpoints: true,
        }
    }
}
