use crate::geom::{Point, Range};

/// Read-only view of a map: its dimensions and which cells can be walked on.
///
/// Pathfinders only ever borrow a store; they never mutate it.
pub trait TileStore {
    /// Map width in cells.
    fn width(&self) -> i32;

    /// Map height in cells.
    fn height(&self) -> i32;

    /// Whether `p` is floor. Points outside the map must return `false`.
    fn is_walkable(&self, p: Point) -> bool;

    /// The whole map as a range starting at the origin.
    fn bounds(&self) -> Range {
        Range::new(0, 0, self.width(), self.height())
    }
}

impl<T: TileStore + ?Sized> TileStore for &T {
    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn is_walkable(&self, p: Point) -> bool {
        (**self).is_walkable(p)
    }
}
