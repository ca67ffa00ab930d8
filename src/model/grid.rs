//! Uniform cell grid for fixed-radius neighbor queries.
//!
//! The toolkit answers every proximity question (waters near a domain, acceptors near a donor,
//! hydrogens bonded to a donor) through a [`Grid`] built once over the whole atom table. Cells
//! are stored as intrusive linked lists so construction is a single pass over the atoms.

use super::types::Point;
use nalgebra::Vector3;

/// Sentinel value indicating the end of a cell's linked list.
const SENTINEL: u32 = u32::MAX;

/// A uniform spatial grid that bins items into cubic cells.
///
/// Queries with a radius larger than the cell size remain correct; they simply visit more
/// cells. Items outside the bounding box used at construction are never stored.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    cell_size: f64,
    origin: Point,
    dims: Vector3<usize>,
    /// Index of the first item in each cell.
    head: Vec<u32>,
    /// Index of the next item in the same cell.
    next: Vec<u32>,
    items: Vec<(Point, T)>,
}

impl<T> Grid<T> {
    /// Creates a grid enclosing the provided points.
    ///
    /// # Panics
    ///
    /// Panics if `cell_size` is non-positive.
    pub fn new(items: impl IntoIterator<Item = (Point, T)>, cell_size: f64) -> Self {
        assert!(cell_size > 0.0, "Cell size must be positive");

        let input_items: Vec<_> = items.into_iter().collect();
        if input_items.is_empty() {
            return Self {
                cell_size,
                origin: Point::origin(),
                dims: Vector3::zeros(),
                head: Vec::new(),
                next: Vec::new(),
                items: Vec::new(),
            };
        }

        let mut min = Point::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point::new(f64::MIN, f64::MIN, f64::MIN);
        for (pos, _) in &input_items {
            min = min.inf(pos);
            max = max.sup(pos);
        }
        let epsilon = 1e-6;
        max += Vector3::new(epsilon, epsilon, epsilon);

        let extent = max - min;
        let dims = Vector3::new(
            ((extent.x / cell_size).ceil() as usize).max(1),
            ((extent.y / cell_size).ceil() as usize).max(1),
            ((extent.z / cell_size).ceil() as usize).max(1),
        );

        let mut head = vec![SENTINEL; dims.x * dims.y * dims.z];
        let mut next = vec![SENTINEL; input_items.len()];
        let mut stored = Vec::with_capacity(input_items.len());

        for (i, (pos, item)) in input_items.into_iter().enumerate() {
            if let Some(cell) = cell_index(&pos, dims, min, cell_size) {
                next[i] = head[cell];
                head[cell] = i as u32;
            }
            stored.push((pos, item));
        }

        Self {
            cell_size,
            origin: min,
            dims,
            head,
            next,
            items: stored,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over items whose stored position lies within `radius` of `center` (inclusive).
    pub fn within<'a>(&'a self, center: &Point, radius: f64) -> Neighborhood<'a, T> {
        if self.is_empty() {
            return Neighborhood::exhausted(self, *center, radius);
        }

        let offset = Vector3::new(radius, radius, radius);
        let (min_x, min_y, min_z) = self.clamped_coords(&(center - offset));
        let (max_x, max_y, max_z) = self.clamped_coords(&(center + offset));

        Neighborhood {
            grid: self,
            min: (min_x, min_y),
            max: (max_x, max_y, max_z),
            cursor: (min_x, min_y, min_z),
            item: SENTINEL,
            center: *center,
            radius_sq: radius * radius,
        }
    }

    /// Checks whether any item within `radius` of `point` satisfies `predicate`.
    pub fn any_within<F>(&self, point: &Point, radius: f64, mut predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.within(point, radius).any(|(_, item)| predicate(item))
    }

    fn clamped_coords(&self, pos: &Point) -> (usize, usize, usize) {
        let offset = pos - self.origin;
        let x = (offset.x / self.cell_size).floor() as isize;
        let y = (offset.y / self.cell_size).floor() as isize;
        let z = (offset.z / self.cell_size).floor() as isize;

        (
            x.clamp(0, (self.dims.x as isize) - 1) as usize,
            y.clamp(0, (self.dims.y as isize) - 1) as usize,
            z.clamp(0, (self.dims.z as isize) - 1) as usize,
        )
    }
}

fn cell_index(pos: &Point, dims: Vector3<usize>, origin: Point, cell_size: f64) -> Option<usize> {
    if pos.x < origin.x || pos.y < origin.y || pos.z < origin.z {
        return None;
    }

    let offset = pos - origin;
    let x = (offset.x / cell_size).floor() as usize;
    let y = (offset.y / cell_size).floor() as usize;
    let z = (offset.z / cell_size).floor() as usize;

    if x >= dims.x || y >= dims.y || z >= dims.z {
        return None;
    }

    Some(x + y * dims.x + z * dims.x * dims.y)
}

/// Iterator over the items of a [`Grid`] lying inside a query sphere.
///
/// Yields the stored position alongside each item so callers can reuse it without a second
/// lookup.
pub struct Neighborhood<'a, T> {
    grid: &'a Grid<T>,
    min: (usize, usize),
    max: (usize, usize, usize),
    cursor: (usize, usize, usize),
    item: u32,
    center: Point,
    radius_sq: f64,
}

impl<'a, T> Neighborhood<'a, T> {
    fn exhausted(grid: &'a Grid<T>, center: Point, radius: f64) -> Self {
        Self {
            grid,
            min: (0, 0),
            max: (0, 0, 0),
            cursor: (0, 0, 1),
            item: SENTINEL,
            center,
            radius_sq: radius * radius,
        }
    }
}

impl<'a, T> Iterator for Neighborhood<'a, T> {
    type Item = (&'a Point, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.item != SENTINEL {
                let (pos, item) = &self.grid.items[self.item as usize];
                self.item = self.grid.next[self.item as usize];

                if nalgebra::distance_squared(pos, &self.center) <= self.radius_sq {
                    return Some((pos, item));
                }
                continue;
            }

            let (x, y, z) = &mut self.cursor;
            if *x > self.max.0 {
                *x = self.min.0;
                *y += 1;
            }
            if *y > self.max.1 {
                *y = self.min.1;
                *z += 1;
            }
            if *z > self.max.2 {
                return None;
            }

            let dims = self.grid.dims;
            let cell = *x + *y * dims.x + *z * dims.x * dims.y;
            *x += 1;

            if cell < self.grid.head.len() {
                self.item = self.grid.head[cell];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_within_returns_only_items_inside_radius() {
        let points = vec![
            (Point::new(0.0, 0.0, 0.0), "Center"),
            (Point::new(0.9, 0.0, 0.0), "Inside"),
            (Point::new(1.1, 0.0, 0.0), "Outside"),
        ];
        let grid = Grid::new(points, 2.0);

        let found: Vec<_> = grid
            .within(&Point::origin(), 1.0)
            .map(|(_, item)| *item)
            .collect();

        assert_eq!(found.len(), 2);
        assert!(found.contains(&"Center"));
        assert!(found.contains(&"Inside"));
    }

    #[test]
    fn grid_within_includes_boundary_points() {
        let grid = Grid::new(vec![(Point::new(1.0, 0.0, 0.0), 7)], 2.0);

        assert_eq!(grid.within(&Point::origin(), 1.0).count(), 1);
        assert_eq!(grid.within(&Point::origin(), 0.99).count(), 0);
    }

    #[test]
    fn grid_within_spans_multiple_cells_for_large_radius() {
        let points = vec![
            (Point::new(0.0, 0.0, 0.0), 1),
            (Point::new(3.0, 0.0, 0.0), 2),
            (Point::new(6.0, 0.0, 0.0), 3),
        ];
        let grid = Grid::new(points, 1.0);

        let found: Vec<_> = grid
            .within(&Point::new(3.0, 0.0, 0.0), 3.5)
            .map(|(_, item)| *item)
            .collect();

        assert_eq!(found.len(), 3);
    }

    #[test]
    fn grid_handles_empty_input() {
        let grid: Grid<i32> = Grid::new(Vec::new(), 1.0);

        assert!(grid.is_empty());
        assert_eq!(grid.within(&Point::origin(), 5.0).count(), 0);
    }

    #[test]
    fn grid_handles_dense_packing() {
        let points: Vec<_> = (0..100).map(|i| (Point::new(0.1, 0.1, 0.1), i)).collect();
        let grid = Grid::new(points, 1.0);

        assert_eq!(grid.len(), 100);
        assert_eq!(grid.within(&Point::new(0.1, 0.1, 0.1), 0.5).count(), 100);
    }

    #[test]
    fn grid_any_within_applies_predicate() {
        let points = vec![
            (Point::new(0.0, 0.0, 0.0), 1),
            (Point::new(10.0, 10.0, 10.0), 2),
        ];
        let grid = Grid::new(points, 1.0);

        assert!(grid.any_within(&Point::origin(), 0.1, |&i| i == 1));
        assert!(!grid.any_within(&Point::origin(), 0.1, |&i| i == 2));
        assert!(grid.any_within(&Point::new(10.0, 10.0, 10.0), 0.1, |&i| i == 2));
    }

    #[test]
    fn grid_query_outside_bounds_is_clamped() {
        let grid = Grid::new(vec![(Point::new(0.0, 0.0, 0.0), 'a')], 1.0);

        assert_eq!(grid.within(&Point::new(-0.5, 0.0, 0.0), 0.6).count(), 1);
        assert_eq!(grid.within(&Point::new(-50.0, 0.0, 0.0), 1.0).count(), 0);
    }
}
