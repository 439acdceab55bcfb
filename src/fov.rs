use crate::cone::Cone;
use crate::error::{check_in_bounds, FovError};
use crate::grid::{Point, WallMap};
use crate::octant::{Octant, OCTANTS};
use crate::visibility_map::VisibilityMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Default ceiling on the FOV radius
pub const MAX_FOV_RADIUS: i32 = 7;

/// Which cells of the scanned square count as "in range"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeFilter {
    /// max(|dx|, |dy|) < radius
    #[default]
    ChebyshevExclusive,
    /// max(|dx|, |dy|) <= radius
    ChebyshevInclusive,
    /// dx² + dy² <= radius²
    Euclidean,
}

impl RangeFilter {
    pub fn admits(self, dx: i32, dy: i32, radius: i32) -> bool {
        match self {
            RangeFilter::ChebyshevExclusive => dx.abs().max(dy.abs()) < radius,
            RangeFilter::ChebyshevInclusive => dx.abs().max(dy.abs()) <= radius,
            RangeFilter::Euclidean => dx * dx + dy * dy <= radius * radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FovOptions {
    pub max_radius: i32,
    pub range: RangeFilter,
}

impl Default for FovOptions {
    fn default() -> Self {
        FovOptions {
            max_radius: MAX_FOV_RADIUS,
            range: RangeFilter::default(),
        }
    }
}

/// Field of vision by recursive shadowcasting over eight octants.
///
/// Each octant is scanned column by column from the observer outward. The
/// cones that are still open for a column are kept in a work-list; a wall
/// splits a cone into one child per run of open rows. Sibling cones reach
/// disjoint rows, so every cell of the square is examined at most once per
/// octant, and the line rule is the same one `los` uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fov {
    options: FovOptions,
}

impl Fov {
    pub fn new(options: FovOptions) -> Self {
        Fov { options }
    }

    pub fn options(&self) -> FovOptions {
        self.options
    }

    /// Compute the FOV of `center` into `out`, which must have been
    /// allocated for `radius`.
    pub fn compute<M: WallMap + ?Sized>(
        &self,
        map: &M,
        center: Point,
        radius: i32,
        out: &mut VisibilityMap,
    ) -> Result<(), FovError> {
        self.compute_with_probe(map, center, radius, out, |_| {})
    }

    /// Same as `compute`, calling `probe` once for every cell the scan
    /// settles (the centre included). Cells off the map are not reported.
    pub fn compute_with_probe<M, P>(
        &self,
        map: &M,
        center: Point,
        radius: i32,
        out: &mut VisibilityMap,
        mut probe: P,
    ) -> Result<(), FovError>
    where
        M: WallMap + ?Sized,
        P: FnMut(Point),
    {
        if let Err(e) = self.validate(map, center, radius, out) {
            debug!(error = %e, "rejected field of vision query");
            return Err(e);
        }

        out.reset(center);
        probe(center);
        out.set(0, 0, true);

        for octant in &OCTANTS {
            let mut scan = OctantScan {
                map,
                center,
                radius,
                range: self.options.range,
                octant,
                out: &mut *out,
                probe: &mut probe,
            };
            scan.run();
        }
        Ok(())
    }

    fn validate<M: WallMap + ?Sized>(
        &self,
        map: &M,
        center: Point,
        radius: i32,
        out: &VisibilityMap,
    ) -> Result<(), FovError> {
        if radius < 1 || radius > self.options.max_radius {
            return Err(FovError::InvalidRadius {
                radius,
                max: self.options.max_radius,
            });
        }
        if out.radius() != radius {
            return Err(FovError::OutputSizeMismatch {
                expected: 2 * radius + 1,
                actual: out.side(),
            });
        }
        check_in_bounds(map, center)
    }
}

/// FOV with the default options
pub fn fov<M: WallMap + ?Sized>(
    map: &M,
    center: Point,
    radius: i32,
    out: &mut VisibilityMap,
) -> Result<(), FovError> {
    Fov::default().compute(map, center, radius, out)
}

/// State for scanning a single octant
struct OctantScan<'a, M: ?Sized, P> {
    map: &'a M,
    center: Point,
    radius: i32,
    range: RangeFilter,
    octant: &'a Octant,
    out: &'a mut VisibilityMap,
    probe: &'a mut P,
}

impl<'a, M, P> OctantScan<'a, M, P>
where
    M: WallMap + ?Sized,
    P: FnMut(Point),
{
    fn run(&mut self) {
        let mut cones = vec![Cone::full()];
        let mut col = 1;
        let mut widest = 1;
        while col <= self.radius && !cones.is_empty() {
            let mut next = Vec::with_capacity(cones.len());
            for cone in cones {
                self.scan_column(cone, col, &mut next);
            }
            widest = widest.max(next.len());
            cones = next;
            col += 1;
        }
        trace!(octant = self.octant.index(), columns = col - 1, widest, "octant scanned");
    }

    /// Visit the rows `cone` reaches in column `col` and queue one child cone
    /// per run of open rows. A span without walls passes `cone` on unchanged.
    fn scan_column(&mut self, cone: Cone, col: i32, next: &mut Vec<Cone>) {
        let (first, last) = match cone.row_span(col) {
            Some(span) => span,
            None => return,
        };

        let mut run_start: Option<i32> = None;
        let mut wall_below = false;
        for row in first..=last {
            let (dx, dy) = self.octant.to_world(col, row);
            let (x, y) = (self.center.x + dx, self.center.y + dy);
            let on_map = self.map.contains(x, y);
            let opaque = !on_map || self.map.is_wall(x, y);

            if on_map && self.octant.owns(col, row) {
                (self.probe)(Point::new(x, y));
                if self.range.admits(dx, dy, self.radius) {
                    self.out.set(dx, dy, true);
                }
            }

            if opaque {
                if let Some(start) = run_start.take() {
                    let floor = wall_below.then(|| Point::new(col, start));
                    next.push(cone.narrowed(floor, Some(Point::new(col, row))));
                }
                wall_below = true;
            } else if run_start.is_none() {
                run_start = Some(row);
            }
        }

        match run_start {
            Some(start) if wall_below => next.push(cone.narrowed(Some(Point::new(col, start)), None)),
            Some(_) => next.push(cone),
            None => {}
        }
    }
}
