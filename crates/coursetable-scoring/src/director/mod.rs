//! Cached soft cost with per-course invalidation.


use coursetable_core::{CourseId, Instance, PenaltyWeights, Timetable};

use crate::soft::{self, CostBreakdown};

/// Keeps the soft cost of a grid up to date across moves.
///
/// The cost splits into parts owned by a single course (room capacity,
/// minimum working days, room stability) and parts owned by a single
/// curriculum (isolated lectures). After a move the caller reports the
/// courses whose lectures moved; the next [`calculate_cost`] recomputes
/// only those courses and the curricula containing them.
///
/// With incremental mode off every calculation is a full evaluation.
///
/// [`calculate_cost`]: CostDirector::calculate_cost
///
/// # Example
///
/// ```
/// use coursetable_core::{Instance, PenaltyWeights, Position, Timetable};
/// use coursetable_scoring::{total_cost, CostDirector};
///
/// let instance = Instance::builder("one", 1, 2)
///     .course("c", "t", 1, 2, 10, false)
///     .room("r", 5, 0)
///     .build()
///     .unwrap();
/// let mut grid = Timetable::for_instance(&instance);
/// let mut director = CostDirector::new(&instance, PenaltyWeights::UD2);
/// assert_eq!(director.calculate_cost(&instance, &grid), 10);
///
/// let event = instance.events()[0];
/// grid.assign(event, Position::new(0, 1)).unwrap();
/// director.course_changed(event.course);
/// assert_eq!(director.calculate_cost(&instance, &grid), 10);
/// assert_eq!(director.calculate_cost(&instance, &grid), total_cost(&instance, &grid, &PenaltyWeights::UD2));
/// ```
#[derive(Debug, Clone)]
pub struct CostDirector {
    weights: PenaltyWeights,
    incremental: bool,
    initialized: bool,
    course_costs: Vec<CostBreakdown>,
    curriculum_costs: Vec<i64>,
    dirty_courses: Vec<bool>,
    dirty_curricula: Vec<bool>,
    pending: Vec<CourseId>,
    cached: CostBreakdown,
    calculation_count: u64,
}

impl CostDirector {
    pub fn new(instance: &Instance, weights: PenaltyWeights) -> Self {
        Self {
            weights,
            incremental: true,
            initialized: false,
            course_costs: vec![CostBreakdown::default(); instance.course_count()],
            curriculum_costs: vec![0; instance.curricula().len()],
            dirty_courses: vec![false; instance.course_count()],
            dirty_curricula: vec![false; instance.curricula().len()],
            pending: Vec::new(),
            cached: CostBreakdown::default(),
            calculation_count: 0,
        }
    }

    /// Enables or disables per-course recomputation.
    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    /// Number of cost calculations performed, cached or not.
    pub fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    /// Marks the lectures of `course` as moved.
    pub fn course_changed(&mut self, course: CourseId) {
        if !self.dirty_courses[course.0] {
            self.dirty_courses[course.0] = true;
            self.pending.push(course);
        }
    }

    /// Drops every cached value; the next calculation is a full evaluation.
    pub fn reset(&mut self) {
        self.initialized = false;
        for course in self.pending.drain(..) {
            self.dirty_courses[course.0] = false;
        }
    }

    /// Returns the current soft cost of `grid`.
    pub fn calculate_cost(&mut self, instance: &Instance, grid: &Timetable) -> i64 {
        self.calculate_breakdown(instance, grid).total()
    }

    /// Returns the current soft cost of `grid`, split by constraint.
    pub fn calculate_breakdown(&mut self, instance: &Instance, grid: &Timetable) -> CostBreakdown {
        self.calculation_count += 1;
        if !self.incremental || !self.initialized {
            self.initialize(instance, grid);
        } else if !self.pending.is_empty() {
            self.refresh(instance, grid);
        }
        self.cached
    }

    fn initialize(&mut self, instance: &Instance, grid: &Timetable) {
        let mut total = CostBreakdown::default();
        for course in instance.course_ids() {
            let cost = soft::course_cost(instance, grid, &self.weights, course);
            self.course_costs[course.0] = cost;
            total = total + cost;
        }
        for curriculum in instance.curriculum_ids() {
            let cost = soft::isolated_lectures(instance, grid, &self.weights, curriculum);
            self.curriculum_costs[curriculum.0] = cost;
            total.isolated_lectures += cost;
        }
        for course in self.pending.drain(..) {
            self.dirty_courses[course.0] = false;
        }
        self.cached = total;
        self.initialized = true;
    }

    fn refresh(&mut self, instance: &Instance, grid: &Timetable) {
        let mut curricula = Vec::new();
        for course in std::mem::take(&mut self.pending) {
            self.dirty_courses[course.0] = false;
            let cost = soft::course_cost(instance, grid, &self.weights, course);
            self.cached = self.cached - self.course_costs[course.0] + cost;
            self.course_costs[course.0] = cost;

            for &curriculum in instance.curricula_of(course) {
                if !self.dirty_curricula[curriculum.0] {
                    self.dirty_curricula[curriculum.0] = true;
                    curricula.push(curriculum);
                }
            }
        }
        for curriculum in curricula {
            self.dirty_curricula[curriculum.0] = false;
            let cost = soft::isolated_lectures(instance, grid, &self.weights, curriculum);
            self.cached.isolated_lectures += cost - self.curriculum_costs[curriculum.0];
            self.curriculum_costs[curriculum.0] = cost;
        }
    }
}
