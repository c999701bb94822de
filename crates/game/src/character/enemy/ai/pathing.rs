use bevy::prelude::*;
use pathfinding::prelude::astar;
use serde::Deserialize;
use std::collections::VecDeque;
use utils::math::{horizontal_direction, horizontal_distance};

use crate::character::movement::PlayArea;
use crate::config::ConfigError;


const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;


#[derive(Debug, Clone, Copy, Reflect, PartialEq, Eq, Default)]
pub enum PathStatus {
    #[default]
    Idle,
    DirectPath,
    FollowingPath,
    Blocked,
}

/// Navigation request and steering output for one agent.
#[derive(Component, Debug, Clone, Default)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub waypoints: VecDeque<Vec3>,
    pub velocity: Vec3,
    pub speed: f32,
    pub path_status: PathStatus,
    planned_for: Option<Vec3>,
    planned_at: f32,
    suspended: Option<Vec3>,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self { speed, ..Default::default() }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.waypoints.clear();
        self.velocity = Vec3::ZERO;
        self.path_status = PathStatus::Idle;
        self.planned_for = None;
    }

    /// Drops the current destination but remembers it for `resume`.
    pub fn suspend(&mut self) {
        if let Some(destination) = self.destination {
            self.suspended = Some(destination);
        }
        self.clear_destination();
    }

    pub fn resume(&mut self) {
        if let Some(destination) = self.suspended.take() {
            self.set_destination(destination);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.velocity.length_squared() <= f32::EPSILON
    }

    fn needs_path(&self, now: f32, config: &PathfindingConfig) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };
        match self.planned_for {
            None => true,
            Some(planned) => {
                horizontal_distance(planned, destination) > config.repath_distance
                    || now - self.planned_at >= config.recalculation_interval
            }
        }
    }
}


#[derive(Resource, Reflect, Clone, Debug, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct PathfindingConfig {
    // How often to recalculate paths (in seconds)
    pub recalculation_interval: f32,
    // Replan right away when the destination moved this far
    pub repath_distance: f32,
    // Maximum path length
    pub max_path_length: usize,
    // Waypoint reach distance
    pub waypoint_reach_distance: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            recalculation_interval: 0.5,
            repath_distance: 2.0,
            max_path_length: 64,
            waypoint_reach_distance: 0.5,
        }
    }
}

impl PathfindingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recalculation_interval < 0.0 || self.repath_distance < 0.0 {
            return Err(ConfigError::invalid("pathfinding.recalculation_interval", "must not be negative"));
        }
        if self.max_path_length == 0 {
            return Err(ConfigError::invalid("pathfinding.max_path_length", "must be positive"));
        }
        if self.waypoint_reach_distance <= 0.0 {
            return Err(ConfigError::invalid("pathfinding.waypoint_reach_distance", "must be positive"));
        }
        Ok(())
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

/// Walkability grid laid over the ground plane. Cell `(0, 0)` starts at `origin`.
#[derive(Resource, Debug, Clone)]
pub struct NavGrid {
    origin: Vec2,
    cell_size: f32,
    width: i32,
    depth: i32,
    blocked: Vec<bool>,
}

impl NavGrid {
    pub fn new(origin: Vec2, cell_size: f32, width: u32, depth: u32) -> Self {
        let cell_size = cell_size.max(f32::EPSILON);
        Self {
            origin,
            cell_size,
            width: width as i32,
            depth: depth as i32,
            blocked: vec![false; (width * depth) as usize],
        }
    }

    /// Grid spanning the whole play area.
    pub fn covering(area: &PlayArea, cell_size: f32) -> Self {
        let origin = Vec2::new(area.center.x - area.half_extents.x, area.center.z - area.half_extents.y);
        let width = (area.half_extents.x * 2.0 / cell_size).ceil().max(1.0) as u32;
        let depth = (area.half_extents.y * 2.0 / cell_size).ceil().max(1.0) as u32;
        Self::new(origin, cell_size, width, depth)
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if cell.x < 0 || cell.z < 0 || cell.x >= self.width || cell.z >= self.depth {
            return None;
        }
        Some((cell.z * self.width + cell.x) as usize)
    }

    /// Cell under `position`. The far edge of the grid belongs to the last
    /// cell, so a position clamped onto the play area boundary still resolves.
    pub fn cell_at(&self, position: Vec3) -> Option<GridCell> {
        Some(GridCell {
            x: self.axis_cell(position.x - self.origin.x, self.width)?,
            z: self.axis_cell(position.z - self.origin.y, self.depth)?,
        })
    }

    fn axis_cell(&self, local: f32, count: i32) -> Option<i32> {
        if local < 0.0 || local > count as f32 * self.cell_size {
            return None;
        }
        Some(((local / self.cell_size).floor() as i32).min(count - 1))
    }

    pub fn cell_center(&self, cell: GridCell, height: f32) -> Vec3 {
        Vec3::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.cell_size,
            height,
            self.origin.y + (cell.z as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.index(cell).is_some_and(|i| !self.blocked[i])
    }

    pub fn set_blocked(&mut self, cell: GridCell, blocked: bool) {
        if let Some(i) = self.index(cell) {
            self.blocked[i] = blocked;
        }
    }

    /// Blocks every cell whose center lies inside the x/z rectangle.
    pub fn block_rect(&mut self, min: Vec2, max: Vec2) {
        for z in 0..self.depth {
            for x in 0..self.width {
                let cell = GridCell { x, z };
                let center = self.cell_center(cell, 0.0);
                if center.x >= min.x && center.x <= max.x && center.z >= min.y && center.z <= max.y {
                    self.set_blocked(cell, true);
                }
            }
        }
    }

    fn successors(&self, cell: &GridCell) -> Vec<(GridCell, u32)> {
        let mut out = Vec::with_capacity(8);
        for dz in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let next = GridCell { x: cell.x + dx, z: cell.z + dz };
                if !self.is_walkable(next) {
                    continue;
                }
                if dx != 0 && dz != 0 {
                    // no corner cutting
                    let side_a = GridCell { x: cell.x + dx, z: cell.z };
                    let side_b = GridCell { x: cell.x, z: cell.z + dz };
                    if !self.is_walkable(side_a) || !self.is_walkable(side_b) {
                        continue;
                    }
                    out.push((next, DIAGONAL_COST));
                } else {
                    out.push((next, STRAIGHT_COST));
                }
            }
        }
        out
    }

    /// Waypoints from `from` to `to`, excluding the start cell and ending
    /// exactly at `to`. `None` when either end is off-grid, the goal is
    /// blocked, or no route exists.
    pub fn find_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>> {
        let start = self.cell_at(from)?;
        let goal = self.cell_at(to)?;
        if !self.is_walkable(goal) {
            return None;
        }
        if start == goal {
            return Some(vec![to]);
        }

        let (cells, _cost) = astar(
            &start,
            |cell| self.successors(cell),
            |cell| octile(cell, &goal),
            |cell| *cell == goal,
        )?;

        let mut waypoints: Vec<Vec3> = cells
            .iter()
            .skip(1)
            .map(|cell| self.cell_center(*cell, from.y))
            .collect();
        if let Some(last) = waypoints.last_mut() {
            *last = to;
        }
        Some(waypoints)
    }
}

fn octile(a: &GridCell, b: &GridCell) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dz = a.z.abs_diff(b.z);
    STRAIGHT_COST * dx.max(dz) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dz)
}


// Plans (or replans) a route for every agent with a destination
pub fn calculate_paths(
    time: Res<Time>,
    grid: Option<Res<NavGrid>>,
    config: Res<PathfindingConfig>,
    mut agents: Query<(Entity, &Transform, &mut NavAgent)>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, mut agent) in agents.iter_mut() {
        if !agent.needs_path(now, &config) {
            continue;
        }
        let Some(destination) = agent.destination else {
            continue;
        };

        agent.planned_for = Some(destination);
        agent.planned_at = now;

        let Some(grid) = grid.as_ref() else {
            agent.waypoints = VecDeque::from([destination]);
            agent.path_status = PathStatus::DirectPath;
            continue;
        };

        match grid.find_path(transform.translation, destination) {
            Some(mut points) => {
                points.truncate(config.max_path_length);
                agent.waypoints = points.into();
                agent.path_status = PathStatus::FollowingPath;
            }
            None => {
                agent.waypoints.clear();
                agent.path_status = PathStatus::Blocked;
                debug!("no path for {:?} toward {:?}", entity, destination);
            }
        }
    }
}

// Turns the front waypoint into a velocity
pub fn steer_agents(
    config: Res<PathfindingConfig>,
    mut agents: Query<(&Transform, &mut NavAgent)>,
) {
    for (transform, mut agent) in agents.iter_mut() {
        let position = transform.translation;

        while let Some(waypoint) = agent.waypoints.front() {
            if horizontal_distance(position, *waypoint) <= config.waypoint_reach_distance {
                agent.waypoints.pop_front();
            } else {
                break;
            }
        }

        agent.velocity = match (agent.destination, agent.waypoints.front()) {
            (Some(_), Some(waypoint)) => horizontal_direction(position, *waypoint) * agent.speed,
            _ => Vec3::ZERO,
        };
    }
}
