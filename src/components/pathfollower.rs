//! Step-by-step movement along a planned path.
//!
//! A [`PathFollower`] owns a [`Path`] and a [`MovingEntity`]. Every tick that
//! is a positive multiple of the step cadence moves the entity one node
//! forward. Facing is derived from the vector between the current node and
//! the next one; once the entity has arrived, the last facing is kept.
//!
//! Gait animation is independent of the step cadence: the frame index is
//! `(tick / gait_ticks_per_frame) % gait_frames`, so sprites keep walking
//! smoothly whatever the cadence.

use std::fmt;

use glam::Vec2;

use crate::resources::grid::Node;
use crate::systems::pathplanner::Path;

/// One of the four grid facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Facing from `from` towards `to`; rows take precedence over columns.
    /// `None` when both nodes are equal.
    pub fn between(from: Node, to: Node) -> Option<Direction> {
        use std::cmp::Ordering::*;
        match (to.row.cmp(&from.row), to.col.cmp(&from.col)) {
            (Greater, _) => Some(Direction::Down),
            (Less, _) => Some(Direction::Up),
            (Equal, Greater) => Some(Direction::Right),
            (Equal, Less) => Some(Direction::Left),
            (Equal, Equal) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity moved by a [`PathFollower`]. Position is in cell units
/// (`x` = column, `y` = row) with sub-cell interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingEntity {
    pub position: Vec2,
    pub facing: Direction,
    pub path_index: usize,
}

/// Snapshot returned by [`PathFollower::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerState {
    pub position: Vec2,
    pub direction: Direction,
    pub arrived: bool,
    pub gait_frame: usize,
}

/// Cadence settings for a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowerOptions {
    /// Ticks per grid step.
    pub step_cadence: u32,
    pub gait_ticks_per_frame: u32,
    pub gait_frames: usize,
}

impl Default for FollowerOptions {
    fn default() -> Self {
        Self {
            step_cadence: 6,
            gait_ticks_per_frame: 3,
            gait_frames: 3,
        }
    }
}

fn node_position(node: Node) -> Vec2 {
    Vec2::new(node.col as f32, node.row as f32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    path: Path,
    entity: MovingEntity,
    options: FollowerOptions,
    elapsed: u64,
    gait_frame: usize,
}

impl PathFollower {
    /// Panics never; an empty path is treated as already arrived at the
    /// origin, but [`plan`](crate::systems::pathplanner::plan) never yields one.
    pub fn new(path: Path, options: FollowerOptions) -> Self {
        let options = FollowerOptions {
            step_cadence: options.step_cadence.max(1),
            gait_ticks_per_frame: options.gait_ticks_per_frame.max(1),
            gait_frames: options.gait_frames.max(1),
        };
        let start = path.first().copied().unwrap_or(Node::new(0, 0));
        let facing = match path.get(1) {
            Some(next) => Direction::between(start, *next).unwrap_or_default(),
            None => Direction::default(),
        };
        Self {
            path,
            entity: MovingEntity {
                position: node_position(start),
                facing,
                path_index: 0,
            },
            options,
            elapsed: 0,
            gait_frame: 0,
        }
    }

    /// Advance to scene-local `tick`.
    pub fn advance(&mut self, tick: u64) -> FollowerState {
        let last = self.path.len().saturating_sub(1);
        let cadence = u64::from(self.options.step_cadence);

        if self.entity.path_index < last {
            let here = self.path[self.entity.path_index];
            let next = self.path[self.entity.path_index + 1];
            if let Some(direction) = Direction::between(here, next) {
                self.entity.facing = direction;
            }
            if tick > 0 && tick % cadence == 0 {
                self.entity.path_index += 1;
            }
        }

        self.entity.position = if self.entity.path_index < last {
            let here = node_position(self.path[self.entity.path_index]);
            let next = node_position(self.path[self.entity.path_index + 1]);
            here.lerp(next, (tick % cadence) as f32 / cadence as f32)
        } else {
            self.path.last().copied().map(node_position).unwrap_or_default()
        };

        self.gait_frame = ((tick / u64::from(self.options.gait_ticks_per_frame))
            % self.options.gait_frames as u64) as usize;
        self.elapsed = tick;
        self.state()
    }

    /// Advance by one tick of the follower's own clock.
    pub fn tick(&mut self) -> FollowerState {
        self.advance(self.elapsed + 1)
    }

    pub fn state(&self) -> FollowerState {
        FollowerState {
            position: self.entity.position,
            direction: self.entity.facing,
            arrived: self.arrived(),
            gait_frame: self.gait_frame,
        }
    }

    /// True exactly when the cursor sits on the final node.
    pub fn arrived(&self) -> bool {
        self.entity.path_index + 1 >= self.path.len()
    }

    pub fn entity(&self) -> &MovingEntity {
        &self.entity
    }

    pub fn path(&self) -> &[Node] {
        &self.path
    }

    pub fn current_node(&self) -> Option<Node> {
        self.path.get(self.entity.path_index).copied()
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_path() -> Path {
        vec![
            Node::new(0, 0),
            Node::new(0, 1),
            Node::new(0, 2),
            Node::new(1, 2),
            Node::new(2, 2),
        ]
    }

    #[test]
    fn test_direction_between() {
        let o = Node::new(1, 1);
        assert_eq!(Direction::between(o, Node::new(2, 1)), Some(Direction::Down));
        assert_eq!(Direction::between(o, Node::new(0, 1)), Some(Direction::Up));
        assert_eq!(Direction::between(o, Node::new(1, 2)), Some(Direction::Right));
        assert_eq!(Direction::between(o, Node::new(1, 0)), Some(Direction::Left));
        assert_eq!(Direction::between(o, o), None);
    }

    #[test]
    fn test_direction_sequence_right_right_down_down() {
        let mut f = PathFollower::new(
            scenario_path(),
            FollowerOptions {
                step_cadence: 1,
                ..FollowerOptions::default()
            },
        );
        let mut dirs = Vec::new();
        while !f.arrived() {
            dirs.push(f.tick().direction);
        }
        assert_eq!(
            dirs,
            vec![
                Direction::Right,
                Direction::Right,
                Direction::Down,
                Direction::Down
            ]
        );
        assert_eq!(f.tick().direction, Direction::Down);
    }

    #[test]
    fn test_steps_only_on_cadence_multiples() {
        let mut f = PathFollower::new(scenario_path(), FollowerOptions::default());
        for t in 1..6 {
            f.advance(t);
            assert_eq!(f.entity().path_index, 0);
        }
        f.advance(6);
        assert_eq!(f.entity().path_index, 1);
        f.advance(11);
        assert_eq!(f.entity().path_index, 1);
        f.advance(12);
        assert_eq!(f.entity().path_index, 2);
    }

    #[test]
    fn test_arrived_is_idempotent() {
        let mut f = PathFollower::new(scenario_path(), FollowerOptions::default());
        let mut arrivals = 0;
        let mut was = false;
        for t in 1..=200 {
            let s = f.advance(t);
            if s.arrived && !was {
                arrivals += 1;
            }
            if was {
                assert!(s.arrived);
            }
            was = s.arrived;
        }
        assert_eq!(arrivals, 1);
        assert_eq!(f.current_node(), Some(Node::new(2, 2)));
        assert_eq!(f.state().position, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_sub_cell_interpolation() {
        let mut f = PathFollower::new(scenario_path(), FollowerOptions::default());
        let s = f.advance(3);
        assert!((s.position.x - 0.5).abs() < 1e-6);
        assert_eq!(s.position.y, 0.0);
    }

    #[test]
    fn test_gait_independent_of_cadence() {
        let mut slow = PathFollower::new(
            scenario_path(),
            FollowerOptions {
                step_cadence: 30,
                ..FollowerOptions::default()
            },
        );
        let mut fast = PathFollower::new(scenario_path(), FollowerOptions::default());
        for t in 1..=20 {
            assert_eq!(slow.advance(t).gait_frame, fast.advance(t).gait_frame);
        }
        assert_eq!(fast.advance(9).gait_frame, 0);
        assert_eq!(fast.advance(10).gait_frame, 0);
        assert_eq!(fast.advance(12).gait_frame, 1);
    }

    #[test]
    fn test_single_node_path_arrived() {
        let f = PathFollower::new(vec![Node::new(3, 3)], FollowerOptions::default());
        assert!(f.arrived());
        assert_eq!(f.state().position, Vec2::new(3.0, 3.0));
    }
}
