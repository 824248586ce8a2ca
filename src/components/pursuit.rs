//! Plan-then-follow beat.
//!
//! A [`Pursuit`] holds the grid and the two endpoints. Planning happens when
//! the beat starts; on success a [`PathFollower`] walks the route, on
//! [`EngineError::PathNotFound`] the pursuit is aborted in place. The mover
//! stays on its start node in that case.

use glam::Vec2;
use log::{debug, warn};

use crate::components::pathfollower::{
    Direction, FollowerOptions, FollowerState, PathFollower,
};
use crate::error::EngineError;
use crate::resources::grid::{Node, OccupancyGrid};
use crate::systems::pathplanner::plan;

#[derive(Debug, Clone, PartialEq)]
pub enum PursuitOutcome {
    Pending,
    Following,
    Arrived,
    /// Planning failed; the error is kept for the scene to report.
    Aborted(EngineError),
}

#[derive(Debug, Clone)]
pub struct Pursuit {
    grid: OccupancyGrid,
    start: Node,
    goal: Node,
    options: FollowerOptions,
    follower: Option<PathFollower>,
    outcome: PursuitOutcome,
}

impl Pursuit {
    pub fn new(grid: OccupancyGrid, start: Node, goal: Node, options: FollowerOptions) -> Self {
        Self {
            grid,
            start,
            goal,
            options,
            follower: None,
            outcome: PursuitOutcome::Pending,
        }
    }

    /// Plan the route and begin following it.
    pub fn start(&mut self) {
        match plan(&self.grid, self.start, self.goal) {
            Ok(path) => {
                debug!(
                    "Pursuit {} -> {}: {} steps",
                    self.start,
                    self.goal,
                    path.len() - 1
                );
                let follower = PathFollower::new(path, self.options);
                self.outcome = if follower.arrived() {
                    PursuitOutcome::Arrived
                } else {
                    PursuitOutcome::Following
                };
                self.follower = Some(follower);
            }
            Err(err) => {
                warn!("Pursuit aborted: {}", err);
                self.follower = None;
                self.outcome = PursuitOutcome::Aborted(err);
            }
        }
    }

    pub fn tick(&mut self) -> Option<FollowerState> {
        let follower = self.follower.as_mut()?;
        let state = follower.tick();
        if state.arrived && self.outcome == PursuitOutcome::Following {
            debug!("Pursuit arrived at {}", self.goal);
            self.outcome = PursuitOutcome::Arrived;
        }
        Some(state)
    }

    /// Arrived or aborted.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.outcome,
            PursuitOutcome::Arrived | PursuitOutcome::Aborted(_)
        )
    }

    pub fn outcome(&self) -> &PursuitOutcome {
        &self.outcome
    }

    pub fn follower(&self) -> Option<&PathFollower> {
        self.follower.as_ref()
    }

    /// Mover position in cell units; the start node until a route exists.
    pub fn position(&self) -> Vec2 {
        match &self.follower {
            Some(f) => f.state().position,
            None => Vec2::new(self.start.col as f32, self.start.row as f32),
        }
    }

    pub fn direction(&self) -> Direction {
        self.follower
            .as_ref()
            .map(|f| f.state().direction)
            .unwrap_or_default()
    }

    pub fn gait_frame(&self) -> usize {
        self.follower.as_ref().map_or(0, |f| f.state().gait_frame)
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn start_node(&self) -> Node {
        self.start
    }

    pub fn goal(&self) -> Node {
        self.goal
    }
}
