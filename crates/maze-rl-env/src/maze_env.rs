//! The maze navigation environment
//!
//! States are grid cells, actions are the four moves. A move into a wall or
//! off the grid leaves the agent in place with the blocked penalty; any other
//! move costs the step penalty; arriving at (or staying on) the goal pays
//! the goal reward and ends the episode.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use maze_rl_core::{ActionSpace, Cell, Environment, MoveAction, RLError, Result, Step};

use crate::geometry::{Segment, Xy};
use crate::{Maze, MazeDescription};

/// Reward values of the maze
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeRewards {
    /// Reward for a move into an open neighbouring cell
    pub step: f64,
    /// Reward for bumping into a wall or the grid edge
    pub blocked: f64,
    /// Reward for ending on the goal
    pub goal: f64,
    /// Reward for an unrecognized action name
    pub invalid_action: f64,
}

impl Default for MazeRewards {
    fn default() -> Self {
        Self {
            step: -1.0,
            blocked: -5.0,
            goal: 100.0,
            invalid_action: 0.0,
        }
    }
}

/// Configuration for [`MazeEnv`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeEnvConfig {
    /// Start cell, overriding border detection
    pub start: Option<Cell>,
    /// Goal cell, overriding border detection
    pub goal: Option<Cell>,
    /// Fail construction instead of falling back to corner cells when a
    /// border has no opening
    pub require_border_openings: bool,
    /// Reward values
    pub rewards: MazeRewards,
}

/// Where a start or goal cell came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    /// Supplied by the caller
    Explicit,
    /// First open segment found on the border
    Detected,
    /// Corner default; not checked for reachability
    Fallback,
}

/// The four moves, offered in every cell
#[derive(Debug, Clone, Copy, Default)]
pub struct MazeActions;

impl ActionSpace for MazeActions {
    type State = Cell;
    type Action = MoveAction;

    fn actions(&self, _state: &Cell) -> Vec<MoveAction> {
        MoveAction::ALL.to_vec()
    }
}

/// Side of the grid an endpoint is detected on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Border {
    /// Column line 0, holds the start
    Left,
    /// Column line `cols`, holds the goal
    Right,
}

impl Border {
    /// Vertical grid line of the border
    fn line(self, cols: usize) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => cols,
        }
    }

    /// Cell just inside the border on `row`
    fn cell(self, row: usize, cols: usize) -> Cell {
        match self {
            Self::Left => Cell::new(row, 0),
            Self::Right => Cell::new(row, cols - 1),
        }
    }

    /// Corner used when the border is fully walled
    fn fallback(self, rows: usize, cols: usize) -> Cell {
        match self {
            Self::Left => Cell::new(0, 0),
            Self::Right => Cell::new(rows - 1, cols - 1),
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

/// Grid world defined by a wall-segment description
#[derive(Debug, Clone)]
pub struct MazeEnv {
    rows: usize,
    cols: usize,
    walls: HashSet<Segment<Xy>>,
    start: Cell,
    goal: Cell,
    start_origin: Endpoint,
    goal_origin: Endpoint,
    rewards: MazeRewards,
    state: Cell,
}

impl MazeEnv {
    /// Parse a maze description with auto-detected start and goal
    ///
    /// # Errors
    ///
    /// Any parse failure of [`MazeDescription::parse`].
    pub fn new(content: &str) -> Result<Self> {
        Self::with_config(content, MazeEnvConfig::default())
    }

    /// Parse a maze description with explicit configuration
    ///
    /// # Errors
    ///
    /// Any parse failure of [`MazeDescription::parse`], plus the
    /// configuration errors of [`MazeEnv::from_description`].
    pub fn with_config(content: &str, config: MazeEnvConfig) -> Result<Self> {
        let description = MazeDescription::parse(content)?;
        Self::from_description(&description, config)
    }

    /// Environment over a generated maze
    ///
    /// # Errors
    ///
    /// The configuration errors of [`MazeEnv::from_description`].
    pub fn from_maze(maze: &Maze, config: MazeEnvConfig) -> Result<Self> {
        Self::from_description(&maze.to_description(), config)
    }

    /// Environment over an already parsed description
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidDimensions`] for an empty grid,
    /// [`RLError::InvalidState`] for an explicit start or goal outside the
    /// grid, and [`RLError::NoBorderOpening`] when detection fails while
    /// `require_border_openings` is set.
    pub fn from_description(description: &MazeDescription, config: MazeEnvConfig) -> Result<Self> {
        let (rows, cols) = (description.rows, description.cols);
        if rows == 0 || cols == 0 {
            return Err(RLError::InvalidDimensions { rows, cols });
        }

        // Text and generator use (row, col); the environment works in (x, y)
        let walls: HashSet<Segment<Xy>> = description.walls.iter().map(|w| w.to_xy()).collect();

        let mut env = Self {
            rows,
            cols,
            walls,
            start: Cell::new(0, 0),
            goal: Cell::new(rows - 1, cols - 1),
            start_origin: Endpoint::Fallback,
            goal_origin: Endpoint::Fallback,
            rewards: config.rewards,
            state: Cell::new(0, 0),
        };

        let strict = config.require_border_openings;
        (env.start, env.start_origin) = match config.start {
            Some(cell) => (env.checked(cell, "start")?, Endpoint::Explicit),
            None => env.detect_opening(Border::Left, strict)?,
        };
        (env.goal, env.goal_origin) = match config.goal {
            Some(cell) => (env.checked(cell, "goal")?, Endpoint::Explicit),
            None => env.detect_opening(Border::Right, strict)?,
        };
        env.state = env.start;

        debug!(
            rows,
            cols,
            walls = env.walls.len(),
            start = %env.start,
            goal = %env.goal,
            "maze environment ready"
        );
        Ok(env)
    }

    fn checked(&self, cell: Cell, role: &str) -> Result<Cell> {
        if cell.within(self.rows, self.cols) {
            Ok(cell)
        } else {
            Err(RLError::InvalidState(format!(
                "{role} {cell} lies outside the {}x{} grid",
                self.rows, self.cols
            )))
        }
    }

    /// First row, top to bottom, whose segment on `border` is open
    fn detect_opening(&self, border: Border, strict: bool) -> Result<(Cell, Endpoint)> {
        let x = border.line(self.cols);
        let open_row = (0..self.rows)
            .find(|&r| !self.walls.contains(&Segment::new(Xy::new(x, r), Xy::new(x, r + 1))));

        match open_row {
            Some(row) => Ok((border.cell(row, self.cols), Endpoint::Detected)),
            None if strict => Err(RLError::NoBorderOpening(border.to_string())),
            None => {
                let fallback = border.fallback(self.rows, self.cols);
                warn!(
                    side = %border,
                    cell = %fallback,
                    "no opening on border, falling back to corner cell; reachability is not checked"
                );
                Ok((fallback, Endpoint::Fallback))
            }
        }
    }

    /// Row count
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Start cell
    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    /// Goal cell
    #[must_use]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// How the start cell was chosen
    #[must_use]
    pub fn start_origin(&self) -> Endpoint {
        self.start_origin
    }

    /// How the goal cell was chosen
    #[must_use]
    pub fn goal_origin(&self) -> Endpoint {
        self.goal_origin
    }

    /// Reward values in effect
    #[must_use]
    pub fn rewards(&self) -> &MazeRewards {
        &self.rewards
    }

    /// Number of wall segments
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Whether `segment` is a wall
    #[must_use]
    pub fn has_wall(&self, segment: &Segment<Xy>) -> bool {
        self.walls.contains(segment)
    }

    /// Iterate over wall segments in environment space
    pub fn walls(&self) -> impl Iterator<Item = &Segment<Xy>> {
        self.walls.iter()
    }

    /// Segment crossed when leaving `cell` by `action`
    #[must_use]
    pub fn crossing_segment(cell: Cell, action: MoveAction) -> Segment<Xy> {
        let (r, c) = (cell.row, cell.col);
        match action {
            MoveAction::Up => Segment::new(Xy::new(c, r), Xy::new(c + 1, r)),
            MoveAction::Down => Segment::new(Xy::new(c, r + 1), Xy::new(c + 1, r + 1)),
            MoveAction::Left => Segment::new(Xy::new(c, r), Xy::new(c, r + 1)),
            MoveAction::Right => Segment::new(Xy::new(c + 1, r), Xy::new(c + 1, r + 1)),
        }
    }

    /// Destination of `action` from `cell`, with no wall or bounds check
    #[must_use]
    pub fn target(cell: Cell, action: MoveAction) -> (i64, i64) {
        let (dr, dc) = action.delta();
        (to_i64(cell.row) + dr, to_i64(cell.col) + dc)
    }

    /// [`MazeEnv::crossing_segment`] for an action given by name
    ///
    /// # Errors
    ///
    /// [`RLError::UnknownAction`] for a name outside the four moves.
    pub fn edge_for_move(cell: Cell, action: &str) -> Result<Segment<Xy>> {
        Ok(Self::crossing_segment(cell, action.parse()?))
    }

    /// [`MazeEnv::target`] for an action given by name
    ///
    /// # Errors
    ///
    /// [`RLError::UnknownAction`] for a name outside the four moves.
    pub fn move_target(cell: Cell, action: &str) -> Result<(i64, i64)> {
        Ok(Self::target(cell, action.parse()?))
    }

    /// Whether `action` from `cell` is stopped by a wall or the grid edge
    #[must_use]
    pub fn is_blocked(&self, cell: Cell, action: MoveAction) -> bool {
        self.walls.contains(&Self::crossing_segment(cell, action))
            || self.in_bounds(Self::target(cell, action)).is_none()
    }

    fn in_bounds(&self, (row, col): (i64, i64)) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        let cell = Cell::new(row, col);
        cell.within(self.rows, self.cols).then_some(cell)
    }

    /// Result of taking `action` from `cell`, without touching the current state
    #[must_use]
    pub fn transition(&self, cell: Cell, action: MoveAction) -> Step<Cell> {
        let blocked = self.walls.contains(&Self::crossing_segment(cell, action));
        let destination = self.in_bounds(Self::target(cell, action));

        let (next, mut reward) = match destination {
            Some(next) if !blocked => (next, self.rewards.step),
            _ => (cell, self.rewards.blocked),
        };

        let done = self.is_goal(next);
        if done {
            reward = self.rewards.goal;
        }
        Step::new(next, reward, done)
    }

    /// Step with an action given by name
    ///
    /// Unrecognized names are a no-op paying the invalid-action reward.
    pub fn step_named(&mut self, action: &str) -> Step<Cell> {
        match action.parse::<MoveAction>() {
            Ok(action) => self.apply(action),
            Err(_) => Step::new(self.state, self.rewards.invalid_action, false),
        }
    }

    fn apply(&mut self, action: MoveAction) -> Step<Cell> {
        let step = self.transition(self.state, action);
        self.state = step.state;
        step
    }

    fn is_goal(&self, cell: Cell) -> bool {
        cell == self.goal
    }
}

impl Environment for MazeEnv {
    type State = Cell;
    type Action = MoveAction;
    type Space = MazeActions;

    fn action_space(&self) -> MazeActions {
        MazeActions
    }

    fn reset(&mut self) -> Result<Cell> {
        self.state = self.start;
        Ok(self.state)
    }

    fn step(&mut self, action: MoveAction) -> Result<Step<Cell>> {
        Ok(self.apply(action))
    }

    fn state(&self) -> &Cell {
        &self.state
    }

    fn is_terminal(&self, state: &Cell) -> bool {
        self.is_goal(*state)
    }

    fn state_count(&self) -> Option<usize> {
        Some(self.rows * self.cols)
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Start (1,0) via the open lower-left segment, goal (0,1) via the open
    // upper-right segment. A wall separates (1,0) from (1,1).
    const TWO_BY_TWO: &str = "\
2 2
7
0 0 0 1
0 0 1 0
0 1 0 2
1 1 2 1
1 2 2 2
2 0 2 1
2 1 2 2
";

    const ENCLOSED: &str = "\
1 2
6
0 0 0 1
0 1 0 2
0 0 1 0
0 2 1 2
1 0 1 1
1 1 1 2
";

    fn env() -> MazeEnv {
        MazeEnv::new(TWO_BY_TWO).unwrap()
    }

    #[test]
    fn detects_border_openings() {
        let env = env();
        assert_eq!(env.start(), Cell::new(1, 0));
        assert_eq!(env.goal(), Cell::new(0, 1));
        assert_eq!(env.start_origin(), Endpoint::Detected);
        assert_eq!(env.goal_origin(), Endpoint::Detected);
        assert_eq!(*env.state(), env.start());
        assert_eq!(env.wall_count(), 7);
    }

    #[test]
    fn wall_blocks_and_penalizes() {
        let mut env = env();
        let step = env.step(MoveAction::Right).unwrap();
        assert_eq!(step.state, Cell::new(1, 0));
        assert_relative_eq!(step.reward.value(), -5.0);
        assert!(!step.done);
        assert_eq!(*env.state(), Cell::new(1, 0));
    }

    #[test]
    fn leaving_the_grid_is_blocked_even_through_an_opening() {
        let mut env = env();
        // The entrance segment is open, but the destination is off-grid
        assert!(!env.has_wall(&MazeEnv::crossing_segment(env.start(), MoveAction::Left)));
        let step = env.step(MoveAction::Left).unwrap();
        assert_eq!(step.state, env.start());
        assert_relative_eq!(step.reward.value(), -5.0);
        assert!(!step.done);
        assert!(env.is_blocked(env.start(), MoveAction::Left));
    }

    #[test]
    fn open_moves_cost_a_step_and_goal_pays_out() {
        let mut env = env();
        let up = env.step(MoveAction::Up).unwrap();
        assert_eq!(up.state, Cell::new(0, 0));
        assert_relative_eq!(up.reward.value(), -1.0);
        assert!(!up.done);

        let right = env.step(MoveAction::Right).unwrap();
        assert_eq!(right.state, Cell::new(0, 1));
        assert_relative_eq!(right.reward.value(), 100.0);
        assert!(right.done);
        assert!(env.is_terminal(&right.state));
    }

    #[test]
    fn reset_restores_start() {
        let mut env = env();
        env.step(MoveAction::Up).unwrap();
        assert_eq!(env.reset().unwrap(), Cell::new(1, 0));
        assert_eq!(*env.state(), Cell::new(1, 0));
    }

    #[test]
    fn unknown_action_names_are_a_no_op() {
        let mut env = env();
        let step = env.step_named("jump");
        assert_eq!(step.state, env.start());
        assert_relative_eq!(step.reward.value(), 0.0);
        assert!(!step.done);

        let step = env.step_named("up");
        assert_eq!(step.state, Cell::new(0, 0));
    }

    #[test]
    fn unknown_action_names_fail_edge_computation() {
        let cell = Cell::new(0, 0);
        assert!(matches!(
            MazeEnv::edge_for_move(cell, "north"),
            Err(RLError::UnknownAction(_))
        ));
        assert!(matches!(
            MazeEnv::move_target(cell, ""),
            Err(RLError::UnknownAction(_))
        ));
        assert_eq!(MazeEnv::move_target(cell, "up").unwrap(), (-1, 0));
        assert_eq!(
            MazeEnv::edge_for_move(cell, "right").unwrap(),
            Segment::new(Xy::new(1, 0), Xy::new(1, 1))
        );
    }

    #[test]
    fn every_cell_offers_all_moves() {
        let env = env();
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(env.actions(&Cell::new(row, col)), MoveAction::ALL.to_vec());
            }
        }
    }

    #[test]
    fn explicit_endpoints_override_detection() {
        let config = MazeEnvConfig {
            start: Some(Cell::new(0, 0)),
            goal: Some(Cell::new(1, 1)),
            ..MazeEnvConfig::default()
        };
        let env = MazeEnv::with_config(TWO_BY_TWO, config).unwrap();
        assert_eq!(env.start(), Cell::new(0, 0));
        assert_eq!(env.goal(), Cell::new(1, 1));
        assert_eq!(env.start_origin(), Endpoint::Explicit);
    }

    #[test]
    fn explicit_endpoints_must_lie_on_the_grid() {
        let config = MazeEnvConfig {
            goal: Some(Cell::new(2, 0)),
            ..MazeEnvConfig::default()
        };
        assert!(matches!(
            MazeEnv::with_config(TWO_BY_TWO, config),
            Err(RLError::InvalidState(_))
        ));
    }

    #[test]
    fn enclosed_maze_falls_back_to_corners() {
        let env = MazeEnv::new(ENCLOSED).unwrap();
        assert_eq!(env.start(), Cell::new(0, 0));
        assert_eq!(env.goal(), Cell::new(0, 1));
        assert_eq!(env.start_origin(), Endpoint::Fallback);
        assert_eq!(env.goal_origin(), Endpoint::Fallback);
    }

    #[test]
    fn strict_detection_rejects_enclosed_maze() {
        let config = MazeEnvConfig {
            require_border_openings: true,
            ..MazeEnvConfig::default()
        };
        let err = MazeEnv::with_config(ENCLOSED, config).unwrap_err();
        assert!(matches!(err, RLError::NoBorderOpening(side) if side == "left"));
    }

    #[test]
    fn strict_detection_names_the_right_border() {
        let config = MazeEnvConfig {
            start: Some(Cell::new(0, 0)),
            require_border_openings: true,
            ..MazeEnvConfig::default()
        };
        let err = MazeEnv::with_config(ENCLOSED, config).unwrap_err();
        assert!(matches!(err, RLError::NoBorderOpening(side) if side == "right"));
    }

    #[test]
    fn border_sides_agree_on_lines_and_cells() {
        assert_eq!(Border::Left.line(5), 0);
        assert_eq!(Border::Right.line(5), 5);
        assert_eq!(Border::Left.cell(3, 5), Cell::new(3, 0));
        assert_eq!(Border::Right.cell(3, 5), Cell::new(3, 4));
        assert_eq!(Border::Left.fallback(4, 5), Cell::new(0, 0));
        assert_eq!(Border::Right.fallback(4, 5), Cell::new(3, 4));
        assert_eq!(Border::Right.to_string(), "right");
    }

    #[test]
    fn blocked_move_on_the_goal_still_terminates() {
        let config = MazeEnvConfig {
            start: Some(Cell::new(0, 1)),
            ..MazeEnvConfig::default()
        };
        let mut env = MazeEnv::with_config(TWO_BY_TWO, config).unwrap();
        let step = env.step(MoveAction::Up).unwrap();
        assert_eq!(step.state, Cell::new(0, 1));
        assert_relative_eq!(step.reward.value(), 100.0);
        assert!(step.done);
    }

    #[test]
    fn custom_rewards_apply() {
        let config = MazeEnvConfig {
            rewards: MazeRewards {
                blocked: -2.0,
                ..MazeRewards::default()
            },
            ..MazeEnvConfig::default()
        };
        let mut env = MazeEnv::with_config(TWO_BY_TWO, config).unwrap();
        let step = env.step(MoveAction::Down).unwrap();
        assert_relative_eq!(step.reward.value(), -2.0);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: MazeEnvConfig =
            serde_json::from_str(r#"{"start": {"row": 1, "col": 0}}"#).unwrap();
        assert_eq!(config.start, Some(Cell::new(1, 0)));
        assert_eq!(config.goal, None);
        assert_eq!(config.rewards, MazeRewards::default());
    }
}
