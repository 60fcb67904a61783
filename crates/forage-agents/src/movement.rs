//! Correlated random walk on a strip that reflects in x and wraps in y.
//!
//! Each tick an agent draws a Poisson step length from its `step_mean`,
//! pays its metabolic cost, and, if still alive, turns by a uniform amount
//! in `[-diversion, diversion]` and walks. The x edges mirror the overshoot
//! once; the y edges are periodic.
//!
//! A single mirror pass can leave a very long step outside `[0, max_x)`.
//! The caller detects this through [`Bounds::contains_x`] and removes the
//! agent.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Position};
use crate::error::AgentError;
use crate::random;
use crate::vitals;

/// Extent of the walkable area, in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Exclusive upper bound of x.
    pub max_x: f64,
    /// Period of y.
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from floating-point extents.
    pub const fn new(max_x: f64, max_y: f64) -> Self {
        Self { max_x, max_y }
    }

    /// Bounds matching a grid of `width` x `height` cells.
    pub fn from_grid(width: u32, height: u32) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }

    /// Whether `x` lies in `[0, max_x)`.
    pub fn contains_x(&self, x: f64) -> bool {
        (0.0..self.max_x).contains(&x)
    }
}

/// What happened during one call to [`move_agent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The balance reached zero or below during the move.
    pub died: bool,
    /// Position after the move (unchanged if the agent starved before
    /// walking).
    pub position: Position,
    /// Total energy charged this tick.
    pub energy_spent: f64,
    /// Step length drawn.
    pub step: u32,
}

/// Mirror `x` once at the edges of `[0, max_x)`.
pub fn reflect_x(x: f64, max_x: f64) -> f64 {
    if (0.0..max_x).contains(&x) {
        x
    } else if x < 0.0 {
        -x
    } else {
        max_x - (x - max_x)
    }
}

/// Wrap `y` into `[0, max_y)`.
pub fn wrap_y(y: f64, max_y: f64) -> f64 {
    let wrapped = y.rem_euclid(max_y);
    if wrapped >= max_y { 0.0 } else { wrapped }
}

/// Advance `agent` by one tick of movement.
///
/// The step length is drawn before the metabolic charge, so a starving
/// agent consumes the same randomness as a surviving one up to that point.
///
/// # Errors
///
/// Returns [`AgentError::NotAlive`] for a dead agent and
/// [`AgentError::Distribution`] if the step mean cannot parameterise a
/// Poisson draw.
pub fn move_agent(
    agent: &mut Agent,
    bounds: Bounds,
    rng: &mut impl Rng,
) -> Result<MoveOutcome, AgentError> {
    if !agent.alive {
        return Err(AgentError::NotAlive(agent.id));
    }

    let step = random::poisson(rng, agent.traits.step_mean)?;
    let mut energy_spent = vitals::charge_metabolism(agent);

    if vitals::is_starved(agent) {
        return Ok(MoveOutcome {
            died: true,
            position: agent.position,
            energy_spent,
            step,
        });
    }

    agent.heading += random::turn(rng, agent.traits.diversion);
    let distance = f64::from(step);
    let x = distance.mul_add(agent.heading.cos(), agent.position.x);
    let y = distance.mul_add(agent.heading.sin(), agent.position.y);
    agent.position = Position::new(reflect_x(x, bounds.max_x), wrap_y(y, bounds.max_y));

    energy_spent += vitals::charge_transport(agent, step);

    Ok(MoveOutcome {
        died: vitals::is_starved(agent),
        position: agent.position,
        energy_spent,
        step,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::agent::{AgentId, Traits};
    use crate::physiology::Physiology;

    fn agent(step_mean: f64, diversion: f64) -> Agent {
        Agent::new(
            AgentId(1),
            Position::new(5.0, 5.0),
            Physiology::from_mass(0.001, 0.25).unwrap(),
            Traits {
                step_mean,
                diversion,
            },
            0.0,
            400,
        )
    }

    #[test]
    fn negative_x_reflects_to_positive() {
        assert!((reflect_x(-0.5, 10.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn overshoot_mirrors_back_inside() {
        assert!((reflect_x(10.3, 10.0) - 9.7).abs() < 1e-9);
    }

    #[test]
    fn inside_x_is_unchanged() {
        assert!((reflect_x(3.25, 10.0) - 3.25).abs() < f64::EPSILON);
        assert!(reflect_x(0.0, 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn upper_edge_maps_to_itself_and_is_outside() {
        let b = Bounds::new(10.0, 10.0);
        let x = reflect_x(10.0, b.max_x);
        assert!(!b.contains_x(x));
    }

    #[test]
    fn long_overshoot_stays_out_of_range() {
        let b = Bounds::new(10.0, 10.0);
        assert!(!b.contains_x(reflect_x(25.0, b.max_x)));
        assert!(!b.contains_x(reflect_x(-12.0, b.max_x)));
    }

    #[test]
    fn y_wraps_periodically() {
        assert!((wrap_y(11.5, 10.0) - 1.5).abs() < 1e-12);
        assert!((wrap_y(-0.5, 10.0) - 9.5).abs() < 1e-12);
        assert!(wrap_y(10.0, 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn y_wrap_never_returns_the_period() {
        let y = wrap_y(-1.0e-20, 10.0);
        assert!((0.0..10.0).contains(&y));
    }

    #[test]
    fn zero_step_mean_stays_put() {
        let mut a = agent(0.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let out = move_agent(&mut a, Bounds::new(10.0, 10.0), &mut rng).unwrap();
        assert_eq!(out.step, 0);
        assert!(!out.died);
        assert_eq!(out.position, Position::new(5.0, 5.0));
        assert!((out.energy_spent - a.physiology.metabolic_cost).abs() < 1e-12);
    }

    #[test]
    fn straight_walk_follows_heading() {
        let mut a = agent(3.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(7);
        let out = move_agent(&mut a, Bounds::new(100.0, 100.0), &mut rng).unwrap();
        let expected_x = 5.0 + f64::from(out.step);
        assert!((out.position.x - expected_x).abs() < 1e-9);
        assert!((out.position.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn starved_agent_does_not_move() {
        let mut a = agent(5.0, 1.0);
        a.resources = a.physiology.metabolic_cost * 0.5;
        let heading = a.heading;
        let mut rng = SmallRng::seed_from_u64(3);
        let out = move_agent(&mut a, Bounds::new(10.0, 10.0), &mut rng).unwrap();
        assert!(out.died);
        assert_eq!(out.position, Position::new(5.0, 5.0));
        assert!((a.heading - heading).abs() < f64::EPSILON);
        assert!(vitals::is_starved(&a));
    }

    #[test]
    fn transport_cost_can_exhaust_the_balance() {
        let mut a = agent(50.0, 0.0);
        a.resources = a.physiology.metabolic_cost + a.physiology.transport_cost * 0.5;
        let mut rng = SmallRng::seed_from_u64(11);
        let out = move_agent(&mut a, Bounds::new(1000.0, 1000.0), &mut rng).unwrap();
        assert!(out.step > 0);
        assert!(out.died);
        assert!(vitals::is_starved(&a));
        // The walk happened before the charge that killed it.
        assert!((out.position.x - (5.0 + f64::from(out.step))).abs() < 1e-9);
        let charged = a.physiology.metabolic_cost + a.physiology.transport_for(out.step);
        assert!((out.energy_spent - charged).abs() < 1e-9 * charged);
    }

    #[test]
    fn dead_agent_cannot_move() {
        let mut a = agent(1.0, 1.0);
        a.alive = false;
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(matches!(
            move_agent(&mut a, Bounds::new(10.0, 10.0), &mut rng),
            Err(AgentError::NotAlive(_))
        ));
    }

    #[test]
    fn positions_stay_wrapped_in_y() {
        let mut rng = SmallRng::seed_from_u64(99);
        let bounds = Bounds::new(10.0, 10.0);
        for _ in 0..500 {
            let mut a = agent(4.0, 3.0);
            a.resources = 1.0e6;
            let out = move_agent(&mut a, bounds, &mut rng).unwrap();
            assert!((0.0..bounds.max_y).contains(&out.position.y));
        }
    }
}
