//! A simulated vehicle bound to one policy for one generation.
//!
//! Every tick the scheduler runs, for each still-active agent and without
//! interleaving other agents:
//!
//! 1. [`Agent::step`] - observe, pick the arg-max action, move the car
//! 2. [`Agent::check_collisions`] - flag leaving the screen or hitting an obstacle
//! 3. [`Agent::reward_step`] - add this tick's reward terms to the running total
//!
//! [`Agent::tick`] performs the three in that order. Once an agent is no longer
//! active (parked or collided) all three are no-ops: its state and reward are
//! frozen.

use autopark_engine::{Action, Car, CarParams, Collidable, Scenario, heading_difference};

use crate::{
    observation::Observation,
    policy::Policy,
    reward::{
        ALMOST_PARKED_ANGLE_MARGIN, ALMOST_PARKED_RADIUS_FACTOR, ParkingCriteria,
        RewardBreakdown, RewardParams,
    },
};

const DEFAULT_TICK_RATE: u32 = 60;

/// Physics, reward and parking settings shared by all agents of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    pub car: CarParams,
    pub reward: RewardParams,
    pub parking: ParkingCriteria,
    /// Number of consecutive stopped ticks tolerated before the stalled penalty.
    pub stalled_tick_threshold: u32,
}

impl Default for AgentParams {
    fn default() -> Self {
        let reward = RewardParams::default();
        Self {
            car: CarParams::default(),
            reward,
            parking: ParkingCriteria::default(),
            stalled_tick_threshold: reward.stalled_tick_threshold(DEFAULT_TICK_RATE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum AgentStatus {
    Active,
    Parked,
    Collided,
}

#[derive(Debug, Clone)]
pub struct Agent<P> {
    policy: P,
    car: Car,
    params: AgentParams,
    reward: f64,
    previous_distance: f32,
    stalled_ticks: u32,
    last_action: Option<Action>,
    active: bool,
    collided: bool,
    parked: bool,
}

impl<P> Agent<P>
where
    P: Policy,
{
    /// Places a fresh agent at the scenario's spawn pose.
    pub fn new(policy: P, scenario: &Scenario, params: AgentParams) -> Self {
        let car = Car::new(scenario.spawn, &params.car);
        let previous_distance = car.position().distance_to(scenario.spot.center);
        Self {
            policy,
            car,
            params,
            reward: 0.0,
            previous_distance,
            stalled_ticks: 0,
            last_action: None,
            active: true,
            collided: false,
            parked: false,
        }
    }

    #[must_use]
    pub fn car(&self) -> &Car {
        &self.car
    }

    /// Running reward total, accumulated in `f64` so that small shaping
    /// differences survive next to the parking bonus.
    #[must_use]
    pub fn reward(&self) -> f64 {
        self.reward
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn collided(&self) -> bool {
        self.collided
    }

    #[must_use]
    pub fn parked(&self) -> bool {
        self.parked
    }

    #[must_use]
    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    #[must_use]
    pub fn stalled_ticks(&self) -> u32 {
        self.stalled_ticks
    }

    #[must_use]
    pub fn status(&self) -> AgentStatus {
        if self.parked {
            AgentStatus::Parked
        } else if self.collided {
            AgentStatus::Collided
        } else {
            AgentStatus::Active
        }
    }

    /// Consumes the agent, returning its policy and final reward.
    pub fn into_parts(self) -> (P, f64) {
        (self.policy, self.reward)
    }

    #[must_use]
    pub fn observe(&self, scenario: &Scenario) -> Observation {
        Observation::of(&self.car, &self.params.car, scenario)
    }

    /// Runs `step`, `check_collisions` and `reward_step` for one tick.
    pub fn tick(&mut self, scenario: &Scenario) -> RewardBreakdown {
        self.step(scenario);
        self.check_collisions(scenario);
        self.reward_step(scenario)
    }

    /// Chooses and applies one action, then advances the car.
    ///
    /// Returns the chosen action, or `None` if the agent is inactive.
    pub fn step(&mut self, scenario: &Scenario) -> Option<Action> {
        if !self.active {
            return None;
        }
        let observation = self.observe(scenario);
        let action = self.policy.action_scores(&observation).best_action();
        self.car.apply_action(action, &self.params.car);
        self.car.integrate(&self.params.car);

        if self.car.speed().abs() < self.params.reward.stop_speed_threshold {
            self.stalled_ticks += 1;
        } else {
            self.stalled_ticks = 0;
        }
        self.last_action = Some(action);
        Some(action)
    }

    /// Flags a collision if any corner leaves the screen or the body overlaps an
    /// obstacle. Never clears an existing collision.
    pub fn check_collisions(&mut self, scenario: &Scenario) {
        if !self.active {
            return;
        }
        let corners = self.car.corners();
        if !corners.iter().all(|c| scenario.bounds.contains(*c)) {
            self.collided = true;
            return;
        }
        if scenario.obstacles.iter().any(|obstacle| self.car.overlaps(obstacle)) {
            self.collided = true;
        }
    }

    /// Computes this tick's reward, adds it to the running total and returns it.
    ///
    /// Inactive agents get an all-zero breakdown.
    pub fn reward_step(&mut self, scenario: &Scenario) -> RewardBreakdown {
        let mut breakdown = RewardBreakdown::default();
        if !self.active {
            return breakdown;
        }
        let RewardParams {
            collision_penalty,
            parking_bonus,
            distance_multiplier,
            angle_penalty_multiplier,
            alignment_reward,
            almost_parked_bonus,
            speed_penalty_multiplier,
            step_penalty,
            stalled_penalty,
            ..
        } = self.params.reward;
        let criteria = self.params.parking;
        let spot = &scenario.spot;

        if self.collided {
            breakdown.collision = collision_penalty;
            self.active = false;
            log::trace!("agent collided at {:?}", self.car.position());
        }

        let distance = self.car.position().distance_to(spot.center);
        breakdown.distance = (self.previous_distance - distance) * distance_multiplier;
        self.previous_distance = distance;

        let angle_diff = heading_difference(self.car.heading(), spot.angle);
        breakdown.heading = angle_diff * angle_penalty_multiplier
            + (1.0 - angle_diff / 180.0) * alignment_reward;

        let speed = self.car.speed().abs();
        let near_radius = spot.max_extent();
        if distance < near_radius {
            breakdown.speed = speed * speed_penalty_multiplier;
        }

        let slow = speed < criteria.min_velocity;
        let parked = distance < criteria.max_center_distance
            && angle_diff < criteria.max_angle_diff
            && slow
            && self.car.overlaps(spot);
        if parked {
            breakdown.parking = parking_bonus;
            self.parked = true;
            self.active = false;
            log::trace!(
                "agent parked at {:?} (heading {:.1})",
                self.car.position(),
                self.car.heading()
            );
        } else {
            let almost_radius = near_radius * ALMOST_PARKED_RADIUS_FACTOR;
            let almost_tolerance = criteria.max_angle_diff + ALMOST_PARKED_ANGLE_MARGIN;
            if distance < almost_radius && angle_diff < almost_tolerance && slow {
                breakdown.almost_parked = almost_parked_bonus
                    * (1.0 - angle_diff / almost_tolerance)
                    * (1.0 - distance / almost_radius);
            }
        }

        if self.stalled_ticks > self.params.stalled_tick_threshold {
            breakdown.stalled = stalled_penalty;
        }
        breakdown.step = step_penalty;

        self.reward += breakdown.total();
        breakdown
    }
}
