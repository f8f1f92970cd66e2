//! Integration tests for polar-sim.

use polar_agent::Population;
use polar_core::{PartnerSelection, SimulationConfig, StageConfig, Step, UpdateMode};
use polar_stats::{SimulationResult, StepRecord};

use crate::{Engine, EngineBuilder, NoopObserver, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(population_size: usize, num_steps: u64) -> SimulationConfig {
    SimulationConfig {
        population_size,
        num_steps,
        seed: Some(42),
        ..Default::default()
    }
}

/// Interaction probability ≈ 1 at every distance in [0, 1].
const ALWAYS_MEET: f64 = 1e9;

/// Observer that asserts the opinion bounds after every step.
struct BoundsChecker {
    steps: usize,
}

impl SimObserver for BoundsChecker {
    fn on_step_end(&mut self, _record: &StepRecord, population: &Population) {
        self.steps += 1;
        for agent in &population.agents {
            let o = agent.opinion.value();
            assert!((0.0..=1.0).contains(&o), "opinion {o} out of bounds");
        }
    }
}

// ── EngineBuilder validation ──────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use polar_agent::{Agent, Group, InteractionRule, UpdateStage};
    use polar_core::{AgentRng, ConfigError};

    use super::*;
    use crate::SimError;

    #[test]
    fn builds_successfully_with_defaults() {
        let engine = Engine::setup(test_config(12, 10)).unwrap();
        assert_eq!(engine.population.len(), 12);
        assert_eq!(engine.rngs.len(), 12);
        assert_eq!(engine.seed, 42);
        assert_eq!(engine.current_step, Step::ZERO);
        assert!(engine.stages.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_before_setup() {
        let result = Engine::setup(test_config(0, 10));
        assert!(matches!(result, Err(SimError::Config(ConfigError::EmptyPopulation))));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_population_is_rejected_before_allocation() {
        let result = Engine::setup(test_config(polar_core::MAX_POPULATION + 1, 1));
        assert!(matches!(
            result,
            Err(SimError::Config(ConfigError::PopulationTooLarge { .. }))
        ));
    }

    #[test]
    fn opinion_count_mismatch_errors() {
        let result = EngineBuilder::new(test_config(3, 1))
            .initial_opinions(vec![0.1, 0.2])
            .build();
        assert!(matches!(
            result,
            Err(SimError::PopulationMismatch { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn non_finite_opinion_errors() {
        let result = EngineBuilder::new(test_config(2, 1))
            .initial_opinions(vec![0.1, f64::NAN])
            .build();
        assert!(matches!(result, Err(SimError::InvalidOpinion { .. })));
    }

    #[test]
    fn unseeded_config_draws_a_seed() {
        let cfg = SimulationConfig { seed: None, ..test_config(4, 1) };
        let engine = Engine::setup(cfg).unwrap();
        assert_eq!(engine.result.seed, engine.seed);
    }

    #[test]
    fn groups_only_assigned_when_affinity_enabled() {
        let plain = Engine::setup(test_config(200, 1)).unwrap();
        assert!(plain.population.agents.iter().all(|a| a.group == Group::Neutral));

        let cfg = SimulationConfig {
            stages: StageConfig { self_interest: None, group_affinity: Some(0.1) },
            ..test_config(200, 1)
        };
        let grouped = Engine::setup(cfg).unwrap();
        assert!(grouped.population.agents.iter().any(|a| a.group != Group::Neutral));
        assert_eq!(grouped.stages.len(), 1);
    }

    #[test]
    fn custom_stage_runs_after_configured_ones() {
        struct PinToMiddle;
        impl UpdateStage for PinToMiddle {
            fn name(&self) -> &'static str { "pin" }
            fn apply(&self, a: &mut Agent, _p: &Agent, _r: &InteractionRule, _g: &mut AgentRng) -> bool {
                a.opinion = polar_agent::Opinion::NEUTRAL;
                true
            }
        }

        let mut engine = EngineBuilder::new(test_config(5, 3))
            .stage(Box::new(PinToMiddle))
            .build()
            .unwrap();
        engine.run(&mut NoopObserver);
        let last = engine.result.last().unwrap();
        assert!((last.mean() - 0.5).abs() < 1e-12);
        assert!(last.variance() < 1e-15);
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::{CancelFlag, RunStatus};

    #[test]
    fn records_one_entry_per_step() {
        let result = crate::run(test_config(20, 50)).unwrap();
        assert_eq!(result.len(), 50);
        assert!(result.is_complete());
        for (i, record) in result.iter().enumerate() {
            assert_eq!(record.step, Step(i as u64));
        }
    }

    #[test]
    fn zero_steps_yields_empty_result() {
        let result = crate::run(test_config(20, 0)).unwrap();
        assert!(result.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn run_steps_advances_counter() {
        let mut engine = Engine::setup(test_config(5, 100)).unwrap();
        engine.run_steps(5, &mut NoopObserver);
        assert_eq!(engine.current_step, Step(5));
        engine.run_steps(3, &mut NoopObserver);
        assert_eq!(engine.current_step, Step(8));
        // `run` continues from where stepping left off.
        assert_eq!(engine.run(&mut NoopObserver), RunStatus::Completed);
        assert_eq!(engine.result.len(), 100);
    }

    #[test]
    fn each_agent_updates_once_per_step() {
        let mut engine = Engine::setup(test_config(37, 1)).unwrap();
        let tally = engine.step();
        assert_eq!(tally.total(), 37);
        let record = engine.record_step();
        assert_eq!(record.interactions, tally);
    }

    /// Observer that counts callbacks.
    struct Counter {
        starts: usize,
        ends:   usize,
        done:   usize,
    }
    impl SimObserver for Counter {
        fn on_step_start(&mut self, _s: Step) { self.starts += 1; }
        fn on_step_end(&mut self, _r: &StepRecord, _p: &Population) { self.ends += 1; }
        fn on_sim_end(&mut self, _r: &SimulationResult) { self.done += 1; }
    }

    #[test]
    fn observer_called_correct_number_of_times() {
        let mut engine = Engine::setup(test_config(3, 7)).unwrap();
        let mut obs = Counter { starts: 0, ends: 0, done: 0 };
        engine.run(&mut obs);
        assert_eq!((obs.starts, obs.ends, obs.done), (7, 7, 1));
    }

    #[test]
    fn observer_can_cancel_between_steps() {
        struct StopAt(Step);
        impl SimObserver for StopAt {
            fn should_stop(&mut self, next: Step) -> bool { next >= self.0 }
        }

        let mut engine = Engine::setup(test_config(10, 100)).unwrap();
        let status = engine.run(&mut StopAt(Step(5)));
        assert_eq!(status, RunStatus::Cancelled { at: Step(5) });
        assert_eq!(engine.result.len(), 5);
        assert!(!engine.result.is_complete());
    }

    #[test]
    fn raised_cancel_flag_stops_immediately() {
        let flag = CancelFlag::new();
        let mut handle = flag.clone();
        flag.cancel();
        let result = crate::run_with_observer(test_config(10, 100), &mut handle).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.requested_steps, 100);
    }

    #[test]
    fn paired_observers_both_receive_callbacks() {
        let mut pair = (
            Counter { starts: 0, ends: 0, done: 0 },
            BoundsChecker { steps: 0 },
        );
        crate::run_with_observer(test_config(8, 4), &mut pair).unwrap();
        assert_eq!(pair.0.ends, 4);
        assert_eq!(pair.1.steps, 4);
    }
}

// ── Model properties ──────────────────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use polar_core::{AgentId, AgentRng};

    use super::*;

    #[test]
    fn opinions_stay_in_bounds() {
        for (t, r) in [(0.0, 1.0), (0.25, 0.25), (1.0, 0.9), (0.05, 1.0)] {
            let cfg = SimulationConfig {
                tolerance_window:     t,
                movement_coefficient: r,
                ..test_config(40, 200)
            };
            let mut obs = BoundsChecker { steps: 0 };
            crate::run_with_observer(cfg, &mut obs).unwrap();
            assert_eq!(obs.steps, 200);
        }
    }

    #[test]
    fn variance_never_exceeds_quarter() {
        // Strong repulsion drives opinions to the extremes.
        let cfg = SimulationConfig {
            exposure_scale:       ALWAYS_MEET,
            tolerance_window:     0.0,
            movement_coefficient: 1.0,
            ..test_config(50, 300)
        };
        let result = crate::run(cfg).unwrap();
        for record in &result {
            assert!(record.variance() <= 0.25 + 1e-12, "{} > 0.25", record.variance());
        }
    }

    #[test]
    fn histogram_counts_every_agent() {
        let result = crate::run(test_config(33, 100)).unwrap();
        for record in &result {
            assert_eq!(record.histogram_counts().iter().sum::<u64>(), 33);
            assert_eq!(record.histogram_bin_edges().len(), 26);
        }
    }

    #[test]
    fn same_seed_same_result() {
        let a = crate::run(test_config(30, 200)).unwrap();
        let b = crate::run(test_config(30, 200)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_result() {
        let a = crate::run(test_config(30, 50)).unwrap();
        let b = crate::run(SimulationConfig { seed: Some(43), ..test_config(30, 50) }).unwrap();
        assert_ne!(a.mean_series(), b.mean_series());
    }

    #[test]
    fn sequential_mode_is_deterministic() {
        let cfg = SimulationConfig { update_mode: UpdateMode::Sequential, ..test_config(30, 100) };
        assert_eq!(crate::run(cfg.clone()).unwrap(), crate::run(cfg).unwrap());
    }

    #[test]
    fn zero_movement_freezes_opinions() {
        let cfg = SimulationConfig { movement_coefficient: 0.0, ..test_config(25, 100) };
        let mut engine = Engine::setup(cfg).unwrap();
        let before = engine.population.opinions();
        engine.run(&mut NoopObserver);
        assert_eq!(engine.population.opinions(), before);

        let first = engine.result.records[0].clone();
        for record in &engine.result {
            assert_eq!(record.mean(), first.mean());
            assert_eq!(record.variance(), first.variance());
        }
    }

    #[test]
    fn full_attraction_converges() {
        let cfg = SimulationConfig {
            exposure_scale:       ALWAYS_MEET,
            tolerance_window:     1.0,
            movement_coefficient: 1.0,
            ..test_config(20, 1_000)
        };
        let result = crate::run(cfg).unwrap();
        let first = result.records[0].variance();
        let last = result.last().unwrap().variance();
        assert!(last < first, "variance should fall: {first} → {last}");
        assert!(last < 1e-12, "population should reach consensus, variance {last}");
    }

    /// Replays the per-agent RNG streams for the two-agent scenario: each
    /// agent draws a partner from `0..2`, then one uniform for the encounter.
    /// Returns the expected final opinions and `(attracted, repelled, idle)`.
    fn replay_two_agent_step(seed: u64, opinions: [f64; 2], e: f64, t: f64, r: f64) -> ([f64; 2], (u64, u64, u64)) {
        let mut out = opinions;
        let mut tally = (0, 0, 0);
        for i in 0..2usize {
            let mut rng = AgentRng::new(seed, AgentId(i as u32));
            let partner: usize = rng.gen_range(0..2usize);
            let d = (opinions[i] - opinions[partner]).abs();
            if rng.unit() > 0.5_f64.powf(d / e) {
                tally.2 += 1;
            } else if d <= t {
                out[i] = (opinions[i] + (opinions[partner] - opinions[i]) * r).clamp(0.0, 1.0);
                tally.0 += 1;
            } else {
                out[i] = (opinions[i] + (opinions[i] - opinions[partner]) * r).clamp(0.0, 1.0);
                tally.1 += 1;
            }
        }
        (out, tally)
    }

    #[test]
    fn two_agent_repulsion_scenario() {
        let mut saw_self_pairing = [false; 2];
        let mut saw_repulsion = [false; 2];

        for seed in (0..64).chain([42]) {
            let cfg = SimulationConfig {
                seed:                 Some(seed),
                exposure_scale:       ALWAYS_MEET,
                tolerance_window:     0.1,
                movement_coefficient: 0.5,
                ..test_config(2, 1)
            };
            let mut engine = EngineBuilder::new(cfg).initial_opinions(vec![0.2, 0.8]).build().unwrap();
            engine.run(&mut NoopObserver);

            let (expected, (attracted, repelled, idle)) =
                replay_two_agent_step(seed, [0.2, 0.8], ALWAYS_MEET, 0.1, 0.5);
            let ops = engine.population.opinions();
            assert_eq!(ops, expected.to_vec(), "seed {seed}");

            let tally = engine.result.records[0].interactions;
            assert_eq!((tally.attracted, tally.repelled, tally.idle), (attracted, repelled, idle), "seed {seed}");

            // A self-pairing is a no-op; a cross pairing repels past the boundary.
            assert!(ops[0] == 0.2 || ops[0] == 0.0, "seed {seed}: low agent at {}", ops[0]);
            assert!(ops[1] == 0.8 || ops[1] == 1.0, "seed {seed}: high agent at {}", ops[1]);
            for (i, &extreme) in [0.0, 1.0].iter().enumerate() {
                saw_self_pairing[i] |= ops[i] != extreme;
                saw_repulsion[i] |= ops[i] == extreme;
            }
        }

        // Across the seeds each agent hits both branches.
        assert_eq!(saw_self_pairing, [true, true]);
        assert_eq!(saw_repulsion, [true, true]);
    }

    #[test]
    fn two_agent_repulsion_without_self_pairing() {
        let cfg = SimulationConfig {
            exposure_scale:       ALWAYS_MEET,
            tolerance_window:     0.1,
            movement_coefficient: 0.5,
            partner_selection:    PartnerSelection::ExcludeSelf,
            ..test_config(2, 1)
        };
        let mut engine = EngineBuilder::new(cfg).initial_opinions(vec![0.2, 0.8]).build().unwrap();
        engine.run(&mut NoopObserver);
        assert_eq!(engine.population.opinions(), vec![0.0, 1.0]);
        let record = &engine.result.records[0];
        assert_eq!(record.interactions.repelled, 2);
        assert!((record.variance() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn single_agent_pairs_with_itself() {
        let cfg = SimulationConfig {
            tolerance_window:     0.0,
            movement_coefficient: 1.0,
            ..test_config(1, 25)
        };
        let mut engine = EngineBuilder::new(cfg).initial_opinions(vec![0.63]).build().unwrap();
        engine.run(&mut NoopObserver);
        assert_eq!(engine.population.opinions(), vec![0.63]);
        for record in &engine.result {
            assert_eq!(record.interactions.attracted, 1);
            assert_eq!(record.mean(), 0.63);
            assert_eq!(record.variance(), 0.0);
        }
    }
}

// ── Read consistency ──────────────────────────────────────────────────────────

#[cfg(test)]
mod consistency_tests {
    use super::*;

    /// Two agents at the extremes that always meet and copy each other.
    fn copy_config(mode: UpdateMode) -> SimulationConfig {
        SimulationConfig {
            exposure_scale:       ALWAYS_MEET,
            tolerance_window:     1.0,
            movement_coefficient: 1.0,
            partner_selection:    PartnerSelection::ExcludeSelf,
            update_mode:          mode,
            ..test_config(2, 1)
        }
    }

    #[test]
    fn snapshot_mode_reads_start_of_step_state() {
        let mut engine = EngineBuilder::new(copy_config(UpdateMode::Snapshot))
            .initial_opinions(vec![0.0, 1.0])
            .build()
            .unwrap();
        engine.step();
        // Both read the pre-step opinion of the other, so they swap.
        assert_eq!(engine.population.opinions(), vec![1.0, 0.0]);
    }

    #[test]
    fn sequential_mode_reads_live_state() {
        let mut engine = EngineBuilder::new(copy_config(UpdateMode::Sequential))
            .initial_opinions(vec![0.0, 1.0])
            .build()
            .unwrap();
        engine.step();
        // Agent 1 sees agent 0's new opinion.
        assert_eq!(engine.population.opinions(), vec![1.0, 1.0]);
    }

    #[test]
    fn snapshot_is_refreshed_each_step() {
        let mut engine = EngineBuilder::new(copy_config(UpdateMode::Snapshot))
            .initial_opinions(vec![0.0, 1.0])
            .build()
            .unwrap();
        engine.run_steps(2, &mut NoopObserver);
        assert_eq!(engine.population.opinions(), vec![0.0, 1.0]);
    }
}

// ── Parallel update ───────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use polar_core::AgentId;
    use polar_stats::InteractionTally;

    use super::*;

    #[test]
    fn parallel_step_matches_serial_replay() {
        let cfg = SimulationConfig {
            stages: StageConfig { self_interest: Some(0.1), group_affinity: Some(0.2) },
            ..test_config(64, 1)
        };
        let mut parallel = Engine::setup(cfg.clone()).unwrap();
        // Same seed, so identical population and RNG streams.
        let mut serial = Engine::setup(cfg).unwrap();
        assert_eq!(parallel.population.opinions(), serial.population.opinions());

        for _ in 0..50 {
            let tally = parallel.step();

            let snapshot = serial.population.agents.clone();
            let expected: InteractionTally = serial
                .population
                .agents
                .iter_mut()
                .enumerate()
                .map(|(i, agent)| {
                    let id = AgentId(i as u32);
                    agent.update_opinion(id, &snapshot, &serial.rule, &serial.stages, serial.rngs.get_mut(id))
                })
                .collect();

            assert_eq!(tally, expected);
            let bits = |e: &Engine| -> Vec<u64> {
                e.population.agents.iter().map(|a| a.opinion.value().to_bits()).collect()
            };
            assert_eq!(bits(&parallel), bits(&serial));
        }
    }
}
