use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use evplace::bandit::{
    Algorithm, BanditPolicy, EpsilonGreedyBandit, EpsilonGreedyConfig, ExplorationDecay,
};
use evplace::config::Config;
use evplace::geo::BoundingBox;
use evplace::optimizer::run_with_config;
use evplace::placement::{
    ArmLayout, default_demand_centers, generate_candidates, materialize, reward,
};

fn bounds() -> BoundingBox {
    BoundingBox::new(20.20, 20.40, 85.70, 85.95).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), epsilon_greedy in any::<bool>()) {
        let mut config = Config::default();
        config.optimizer.seed = Some(seed);
        config.optimizer.num_stations = 6;
        config.optimizer.num_episodes = 8;
        let algorithm = if epsilon_greedy { Algorithm::EpsilonGreedy } else { Algorithm::Ucb };

        let first = run_with_config(&config, algorithm).unwrap();
        let second = run_with_config(&config, algorithm).unwrap();
        prop_assert_eq!(first.episodes, second.episodes);
        prop_assert_eq!(first.best_placement, second.best_placement);
    }

    #[test]
    fn best_so_far_never_decreases(seed in any::<u64>(), episodes in 1usize..20) {
        let mut config = Config::default();
        config.optimizer.seed = Some(seed);
        config.optimizer.num_stations = 5;
        config.optimizer.num_episodes = episodes;

        let run = run_with_config(&config, Algorithm::Ucb).unwrap();
        prop_assert_eq!(run.episodes.len(), episodes);
        let best = run.best_so_far();
        prop_assert!(best.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(best.last().copied().unwrap().to_bits(), run.best_reward.to_bits());
    }

    #[test]
    fn every_arm_materializes_exactly_n_in_bounds(
        seed in any::<u64>(),
        stations in 1usize..40,
        frozen in any::<bool>(),
    ) {
        let layout = if frozen { ArmLayout::Frozen } else { ArmLayout::Resample };
        let centers = default_demand_centers();
        let mut rng = StdRng::seed_from_u64(seed);
        let arms = generate_candidates(stations, &centers, layout, &mut rng).unwrap();
        for arm in &arms {
            let placement = materialize(arm, stations, &bounds(), &centers, &mut rng);
            prop_assert_eq!(placement.len(), stations);
            for station in &placement {
                prop_assert!(station.lat >= 20.20 && station.lat <= 20.40, "{:?}", station);
                prop_assert!(station.lon >= 85.70 && station.lon <= 85.95, "{:?}", station);
            }
        }
    }

    #[test]
    fn frozen_arms_are_stable(seed in any::<u64>(), stations in 1usize..30) {
        let centers = default_demand_centers();
        let mut rng = StdRng::seed_from_u64(seed);
        let arms = generate_candidates(stations, &centers, ArmLayout::Frozen, &mut rng).unwrap();
        for arm in &arms {
            let first = materialize(arm, stations, &bounds(), &centers, &mut rng);
            let second = materialize(arm, stations, &bounds(), &centers, &mut rng);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn reward_is_pure(seed in any::<u64>(), stations in 1usize..30) {
        let centers = default_demand_centers();
        let mut rng = StdRng::seed_from_u64(seed);
        let arms = generate_candidates(stations, &centers, ArmLayout::Resample, &mut rng).unwrap();
        let placement = materialize(&arms[arms.len() - 1], stations, &bounds(), &centers, &mut rng);
        prop_assert_eq!(
            reward(&placement, &centers).to_bits(),
            reward(&placement, &centers).to_bits()
        );
    }

    #[test]
    fn epsilon_decay_closed_form(
        epsilon in 0.0f64..=1.0,
        decay in 0.5f64..=1.0,
        min_epsilon in 0.0f64..=0.5,
        steps in 0i32..60,
    ) {
        let mut bandit = EpsilonGreedyBandit::new(EpsilonGreedyConfig {
            epsilon,
            decay,
            min_epsilon,
        })
        .unwrap();
        let expected = if steps == 0 {
            epsilon
        } else {
            (epsilon * decay.powi(steps)).max(min_epsilon)
        };
        for _ in 0..steps {
            bandit.decay();
        }
        prop_assert!((bandit.epsilon() - expected).abs() < 1e-9);
        prop_assert_eq!(bandit.stats().total_pulls(), 0);
    }
}
