//! Ground-truth tests on generated hikes

#![cfg(feature = "synthetic")]

use trackstamp::synthetic::{HikePattern, SyntheticHike};
use trackstamp::{AlignConfig, SolverKind, align_track};

fn config(solver: SolverKind) -> AlignConfig {
    AlignConfig {
        solver,
        ..AlignConfig::default()
    }
}

#[test]
fn test_generated_dataset_shape() {
    let dataset = SyntheticHike::default().generate();

    assert_eq!(dataset.photos.len(), 5);
    assert!(dataset.true_indices.windows(2).all(|w| w[0] < w[1]));
    assert!(dataset.photos.windows(2).all(|w| w[0].time <= w[1].time));
    assert_eq!(dataset.true_times.len(), dataset.track.len());
    assert_eq!(dataset.true_times[0], dataset.start_time);
    assert_eq!(*dataset.true_times.last().unwrap(), dataset.end_time);

    let last = dataset.track.len() - 1;
    assert!(dataset.true_indices.iter().all(|&i| i != 0 && i != last));
}

#[test]
fn test_generation_is_deterministic() {
    let a = SyntheticHike::default().generate();
    let b = SyntheticHike::default().generate();
    assert_eq!(a.track, b.track);
    assert_eq!(a.photos, b.photos);
}

#[test]
fn test_recovers_times_on_noiseless_hike() {
    for pattern in [HikePattern::Straight, HikePattern::Winding, HikePattern::Loop] {
        let hike = SyntheticHike {
            pattern,
            photo_count: 6,
            photo_noise_sigma_meters: 0.0,
            ..SyntheticHike::default()
        };
        let dataset = hike.generate();

        let result = align_track(
            &dataset.track,
            &dataset.photos,
            dataset.start_time,
            dataset.end_time,
            &config(SolverKind::DynamicProgramming),
        )
        .unwrap();

        assert_eq!(result.report.track_indices, dataset.true_indices, "{:?}", pattern);
        assert_eq!(result.report.score, 0.0);

        // Constant walking speed: only whole-second truncation separates
        // interpolated times from the truth
        for (p, truth) in result.track.iter().zip(&dataset.true_times) {
            assert!((p.time.unwrap() - truth).abs() <= 2, "{:?}", pattern);
        }
    }
}

#[test]
fn test_solvers_agree_on_noisy_out_and_back() {
    for seed in 0..10 {
        let hike = SyntheticHike {
            length_meters: 3_000.0,
            pattern: HikePattern::OutAndBack,
            photo_count: 6,
            photo_noise_sigma_meters: 8.0,
            seed,
            ..SyntheticHike::default()
        };
        let dataset = hike.generate();

        let brute = align_track(
            &dataset.track,
            &dataset.photos,
            dataset.start_time,
            dataset.end_time,
            &config(SolverKind::BruteForce),
        );
        let dp = align_track(
            &dataset.track,
            &dataset.photos,
            dataset.start_time,
            dataset.end_time,
            &config(SolverKind::DynamicProgramming),
        );

        match (brute, dp) {
            (Ok(brute), Ok(dp)) => {
                assert!((brute.report.score - dp.report.score).abs() < 1e-9, "seed {}", seed);
                assert_eq!(brute.report.stats.feasible, dp.report.stats.feasible);
                let times: Vec<i64> = dp.track.iter().map(|p| p.time.unwrap()).collect();
                assert!(times.windows(2).all(|w| w[0] <= w[1]), "seed {}", seed);
            }
            (Err(a), Err(b)) => assert_eq!(a, b, "seed {}", seed),
            (a, b) => panic!("seed {}: solvers disagree: {:?} vs {:?}", seed, a.err(), b.err()),
        }
    }
}
