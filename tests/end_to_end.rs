//! Full inversion scenario: synthesize measurements with known seabed
//! parameters and recover them from the posterior.

use seabed_oracle::{
    Dataset, InferenceConfig, InferenceEngine, InversionProblem, LaplaceInference,
    MetropolisInference, Param, PekerisRayModel, SeabedParams,
};

const TRUE_RHO: f64 = 1.5;
const TRUE_C: f64 = 1.2;
const TRUE_DELTA: f64 = 0.001;

fn reference_problem() -> InversionProblem {
    let truth = SeabedParams::new(TRUE_RHO, TRUE_C, TRUE_DELTA).unwrap();
    let depths: Vec<f64> = (10..=19).map(f64::from).collect();
    let frequencies: Vec<f64> = (0..=20).map(|i| 5000.0 + 100.0 * f64::from(i)).collect();
    let model = PekerisRayModel::default();
    let dataset = Dataset::synthesize(&model, 100.0, &depths, &frequencies, &truth).unwrap();
    assert_eq!(dataset.len(), 210);
    InversionProblem::new(model, dataset).unwrap()
}

#[test]
fn laplace_recovers_the_true_parameters() {
    let problem = reference_problem();
    let outcome = LaplaceInference::new()
        .fit(&problem, &InferenceConfig::default())
        .unwrap();

    let mean = outcome.posterior().mean();
    assert!(
        (mean[0] - TRUE_RHO).abs() < 0.01,
        "density ratio estimate {} too far from {TRUE_RHO}",
        mean[0]
    );
    assert!(
        (mean[1] - TRUE_C).abs() < 0.01,
        "speed ratio estimate {} too far from {TRUE_C}",
        mean[1]
    );
    assert!(
        (mean[2] - TRUE_DELTA).abs() < 5e-4,
        "attenuation estimate {} too far from {TRUE_DELTA}",
        mean[2]
    );

    // The fit carries a usable uncertainty on every axis.
    for param in [Param::DensityRatio, Param::SpeedRatio, Param::Attenuation] {
        let sd = outcome.posterior().std_dev(param);
        assert!(sd.is_finite() && sd > 0.0);
    }
}

#[test]
fn laplace_is_deterministic() {
    let problem = reference_problem();
    let config = InferenceConfig::default();
    let a = LaplaceInference::new().fit(&problem, &config).unwrap();
    let b = LaplaceInference::new().fit(&problem, &config).unwrap();
    assert_eq!(a.posterior().mean(), b.posterior().mean());
    assert_eq!(a.posterior().covariance(), b.posterior().covariance());
}

#[test]
fn metropolis_recovers_the_true_parameters() {
    let problem = reference_problem();
    // Tighter proposals than the default: the noise-free posterior is narrow.
    let config = InferenceConfig::new()
        .mc_samples(8_000)
        .burn_in(1_000)
        .proposal_scale(0.002)
        .init_grid(16)
        .seed(1234);
    let outcome = MetropolisInference::new().fit(&problem, &config).unwrap();

    // A degraded outcome (acceptance-rate warning) still carries the best
    // available posterior; only the estimate accuracy is asserted here.
    let mean = outcome.posterior().mean();
    assert!(
        (mean[0] - TRUE_RHO).abs() < 0.05,
        "density ratio estimate {} too far from {TRUE_RHO}",
        mean[0]
    );
    assert!(
        (mean[1] - TRUE_C).abs() < 0.05,
        "speed ratio estimate {} too far from {TRUE_C}",
        mean[1]
    );
    assert!(
        (mean[2] - TRUE_DELTA).abs() < 5e-4,
        "attenuation estimate {} too far from {TRUE_DELTA}",
        mean[2]
    );
}

#[test]
fn metropolis_is_reproducible_for_a_fixed_seed() {
    let problem = reference_problem();
    let config = InferenceConfig::new()
        .mc_samples(500)
        .burn_in(100)
        .proposal_scale(0.002)
        .init_grid(6)
        .seed(7);
    let a = MetropolisInference::new().fit(&problem, &config).unwrap();
    let b = MetropolisInference::new().fit(&problem, &config).unwrap();
    assert_eq!(a.posterior().mean(), b.posterior().mean());
}

#[test]
fn posterior_density_profiles_peak_near_the_truth() {
    let problem = reference_problem();
    let posterior = LaplaceInference::new()
        .fit(&problem, &InferenceConfig::default())
        .unwrap()
        .into_posterior();

    let grid: Vec<f64> = (0..=40).map(|i| 1.0 + 2.0 * f64::from(i) / 40.0).collect();
    let profile = posterior.density_profile(Param::DensityRatio, &grid, (TRUE_C, TRUE_DELTA));
    let peak = profile
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| grid[i])
        .unwrap();
    assert!((peak - TRUE_RHO).abs() <= 0.1);
}

#[test]
fn posterior_samples_cluster_around_the_mean() {
    let problem = reference_problem();
    let posterior = LaplaceInference::new()
        .fit(&problem, &InferenceConfig::default())
        .unwrap()
        .into_posterior();

    let draws = posterior.sample(2_000, Some(99));
    let mean = draws
        .iter()
        .fold(seabed_oracle::Vector3::zeros(), |acc, x| acc + x)
        / 2_000.0;
    for i in 0..3 {
        let sd = posterior.covariance()[(i, i)].sqrt();
        assert!(
            (mean[i] - posterior.mean()[i]).abs() < 5.0 * sd / (2_000.0_f64).sqrt() + 1e-12,
            "sample mean drifted on axis {i}"
        );
    }
}
