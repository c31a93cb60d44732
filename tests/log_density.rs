//! Inversion density: prior box behavior, shape errors, finiteness.

use seabed_oracle::{
    in_prior_box, log_prior, Dataset, Error, InversionProblem, PekerisRayModel, SeabedParams,
    Vector3,
};

fn small_problem() -> InversionProblem {
    let truth = SeabedParams::new(1.5, 1.2, 0.001).unwrap();
    let depths = [10.0, 12.0, 14.0];
    let frequencies = [5000.0, 6000.0];
    let model = PekerisRayModel::default();
    let dataset = Dataset::synthesize(&model, 100.0, &depths, &frequencies, &truth).unwrap();
    InversionProblem::new(model, dataset).unwrap()
}

// ============================================================================
// Prior box
// ============================================================================

#[test]
fn log_density_is_negative_infinity_outside_the_box() {
    let problem = small_problem();
    let outside = [
        Vector3::new(0.99, 1.2, 0.001),
        Vector3::new(3.01, 1.2, 0.001),
        Vector3::new(1.5, 0.49, 0.001),
        Vector3::new(1.5, 2.51, 0.001),
        Vector3::new(1.5, 1.2, -1e-9),
        Vector3::new(1.5, 1.2, 0.0031),
    ];
    for theta in &outside {
        assert!(!in_prior_box(theta));
        assert_eq!(problem.log_density(theta), f64::NEG_INFINITY);
    }
}

#[test]
fn log_density_is_finite_inside_the_box() {
    let problem = small_problem();
    let inside = [
        Vector3::new(1.5, 1.2, 0.001),
        Vector3::new(1.0, 0.5, 0.0),
        Vector3::new(3.0, 2.5, 0.003),
        Vector3::new(2.2, 1.7, 0.0021),
    ];
    for theta in &inside {
        assert!(in_prior_box(theta));
        assert!(problem.log_density(theta).is_finite());
    }
}

#[test]
fn log_prior_is_constant_inside_the_box() {
    let volume: f64 = 2.0 * 2.0 * 0.003;
    let expected = -volume.ln();
    assert!((log_prior(&Vector3::new(1.5, 1.2, 0.001)) - expected).abs() < 1e-12);
    assert!((log_prior(&Vector3::new(2.9, 0.6, 0.0029)) - expected).abs() < 1e-12);
    assert_eq!(log_prior(&Vector3::new(0.5, 1.2, 0.001)), f64::NEG_INFINITY);
}

#[test]
fn density_peaks_at_the_generating_parameters() {
    let problem = small_problem();
    let truth = Vector3::new(1.5, 1.2, 0.001);
    let at_truth = problem.log_density(&truth);
    for perturbed in [
        Vector3::new(1.7, 1.2, 0.001),
        Vector3::new(1.5, 1.35, 0.001),
        Vector3::new(1.5, 1.2, 0.0025),
    ] {
        assert!(at_truth > problem.log_density(&perturbed));
    }
}

#[test]
fn noise_free_data_maximizes_the_likelihood_exactly() {
    // At the generating parameters the quadratic term vanishes, leaving only
    // the Gaussian normalization.
    let problem = small_problem();
    let n = problem.dataset().len() as f64;
    let sigma = problem.noise_sigma();
    let expected = -n * (sigma.ln() + 0.5 * seabed_oracle::LOG_2PI);
    let actual = problem.log_likelihood(&Vector3::new(1.5, 1.2, 0.001));
    assert!((actual - expected).abs() < 1e-9);
}

// ============================================================================
// Construction errors
// ============================================================================

#[test]
fn empty_dataset_is_rejected() {
    let dataset = Dataset::from_arrays(100.0, &[], &[], &[]).unwrap();
    let result = InversionProblem::new(PekerisRayModel::default(), dataset);
    assert!(matches!(result, Err(Error::EmptyDataset)));
}

#[test]
fn mismatched_arrays_are_rejected() {
    let result = InversionProblem::from_arrays(
        PekerisRayModel::default(),
        100.0,
        &[10.0, 11.0],
        &[5000.0, 5100.0],
        &[38.0],
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { .. })));
}

#[test]
fn noise_sigma_must_be_positive() {
    let problem = small_problem();
    assert!(matches!(
        problem.clone().with_noise_sigma(0.0),
        Err(Error::InvalidParameter(_))
    ));
    assert!(problem.with_noise_sigma(1.0).is_ok());
}
