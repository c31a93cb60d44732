//! Tutorial driver: synthesize transmission-loss measurements with known
//! seabed parameters, invert them, and print the posterior.
//!
//! ```sh
//! cargo run --example invert
//! ```

use seabed_oracle::{
    output, Dataset, InferenceConfig, InferenceEngine, InversionProblem, LaplaceInference, Param,
    PekerisRayModel, SeabedParams,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The "experiment": a seabed we pretend not to know.
    let truth = SeabedParams::new(1.5, 1.2, 0.001)?;

    // Receivers every meter from 10 m to 19 m, tones from 5 kHz to 7 kHz in
    // 100 Hz steps, all at 100 m range.
    let depths: Vec<f64> = (10..=19).map(f64::from).collect();
    let frequencies: Vec<f64> = (0..=20).map(|i| 5000.0 + 100.0 * f64::from(i)).collect();

    let model = PekerisRayModel::default();
    let dataset = Dataset::synthesize(&model, 100.0, &depths, &frequencies, &truth)?;
    println!(
        "synthesized {} noise-free measurements at 100 m range",
        dataset.len()
    );

    let observations = dataset.len();
    let problem = InversionProblem::new(model, dataset)?;
    let outcome = LaplaceInference::new().fit(&problem, &InferenceConfig::default())?;

    print!("{}", output::format_posterior(&outcome, observations));

    // Conditional density along the attenuation axis, the hardest parameter
    // to pin down, with the other two held at their posterior means.
    let posterior = outcome.posterior();
    let mean = posterior.mean();
    let grid: Vec<f64> = (0..=30).map(|i| 0.003 * f64::from(i) / 30.0).collect();
    let profile = posterior.density_profile(Param::Attenuation, &grid, (mean[0], mean[1]));
    println!("\nattenuation density profile:");
    for (delta, density) in grid.iter().zip(&profile) {
        println!("  {delta:.5}  {density:12.4e}");
    }

    Ok(())
}
