use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// One absorption band: centre (nm), width (nm), peak cross-section (cm²).
type Band = (f64, f64, f64);

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn cross_section(wavelength: f64, bands: &[Band], noise_level: f64, noise: &mut Noise) -> f64 {
    let signal: f64 = bands
        .iter()
        .map(|&(mu, sigma, amp)| gaussian(wavelength, mu, sigma, amp))
        .sum();
    signal + noise_level * noise.normal()
}

/// Seeded measurement noise (SplitMix64 stream, Box-Muller normals).
struct Noise(u64);

impl Noise {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal sample.
    fn normal(&mut self) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Writes a commented three-column table (wavelength in nm, then two
/// absorption cross-sections in cm²) with a descending wavelength axis, so
/// it exercises comment skipping and `--reverse`.
fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_xs.dat".to_string());
    let mut noise = Noise(42);

    // Wavelengths: 500 → 300.2 nm, step 0.2
    let wavelengths: Vec<f64> = (0..1000).map(|i| 500.0 - i as f64 * 0.2).collect();

    let species: [(&str, Vec<Band>); 2] = [
        ("O3", vec![(320.0, 12.0, 4.0e-19), (340.0, 6.0, 1.5e-20)]),
        (
            "NO2",
            vec![(400.0, 30.0, 6.0e-19), (440.0, 4.0, 1.2e-19), (460.0, 4.0, 0.9e-19)],
        ),
    ];

    let file = File::create(&output_path).with_context(|| format!("creating {output_path}"))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "; synthetic absorption cross-sections")?;
    writeln!(out, "; columns: wavelength [nm], {}, {}", species[0].0, species[1].0)?;
    writeln!(out, "# generated by generate_sample (seed 42)")?;

    for &wl in &wavelengths {
        let a = cross_section(wl, &species[0].1, 1.0e-22, &mut noise);
        let b = cross_section(wl, &species[1].1, 1.0e-22, &mut noise);
        writeln!(out, "{wl:.2}\t{a:.6e}\t{b:.6e}")?;
    }
    out.flush().context("flushing output")?;

    println!("Wrote {} rows (3 columns) to {output_path}", wavelengths.len());
    Ok(())
}
