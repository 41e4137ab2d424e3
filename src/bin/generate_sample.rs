use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scan size in pixels.
const ROWS: usize = 120;
const COLS: usize = 160;

/// Profilm's invalid-pixel marker.
const SENTINEL: f64 = 1e38;

/// Fraction of pixels the instrument flags as invalid.
const DROPOUT_RATE: f64 = 0.01;

/// Surface roughness (nm, one standard deviation) on both levels.
const ROUGHNESS: f64 = 1.5;

/// Normally distributed height around `level` (Box-Muller, cosine branch).
fn rough_height(rng: &mut StdRng, level: f64) -> f64 {
    // `random` is in [0, 1); flip it so the logarithm never sees zero.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    level + ROUGHNESS * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Coating thickness (nm) at stage position (x, y) mm: thicker in the centre.
fn thickness(x: f64, y: f64) -> f64 {
    120.0 - 0.4 * (x * x + y * y)
}

/// One scan: substrate on the left, coating on the right of a slightly
/// wandering edge, both with roughness and a sprinkling of dropouts.
fn generate_scan(step: f64, rng: &mut StdRng) -> String {
    let mut text = String::new();
    text.push_str("Profilm3D height map\n");
    let _ = writeln!(text, "rows={ROWS} cols={COLS}");
    text.push_str("units=nm\n");

    for r in 0..ROWS {
        let edge = COLS as f64 / 2.0 + 6.0 * (r as f64 / 15.0).sin();
        let row: Vec<String> = (0..COLS)
            .map(|c| {
                if rng.random_bool(DROPOUT_RATE) {
                    let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
                    return format!("{:e}", sign * SENTINEL);
                }
                let level = if (c as f64) < edge { 0.0 } else { step };
                format!("{:.3}", rough_height(rng, level))
            })
            .collect();
        text.push_str(&row.join("\t"));
        text.push('\n');
    }
    text
}

fn main() -> anyhow::Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_scans"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);

    let xs = [-10.0, -5.0, 0.0, 5.0, 10.0];
    let ys = [-7.5, 0.0, 7.5];

    let mut manifest = String::from("X (mm),Y (mm)\n");
    let mut n_files = 0;
    for &y in &ys {
        for &x in &xs {
            let (xt, yt) = (format!("{x:.1}"), format!("{y:.1}"));
            let _ = writeln!(manifest, "{xt},{yt}");

            let scan = generate_scan(thickness(x, y), &mut rng);
            let path = out_dir.join(format!("({xt}, {yt}).txt"));
            std::fs::write(&path, scan).with_context(|| format!("writing {}", path.display()))?;
            n_files += 1;
        }
    }

    let manifest_path = out_dir.join("positions.txt");
    std::fs::write(&manifest_path, manifest)
        .with_context(|| format!("writing {}", manifest_path.display()))?;

    println!(
        "Wrote {n_files} scans ({ROWS}x{COLS} pixels each) and {} to {}",
        manifest_path.display(),
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_has_header_and_full_matrix() {
        let scan = generate_scan(100.0, &mut StdRng::seed_from_u64(7));
        let lines: Vec<&str> = scan.lines().collect();
        assert_eq!(lines.len(), 3 + ROWS);
        assert!(lines[3..].iter().all(|l| l.split('\t').count() == COLS));
    }

    #[test]
    fn same_seed_same_scan() {
        let a = generate_scan(80.0, &mut StdRng::seed_from_u64(1));
        let b = generate_scan(80.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn roughness_is_centred_on_level() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 20_000;
        let mean = (0..n).map(|_| rough_height(&mut rng, 40.0)).sum::<f64>() / n as f64;
        assert!((mean - 40.0).abs() < 0.1, "mean = {mean}");
    }
}
