//! morphmap-bench: exercise the mapping algorithm on synthetic inputs.
//!
//! Generates a lattice mesh and a synthetic morphology of parallel
//! dendrites, runs the full mapping, and prints per-phase diagnostics.
//! Useful for:
//!
//! - Measuring per-phase durations as mesh and morphology sizes grow
//! - Observing overwrite/resolve/repair behavior under crowded sections
//! - Producing JSON diagnostics for comparison across revisions
//!
//! The mesh here is deliberately synthetic: real tetrahedral meshes are
//! external collaborators behind the [`TetMesh`] trait, and the algorithm
//! only ever sees that trait.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin morphmap-bench -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use morphmap::{
    MapConfig, MappingDiagnostics, Morphology, MorphPoint, Point3, Section, TetMesh,
    map_morphology_with_diagnostics,
};

/// Mapping parameter experimentation and diagnostics for morphmap.
///
/// Generates a `width x height` lattice mesh and `sections` parallel
/// dendrite sections spread across it, maps the morphology onto the
/// mesh, and prints detailed per-phase timing and count diagnostics.
#[derive(Parser)]
#[command(name = "morphmap-bench", version)]
struct Cli {
    /// Lattice width in cells.
    #[arg(long, default_value_t = 64, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    width: usize,

    /// Lattice height in cells.
    #[arg(long, default_value_t = 64, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    height: usize,

    /// Number of dendrite sections in the synthetic morphology.
    #[arg(long, default_value_t = 8, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    sections: usize,

    /// Points per section (segments per section is one less).
    #[arg(long, default_value_t = 5, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..))]
    points: usize,

    /// Morphology-to-mesh unit scale. The synthetic morphology is
    /// generated in mesh units, so the default is 1.0 rather than
    /// `MapConfig::DEFAULT_SCALE`.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// A `width x height` lattice of axis-aligned unit cells. Cell `(i, j)`
/// has id `j * width + i`, barycenter `(i + 0.5, j + 0.5, 0.5)`, and
/// 4-connected neighbors.
struct LatticeMesh {
    width: usize,
    height: usize,
}

impl TetMesh for LatticeMesh {
    fn tet_count(&self) -> usize {
        self.width * self.height
    }

    fn find_tet_by_point(&self, point: Point3) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 || point.z < 0.0 || point.z >= 1.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (i, j) = (point.x as usize, point.y as usize);
        (i < self.width && j < self.height).then_some(j * self.width + i)
    }

    fn neighbors(&self, tet: usize) -> [Option<usize>; 4] {
        let (i, j) = (tet % self.width, tet / self.width);
        [
            (i > 0).then(|| tet - 1),
            (i + 1 < self.width).then_some(tet + 1),
            (j > 0).then(|| tet - self.width),
            (j + 1 < self.height).then_some(tet + self.width),
        ]
    }

    fn barycenter(&self, tet: usize) -> Point3 {
        #[allow(clippy::cast_precision_loss)]
        Point3::new(
            (tet % self.width) as f64 + 0.5,
            (tet / self.width) as f64 + 0.5,
            0.5,
        )
    }
}

/// Build a soma plus `sections` horizontal dendrites spread evenly over
/// the lattice rows, each traced with `points` samples.
///
/// Section names are zero-padded so lexicographic processing order
/// matches generation order.
fn synthetic_morphology(
    width: usize,
    height: usize,
    sections: usize,
    points: usize,
) -> Result<Morphology, morphmap::MorphologyError> {
    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (width as f64, height as f64);

    let soma_y = h / 2.0;
    let mut all = vec![Section {
        name: "soma".to_owned(),
        parent: None,
        children: (0..sections).map(|i| format!("dend_{i:04}")).collect(),
        points: vec![
            MorphPoint::new(0.0, soma_y, 0.5, 2.0),
            MorphPoint::new(w / 8.0, soma_y, 0.5, 2.0),
        ],
    }];

    for i in 0..sections {
        #[allow(clippy::cast_precision_loss)]
        let y = (i as f64 + 0.5) * h / sections as f64;
        let samples = (0..points)
            .map(|k| {
                #[allow(clippy::cast_precision_loss)]
                let x = w * k as f64 / (points - 1) as f64;
                MorphPoint::new(x, y, 0.5, 1.0)
            })
            .collect();
        all.push(Section {
            name: format!("dend_{i:04}"),
            parent: Some("soma".to_owned()),
            children: Vec::new(),
            points: samples,
        });
    }

    Morphology::from_sections(all)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mesh = LatticeMesh {
        width: cli.width,
        height: cli.height,
    };
    let morphology = match synthetic_morphology(cli.width, cli.height, cli.sections, cli.points) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: invalid synthetic morphology: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = MapConfig { scale: cli.scale };

    let mut last: Option<MappingDiagnostics> = None;
    let mut total = Duration::ZERO;
    for run in 0..cli.runs {
        match map_morphology_with_diagnostics(&mesh, &morphology, &config) {
            Ok((_, diagnostics)) => {
                total += diagnostics.total_duration;
                if cli.runs > 1 && !cli.json {
                    println!(
                        "run {}/{}: {:.3}ms",
                        run + 1,
                        cli.runs,
                        diagnostics.total_duration.as_secs_f64() * 1000.0,
                    );
                }
                last = Some(diagnostics);
            }
            Err(e) => {
                eprintln!("error: mapping failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(diagnostics) = last else {
        return ExitCode::FAILURE;
    };

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
        if cli.runs > 1 {
            #[allow(clippy::cast_precision_loss)]
            let mean_ms = total.as_secs_f64() * 1000.0 / cli.runs as f64;
            println!("\nMean total over {} runs: {mean_ms:.3}ms", cli.runs);
        }
    }

    ExitCode::SUCCESS
}
