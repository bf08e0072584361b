use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use pointgen::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod output;
mod provenance;

use output::{read_stats, write_points};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "pointgen")]
#[command(about = "Sample random points inside closed triangle meshes")]
struct Cmd {
    /// Log sampler internals (debug level)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Rejection-sample points inside a mesh and write them to csv/parquet/json
    Sample(SampleArgs),
    /// Classify one point against a mesh
    Inside {
        /// STL path, or `cube` for the built-in unit cube
        #[arg(long)]
        mesh: String,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        point: Point3,
        #[arg(long, default_value_t = 1e-8)]
        eps: f64,
    },
    /// Draw uniform points on one triangle (printed as JSON)
    Triangle {
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p1: Point3,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p2: Point3,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        p3: Point3,
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Summarise a csv/parquet point table (count, mean, bounds)
    Stats {
        #[arg(long)]
        points: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Debug)]
struct SampleArgs {
    /// STL path, or `cube` for the built-in unit cube
    #[arg(long)]
    mesh: String,
    #[arg(long)]
    count: usize,
    /// Output file; the extension picks the format
    #[arg(long)]
    out: PathBuf,
    /// Fixed seed for reproducible output (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 100)]
    attempts_per_point: usize,
    #[arg(long, default_value_t = 10)]
    progress_every: usize,
    #[arg(long, default_value_t = 1e-8)]
    eps: f64,
    /// Cancel sampling after this many seconds and keep the partial result
    #[arg(long)]
    max_seconds: Option<f64>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Sample(args) => sample(args).map(|_| ()),
        Action::Inside { mesh, point, eps } => inside(&mesh, point, eps),
        Action::Triangle {
            p1,
            p2,
            p3,
            count,
            seed,
        } => triangle(p1, p2, p3, count, seed),
        Action::Stats { points } => stats(&points),
        Action::Report => report(),
    }
}

fn parse_point(s: &str) -> Result<Point3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z, got {s:?}"));
    }
    let mut xyz = [0.0; 3];
    for (dst, part) in xyz.iter_mut().zip(&parts) {
        *dst = part
            .parse()
            .map_err(|e| format!("bad coordinate {part:?}: {e}"))?;
    }
    Ok(Point3::from(xyz))
}

fn load_mesh(source: &str) -> Result<Mesh> {
    let mesh = if source == "cube" {
        Mesh::unit_cube()
    } else {
        read_stl(source).with_context(|| format!("loading mesh {source}"))?
    };
    mesh.check_indices()?;
    tracing::info!(
        mesh = source,
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "mesh"
    );
    Ok(mesh)
}

fn sample(args: SampleArgs) -> Result<InteriorSample> {
    tracing::info!(mesh = args.mesh, count = args.count, seed = ?args.seed, "sample");
    let mesh = load_mesh(&args.mesh)?;
    let cfg = SamplerCfg {
        attempts_per_point: args.attempts_per_point,
        progress_every: args.progress_every,
        geom: GeomCfg::uniform(args.eps),
    };
    let deadline = match args.max_seconds {
        Some(secs) => Some(
            Instant::now()
                + Duration::try_from_secs_f64(secs)
                    .with_context(|| format!("invalid --max-seconds {secs}"))?,
        ),
        None => None,
    };
    let token = CancelToken::new();
    let seed = RngSeed::from(args.seed);
    let started = Instant::now();

    let (tx, rx) = mpsc::channel();
    let sample = std::thread::scope(|scope| {
        let sampler = InteriorSampler::new(&mesh)
            .with_cfg(cfg)
            .with_cancel(token.clone());
        let count = args.count;
        let hangup = token.clone();
        let worker = scope.spawn(move || {
            let mut rng = seed.into_rng();
            let mut sink = ChannelSink::new(tx).cancel_on_hangup(hangup);
            sampler.run_with_progress(count, &mut rng, &mut sink)
        });
        drain_progress(&rx, deadline, &token);
        worker.join()
    })
    .map_err(|_| anyhow!("sampling worker panicked"))?;

    let elapsed = started.elapsed().as_secs_f64();
    tracing::info!(
        accepted = sample.points.len(),
        requested = sample.requested,
        attempts = sample.attempts,
        status = ?sample.status,
        elapsed,
        "sampled"
    );
    if !sample.is_complete() {
        tracing::warn!(
            missing = sample.requested - sample.points.len(),
            "returning a partial result"
        );
    }

    write_points(&args.out, &sample.points)?;
    let payload = Payload::new(serde_json::json!({
        "mesh": args.mesh,
        "count": args.count,
        "seed": args.seed,
        "attempts_per_point": args.attempts_per_point,
        "eps": args.eps,
    }))
    .with_summary(serde_json::json!({
        "accepted": sample.points.len(),
        "attempts": sample.attempts,
        "status": format!("{:?}", sample.status),
        "volume_estimate": sample.volume_estimate(),
        "elapsed_s": elapsed,
    }));
    let sidecar = write_sidecar(&args.out, payload)?;
    tracing::info!(out = %args.out.display(), provenance = %sidecar.display(), "wrote");
    Ok(sample)
}

/// Log progress until the worker hangs up; cancel once `deadline` passes.
fn drain_progress(rx: &Receiver<Progress>, mut deadline: Option<Instant>, token: &CancelToken) {
    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::warn!("time limit reached, cancelling");
            token.cancel();
            deadline = None;
        }
        let next = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match next {
            Ok(p) => tracing::info!(current = p.current, total = p.total, "progress"),
            // Checked at the top of the loop.
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn inside(mesh: &str, point: Point3, eps: f64) -> Result<()> {
    let mesh = load_mesh(mesh)?;
    let cfg = GeomCfg::uniform(eps);
    let crossings = count_ray_crossings(&point, &RAY_DIR, &mesh, &cfg);
    let obj = serde_json::json!({
        "point": [point.x, point.y, point.z],
        "inside": crossings % 2 == 1,
        "crossings": crossings,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn triangle(p1: Point3, p2: Point3, p3: Point3, count: usize, seed: Option<u64>) -> Result<()> {
    tracing::info!(count, seed = ?seed, "triangle");
    let mut rng = RngSeed::from(seed).into_rng();
    let pts: Vec<[f64; 3]> = (0..count)
        .map(|_| {
            let p = point_in_triangle(&mut rng, &p1, &p2, &p3);
            [p.x, p.y, p.z]
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&pts)?);
    Ok(())
}

fn stats(path: &std::path::Path) -> Result<()> {
    tracing::info!(points = %path.display(), "stats");
    let s = read_stats(path)?;
    println!("{}", serde_json::to_string_pretty(&s)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": pointgen::VERSION,
        "defaults": {
            "attempts_per_point": SamplerCfg::default().attempts_per_point,
            "progress_every": SamplerCfg::default().progress_every,
            "eps": GeomCfg::default().eps_parallel,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
