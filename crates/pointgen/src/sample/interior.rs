//! Rejection sampling of points inside a closed mesh.
//!
//! Model
//! - Draw candidates uniformly in the mesh's bounding box (one range per
//!   axis), keep those `is_point_inside_mesh_cfg` accepts.
//! - Stop once `target` points are accepted, the attempt budget
//!   `target × attempts_per_point` is spent, or the cancel token fires.
//!   Running out of budget is not an error: check `InteriorSample::status`.
//!
//! Progress
//! - Sinks run synchronously inside the loop, so a slow sink slows the
//!   sampler. Sinks must not block indefinitely. To observe progress from
//!   another thread, run the sampler on a worker and use `ChannelSink`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use rand::Rng;

use crate::geom3::{is_point_inside_mesh_cfg, Aabb3, GeomCfg, Mesh, Point3};

use super::source::RngSeed;

/// Upper bound on the points buffer reserved before sampling starts.
const RESERVE_CAP: usize = 1 << 16;

/// Sampler policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerCfg {
    /// Attempt budget per requested point.
    pub attempts_per_point: usize,
    /// Report progress whenever the accepted count is a multiple of this (0 = never).
    pub progress_every: usize,
    pub geom: GeomCfg,
}

impl Default for SamplerCfg {
    fn default() -> Self {
        Self {
            attempts_per_point: 100,
            progress_every: 10,
            geom: GeomCfg::default(),
        }
    }
}

/// One progress report: `current` of `total` points accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Receiver of progress reports.
pub trait ProgressSink {
    fn report(&mut self, current: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    #[inline]
    fn report(&mut self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Forwards reports over a channel.
///
/// A hung-up receiver is ignored unless a token was attached with
/// `cancel_on_hangup`; then the first failed send cancels it.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: Sender<Progress>,
    on_hangup: Option<CancelToken>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Progress>) -> Self {
        Self {
            tx,
            on_hangup: None,
        }
    }

    pub fn cancel_on_hangup(mut self, token: CancelToken) -> Self {
        self.on_hangup = Some(token);
        self
    }
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, current: usize, total: usize) {
        if self.tx.send(Progress { current, total }).is_err() {
            if let Some(token) = &self.on_hangup {
                token.cancel();
            }
        }
    }
}

/// Cooperative cancellation flag, checked once per attempt.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why sampling stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleStatus {
    /// All requested points were accepted.
    Complete,
    /// The attempt budget ran out first; `points` is a partial result.
    BudgetExhausted,
    /// The cancel token fired.
    Cancelled,
    /// The mesh has no vertices; nothing was attempted.
    EmptyMesh,
}

/// Accepted points (in acceptance order) plus bookkeeping.
#[derive(Clone, Debug)]
pub struct InteriorSample {
    pub points: Vec<Point3>,
    pub requested: usize,
    pub attempts: usize,
    pub status: SampleStatus,
    /// Box candidates were drawn from (`None` for an empty mesh).
    pub bounds: Option<Aabb3>,
}

impl InteriorSample {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == SampleStatus::Complete
    }

    /// Fraction of candidates accepted (`None` before any attempt).
    pub fn acceptance_rate(&self) -> Option<f64> {
        (self.attempts > 0).then(|| self.points.len() as f64 / self.attempts as f64)
    }

    /// Monte Carlo volume estimate: box volume × acceptance rate.
    pub fn volume_estimate(&self) -> Option<f64> {
        Some(self.bounds?.volume() * self.acceptance_rate()?)
    }
}

/// Bounding-box rejection sampler over a borrowed mesh.
#[derive(Clone, Debug)]
pub struct InteriorSampler<'a> {
    mesh: &'a Mesh,
    cfg: SamplerCfg,
    cancel: Option<CancelToken>,
}

impl<'a> InteriorSampler<'a> {
    pub fn new(mesh: &'a Mesh) -> Self {
        Self {
            mesh,
            cfg: SamplerCfg::default(),
            cancel: None,
        }
    }

    pub fn with_cfg(mut self, cfg: SamplerCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub fn cfg(&self) -> &SamplerCfg {
        &self.cfg
    }

    /// Attempt budget for `target` points.
    #[inline]
    pub fn max_attempts(&self, target: usize) -> usize {
        target.saturating_mul(self.cfg.attempts_per_point)
    }

    pub fn run<R: Rng + ?Sized>(&self, target: usize, rng: &mut R) -> InteriorSample {
        self.sample(target, rng, None)
    }

    pub fn run_with_progress<R: Rng + ?Sized>(
        &self,
        target: usize,
        rng: &mut R,
        sink: &mut dyn ProgressSink,
    ) -> InteriorSample {
        self.sample(target, rng, Some(sink))
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        target: usize,
        rng: &mut R,
        mut sink: Option<&mut dyn ProgressSink>,
    ) -> InteriorSample {
        let Some(bounds) = self.mesh.bounds() else {
            tracing::debug!(requested = target, "empty mesh, nothing to sample");
            return InteriorSample {
                points: Vec::new(),
                requested: target,
                attempts: 0,
                status: SampleStatus::EmptyMesh,
                bounds: None,
            };
        };
        let max_attempts = self.max_attempts(target);
        let every = self.cfg.progress_every;
        // `target` is caller-controlled; grow past this on acceptance.
        let mut points = Vec::with_capacity(target.min(max_attempts).min(RESERVE_CAP));
        let mut attempts = 0usize;
        let mut cancelled = false;

        while points.len() < target && attempts < max_attempts {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                cancelled = true;
                break;
            }
            let p = Point3::new(
                draw_axis(rng, bounds.min.x, bounds.max.x),
                draw_axis(rng, bounds.min.y, bounds.max.y),
                draw_axis(rng, bounds.min.z, bounds.max.z),
            );
            if is_point_inside_mesh_cfg(&p, self.mesh, &self.cfg.geom) {
                points.push(p);
                if every > 0 && points.len() % every == 0 {
                    if let Some(sink) = sink.as_deref_mut() {
                        sink.report(points.len(), target);
                    }
                }
            }
            attempts += 1;
        }

        let status = if points.len() == target {
            SampleStatus::Complete
        } else if cancelled {
            SampleStatus::Cancelled
        } else {
            SampleStatus::BudgetExhausted
        };
        tracing::debug!(
            requested = target,
            accepted = points.len(),
            attempts,
            max_attempts,
            ?status,
            "interior sampling finished"
        );
        InteriorSample {
            points,
            requested: target,
            attempts,
            status,
            bounds: Some(bounds),
        }
    }
}

/// Uniform in `[lo, hi)`; collapses to `lo` for a flat axis.
#[inline]
fn draw_axis<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

/// Sample up to `target` interior points with a fresh entropy-seeded
/// generator and default policy. May return fewer than `target`.
pub fn generate_interior_points(
    mesh: &Mesh,
    target: usize,
    progress: Option<&mut dyn ProgressSink>,
) -> Vec<Point3> {
    let mut rng = RngSeed::Entropy.into_rng();
    let sampler = InteriorSampler::new(mesh);
    let sample = match progress {
        Some(sink) => sampler.run_with_progress(target, &mut rng, sink),
        None => sampler.run(target, &mut rng),
    };
    sample.points
}
