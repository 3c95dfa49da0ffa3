// crates/psamp-core/src/pipeline/job.rs

use std::path::Path;

use tracing::warn;

use crate::comm::{Communicator, LocalCluster};
use crate::config::SubsampleConfig;
use crate::error::{PsampError, Result};
use crate::format::writer::SnapshotWriter;
use crate::particle::snapshot::Snapshot;
use crate::pipeline::subsampler::{SubsampleReport, Subsampler};
use crate::sampler::scratch::ScratchBuffer;

/// One rank's whole job: init, subsample, finalize.
///
/// This is the only place a fatal error leaves the pipeline. Any error raised
/// on this rank is reported through `comm.abort` before returning, so ranks
/// waiting in a collective are released instead of hanging.
pub fn run_node<C, W>(
    comm: &C,
    config: SubsampleConfig,
    filename: &Path,
    snapshot: &Snapshot,
    scratch: &mut ScratchBuffer,
    writer: &mut W,
) -> Result<Option<SubsampleReport>>
where
    C: Communicator + ?Sized,
    W: SnapshotWriter + ?Sized,
{
    let result = Subsampler::init(config, comm.rank()).and_then(|mut s| {
        let r = s.write_subsample(filename, snapshot, scratch, comm, writer);
        s.finalize();
        r
    });

    if let Err(e) = &result {
        if e.is_remote_abort() {
            warn!(rank = comm.rank(), "{e}");
        } else {
            comm.abort(e.code(), &e.to_string());
        }
    }
    result
}

/// The error that brought the job down. A locally raised error beats the
/// "aborted by rank N" echoes, which beat a bare disconnect; ties go to the
/// lowest rank.
pub fn root_cause<T>(results: &[Result<T>]) -> Option<&PsampError> {
    results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .min_by_key(|e| blame(e))
}

fn blame(e: &PsampError) -> u8 {
    if e.is_disconnect() {
        2
    } else if e.is_remote_abort() {
        1
    } else {
        0
    }
}

/// Result of one rank in a `LocalJob`.
#[derive(Debug)]
pub struct NodeResult<W> {
    pub rank: usize,
    pub outcome: Result<Option<SubsampleReport>>,
    pub writer: W,
}

/// An in-process distributed job: rank `i` holds `parts[i]` and a scratch
/// buffer of `scratch[i]` records.
#[derive(Debug)]
pub struct LocalJob<'a> {
    pub parts: &'a [Snapshot],
    pub scratch: &'a [usize],
    pub config: SubsampleConfig,
    pub output: &'a Path,
}

impl LocalJob<'_> {
    pub fn run<W, F>(&self, make_writer: F) -> Result<Vec<NodeResult<W>>>
    where
        W: SnapshotWriter + Send,
        F: Fn(usize) -> W + Sync,
    {
        if self.parts.is_empty() {
            return Err(PsampError::Config("a job needs at least one node".into()));
        }
        if self.scratch.len() != self.parts.len() {
            return Err(PsampError::Config(format!(
                "{} scratch sizes for {} nodes",
                self.scratch.len(),
                self.parts.len()
            )));
        }

        Ok(LocalCluster::run(self.parts.len(), |comm| {
            let rank = comm.rank();
            let mut writer = make_writer(rank);
            let outcome = match ScratchBuffer::with_capacity(self.scratch[rank]) {
                Ok(mut scratch) => run_node(
                    &comm,
                    self.config,
                    self.output,
                    &self.parts[rank],
                    &mut scratch,
                    &mut writer,
                ),
                Err(e) => {
                    comm.abort(e.code(), &e.to_string());
                    Err(e)
                }
            };
            NodeResult {
                rank,
                outcome,
                writer,
            }
        }))
    }
}
