// crates/psamp-core/src/comm/local.rs

use std::cell::Cell;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use tracing::{debug, error};

use crate::comm::{check_recv_layout, Communicator, GatherRecv, COORDINATOR};
use crate::error::{codes, CommError};

/// How long a rank whose peer has gone away waits for the abort that
/// explains it.
const ABORT_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug)]
enum Message {
    Count { from: usize, seq: u64, value: u64 },
    Payload { from: usize, seq: u64, bytes: Vec<u8> },
    Release { seq: u64 },
    Abort { from: usize, code: i32, message: String },
}

/// One rank's endpoint in an in-process job. Each rank runs on its own
/// thread; ranks share nothing but these channels.
#[derive(Debug)]
pub struct LocalComm {
    rank: usize,
    inbox: Receiver<Message>,
    peers: Vec<Sender<Message>>,
    /// Collective sequence number; every collective bumps it on every rank.
    seq: Cell<u64>,
}

impl LocalComm {
    fn next_seq(&self) -> u64 {
        let s = self.seq.get() + 1;
        self.seq.set(s);
        s
    }

    /// A peer drops its inbox only once the job is over for it. Mid-collective
    /// that means some rank has broadcast an abort, possibly still in flight.
    fn send(&self, to: usize, msg: Message) -> Result<(), CommError> {
        match self.peers[to].send(msg) {
            Ok(()) => Ok(()),
            Err(_) => Err(self.await_abort(to)),
        }
    }

    fn await_abort(&self, gone: usize) -> CommError {
        loop {
            match self.inbox.recv_timeout(ABORT_GRACE) {
                Ok(Message::Abort {
                    from,
                    code,
                    message,
                }) => {
                    return CommError::Aborted {
                        rank: from,
                        code,
                        message,
                    }
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return CommError::Disconnected { rank: gone }
                }
            }
        }
    }

    /// Next message that is not an abort. An abort from any rank ends the
    /// collective here.
    fn recv(&self) -> Result<Message, CommError> {
        match self.inbox.recv() {
            Ok(Message::Abort {
                from,
                code,
                message,
            }) => Err(CommError::Aborted {
                rank: from,
                code,
                message,
            }),
            Ok(m) => Ok(m),
            Err(_) => Err(CommError::Disconnected { rank: self.rank }),
        }
    }

    fn release_all(&self, seq: u64) -> Result<(), CommError> {
        for to in 0..self.peers.len() {
            if to != self.rank {
                self.send(to, Message::Release { seq })?;
            }
        }
        Ok(())
    }

    fn wait_release(&self, seq: u64) -> Result<(), CommError> {
        match self.recv()? {
            Message::Release { seq: s } if s == seq => Ok(()),
            other => Err(unexpected(&other, seq, "waiting for release")),
        }
    }
}

fn unexpected(m: &Message, seq: u64, during: &str) -> CommError {
    CommError::Protocol(format!("unexpected {m:?} {during} (collective #{seq})"))
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn gather_count(&self, value: u64) -> Result<Option<Vec<u64>>, CommError> {
        let seq = self.next_seq();

        if self.rank != COORDINATOR {
            self.send(
                COORDINATOR,
                Message::Count {
                    from: self.rank,
                    seq,
                    value,
                },
            )?;
            self.wait_release(seq)?;
            return Ok(None);
        }

        let mut values: Vec<Option<u64>> = vec![None; self.size()];
        values[self.rank] = Some(value);
        let mut pending = self.size() - 1;
        while pending > 0 {
            match self.recv()? {
                Message::Count {
                    from,
                    seq: s,
                    value,
                } if s == seq && from < values.len() => {
                    if values[from].replace(value).is_some() {
                        return Err(CommError::Protocol(format!(
                            "rank {from} reported its count twice"
                        )));
                    }
                    pending -= 1;
                }
                other => return Err(unexpected(&other, seq, "during count exchange")),
            }
        }
        self.release_all(seq)?;

        let values: Option<Vec<u64>> = values.into_iter().collect();
        values
            .map(Some)
            .ok_or_else(|| CommError::Protocol("count exchange incomplete".into()))
    }

    fn gather_bytes(&self, send: &[u8], recv: Option<GatherRecv<'_>>) -> Result<(), CommError> {
        let seq = self.next_seq();

        if self.rank != COORDINATOR {
            if recv.is_some() {
                return Err(CommError::Protocol(format!(
                    "rank {} passed a receive buffer to a gather rooted at {COORDINATOR}",
                    self.rank
                )));
            }
            self.send(
                COORDINATOR,
                Message::Payload {
                    from: self.rank,
                    seq,
                    bytes: send.to_vec(),
                },
            )?;
            return self.wait_release(seq);
        }

        let recv = recv.ok_or_else(|| {
            CommError::Protocol("coordinator called gather without a receive buffer".into())
        })?;
        check_recv_layout(&recv, self.size())?;
        let GatherRecv {
            buf,
            counts,
            offsets,
        } = recv;

        let place = |buf: &mut [u8], from: usize, bytes: &[u8]| -> Result<(), CommError> {
            if bytes.len() != counts[from] {
                return Err(CommError::LengthMismatch {
                    expected: counts[from],
                    actual: bytes.len(),
                });
            }
            let off = offsets[from];
            buf[off..off + bytes.len()].copy_from_slice(bytes);
            Ok(())
        };

        place(&mut *buf, self.rank, send)?;

        let mut seen = vec![false; self.size()];
        seen[self.rank] = true;
        let mut pending = self.size() - 1;
        while pending > 0 {
            match self.recv()? {
                Message::Payload {
                    from,
                    seq: s,
                    bytes,
                } if s == seq && from < seen.len() => {
                    if std::mem::replace(&mut seen[from], true) {
                        return Err(CommError::Protocol(format!(
                            "rank {from} sent its payload twice"
                        )));
                    }
                    place(&mut *buf, from, &bytes)?;
                    pending -= 1;
                }
                other => return Err(unexpected(&other, seq, "during gather")),
            }
        }
        self.release_all(seq)
    }

    fn abort(&self, code: i32, message: &str) {
        error!(rank = self.rank, code, "{message}");
        for (to, peer) in self.peers.iter().enumerate() {
            if to == self.rank {
                continue;
            }
            // A peer that already finished has dropped its inbox; nothing to wake.
            let _ = peer.send(Message::Abort {
                from: self.rank,
                code,
                message: message.to_string(),
            });
        }
    }
}

impl Drop for LocalComm {
    fn drop(&mut self) {
        // A rank that dies mid-job would otherwise leave its peers waiting forever.
        if std::thread::panicking() {
            self.abort(codes::COMM, "rank panicked");
        }
    }
}

/// Spawns a job of `size` ranks on scoped threads.
pub struct LocalCluster;

impl LocalCluster {
    /// Fully connected endpoints, indexed by rank.
    pub fn comms(size: usize) -> Vec<LocalComm> {
        let size = size.max(1);
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..size).map(|_| channel::<Message>()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalComm {
                rank,
                inbox,
                peers: senders.clone(),
                seq: Cell::new(0),
            })
            .collect()
    }

    /// Run `node` once per rank and return the results in rank order.
    /// A panicking rank aborts the job and the panic is re-raised here.
    pub fn run<T, F>(size: usize, node: F) -> Vec<T>
    where
        T: Send,
        F: Fn(LocalComm) -> T + Sync,
    {
        let comms = Self::comms(size);
        debug!(nodes = comms.len(), "starting local cluster");
        let node = &node;
        std::thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| s.spawn(move || node(comm)))
                .collect();
            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(v) => v,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_arrive_in_rank_order() {
        let out = LocalCluster::run(5, |comm| {
            comm.gather_count(10 * comm.rank() as u64 + 1).unwrap()
        });
        assert_eq!(out[0], Some(vec![1, 11, 21, 31, 41]));
        assert!(out[1..].iter().all(Option::is_none));
    }

    #[test]
    fn payloads_land_at_their_offsets() {
        let out = LocalCluster::run(3, |comm| {
            let send = vec![comm.rank() as u8 + 1; comm.rank() + 1];
            if comm.rank() != COORDINATOR {
                comm.gather_bytes(&send, None).unwrap();
                return Vec::new();
            }
            let mut buf = vec![0u8; 8];
            comm.gather_bytes(
                &send,
                Some(GatherRecv {
                    buf: &mut buf,
                    counts: &[1, 2, 3],
                    offsets: &[0, 1, 3],
                }),
            )
            .unwrap();
            buf
        });
        assert_eq!(out[0], vec![1, 2, 2, 3, 3, 3, 0, 0]);
    }

    #[test]
    fn abort_releases_a_waiting_coordinator() {
        let out = LocalCluster::run(2, |comm| {
            if comm.rank() == 1 {
                comm.abort(7, "boom");
                return None;
            }
            Some(comm.gather_count(0))
        });
        match &out[0] {
            Some(Err(CommError::Aborted {
                rank: 1,
                code: 7,
                message,
            })) => assert_eq!(message, "boom"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn peer_that_arrives_after_the_coordinator_left_sees_its_abort() {
        let mut comms = LocalCluster::comms(2).into_iter();
        let (c0, c1) = (comms.next().unwrap(), comms.next().unwrap());
        c0.abort(codes::CAPACITY_LOCAL, "not enough memory");
        drop(c0);

        match c1.gather_count(5) {
            Err(CommError::Aborted { rank: 0, code, .. }) => {
                assert_eq!(code, codes::CAPACITY_LOCAL)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn abort_still_in_flight_is_waited_for() {
        let mut comms = LocalCluster::comms(3).into_iter();
        let (c0, c1, c2) = (
            comms.next().unwrap(),
            comms.next().unwrap(),
            comms.next().unwrap(),
        );
        // Coordinator already gone, the abort that explains it comes later.
        drop(c0);
        std::thread::scope(|s| {
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                c2.abort(codes::CAPACITY_GLOBAL, "late");
            });
            match c1.gather_count(1) {
                Err(CommError::Aborted { rank: 2, code, .. }) => {
                    assert_eq!(code, codes::CAPACITY_GLOBAL)
                }
                other => panic!("unexpected {other:?}"),
            }
        });
    }

    #[test]
    fn wrong_payload_size_is_reported() {
        let out = LocalCluster::run(2, |comm| {
            if comm.rank() == 1 {
                // Sends 4 bytes where the plan expects 2; the abort that
                // follows on the coordinator releases us.
                return comm.gather_bytes(&[9; 4], None).is_err();
            }
            let mut buf = vec![0u8; 4];
            let r = comm.gather_bytes(
                &[],
                Some(GatherRecv {
                    buf: &mut buf,
                    counts: &[0, 2],
                    offsets: &[0, 0],
                }),
            );
            let mismatch = matches!(r, Err(CommError::LengthMismatch { expected: 2, actual: 4 }));
            comm.abort(codes::COMM, "length mismatch");
            mismatch
        });
        assert!(out[0]);
        assert!(out[1]);
    }
}
