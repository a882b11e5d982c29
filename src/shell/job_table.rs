//! Background job bookkeeping.
//!
//! The table is owned by the shell and only ever touched from the control
//! thread, so it needs no locking.

use std::fmt;
use std::io::Write;
use std::slice;

use log::{debug, error, info, warn};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};

use crate::errors::{ErrorKind, Result};
use crate::execute_command::wait_for_process;
use crate::job::Job;
use crate::util;

pub struct JobTable {
    jobs: Vec<Job>,
    capacity: usize,
}

impl JobTable {
    pub fn with_capacity(capacity: usize) -> JobTable {
        JobTable {
            jobs: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    /// Starts tracking `job`. Fails if the table is at capacity or the pid is
    /// already tracked; the table is unchanged in both cases.
    pub fn insert(&mut self, job: Job) -> Result<()> {
        if self.is_full() {
            bail!(ErrorKind::JobTableFull(self.capacity));
        }
        if self.jobs.iter().any(|j| j.pid() == job.pid()) {
            bail!(ErrorKind::DuplicateJob(job.pid().as_raw()));
        }

        debug!("tracking job {} ({})", job.pid(), job.command());
        self.jobs.push(job);
        Ok(())
    }

    /// Current jobs in insertion order.
    pub fn list(&self) -> slice::Iter<Job> {
        self.jobs.iter()
    }

    /// Checks every job without blocking, removing and reporting the ones
    /// that have terminated. Survivors keep their relative order.
    pub fn reap_completed(&mut self, stdout: &mut dyn Write) -> Result<Vec<Job>> {
        let (finished, running): (Vec<Job>, Vec<Job>) =
            self.jobs.drain(..).partition(has_terminated);
        self.jobs = running;

        for job in &finished {
            writeln!(
                stdout,
                "Background process with PID {} ({}) finished.",
                job.pid(),
                job.command()
            )?;
        }

        Ok(finished)
    }

    /// Blocks on every job in table order, reporting each as it is reaped.
    pub fn wait_all(&mut self, stdout: &mut dyn Write) -> Result<()> {
        while let Some(job) = self.jobs.first().cloned() {
            match wait_for_process(job.pid()) {
                Ok(status) => debug!("job {} exited with {}", job.pid(), status),
                Err(Errno::ECHILD) => warn!("job {} was already reaped", job.pid()),
                Err(e) => return Err(e.into()),
            }

            self.jobs.remove(0);
            writeln!(
                stdout,
                "Background process with PID {} ({}) finished.",
                job.pid(),
                job.command()
            )?;
        }

        Ok(())
    }

    /// Sends SIGKILL to every job, reaps it and reports it.
    pub fn kill_all(&mut self, stdout: &mut dyn Write) -> Result<()> {
        while let Some(job) = self.jobs.first().cloned() {
            match signal::kill(job.pid(), Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => {}
                Err(e) => return Err(e.into()),
            }
            match wait_for_process(job.pid()) {
                Ok(_) | Err(Errno::ECHILD) => {}
                Err(e) => return Err(e.into()),
            }

            info!("killed job {} ({})", job.pid(), job.command());
            self.jobs.remove(0);
            writeln!(
                stdout,
                "Terminated background process with PID {} ({}).",
                job.pid(),
                job.command()
            )?;
        }

        Ok(())
    }
}

fn has_terminated(job: &Job) -> bool {
    match wait::waitpid(job.pid(), Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::StillAlive) => false,
        Ok(status) => match util::exit_status_of(&status) {
            Some(exit_status) => {
                debug!("job {} exited with {}", job.pid(), exit_status);
                true
            }
            None => false,
        },
        Err(Errno::ECHILD) => {
            warn!("job {} is no longer a child of this shell", job.pid());
            true
        }
        Err(e) => {
            error!("failed to check on job {}: {}", job.pid(), e);
            false
        }
    }
}

impl fmt::Debug for JobTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} jobs\tcapacity: {}", self.jobs.len(), self.capacity)?;
        for job in &self.jobs {
            writeln!(f, "{:?}", job)?;
        }

        Ok(())
    }
}
