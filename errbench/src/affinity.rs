//! Worker-to-CPU pinning.

use crate::error::HarnessError;

/// CPU that worker `worker` is pinned to when pinning is enabled.
pub fn cpu_for_worker(worker: usize, cpus: usize) -> usize {
    worker % cpus.max(1)
}

/// Pin the calling thread to CPU `cpu`.
///
/// No-op on targets other than Linux.
#[cfg(target_os = "linux")]
pub fn pin_current_thread(worker: usize, cpu: usize) -> Result<(), HarnessError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|source| HarnessError::Affinity { worker, cpu, source })?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|source| HarnessError::Affinity { worker, cpu, source })?;
    tracing::debug!(worker, cpu, "worker pinned");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_worker: usize, _cpu: usize) -> Result<(), HarnessError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workers_wrap_around_cpus() {
        assert_eq!(cpu_for_worker(0, 4), 0);
        assert_eq!(cpu_for_worker(5, 4), 1);
        assert_eq!(cpu_for_worker(3, 0), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn out_of_range_cpu_is_an_affinity_error() {
        let err = pin_current_thread(3, 1 << 20).unwrap_err();
        assert!(matches!(err, HarnessError::Affinity { worker: 3, .. }));
    }
}
