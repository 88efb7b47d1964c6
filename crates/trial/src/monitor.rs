//! Resource sampling over a trial's process subtree
//!
//! A background thread samples the solver process and its descendants while
//! the trial runs, recording CPU usage and resident memory. Sampling is
//! best-effort: a process that exits between samples simply stops
//! contributing, and a trial too short to be sampled reports no figures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use sysinfo::{Pid, System};

/// Sampling period. Coarser than the process-wait poll because CPU usage
/// deltas need a measurable window between refreshes.
const SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Resource figures observed over one trial's process subtree. All fields
/// are absent when the process exited before the first sample.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    /// Average CPU usage in percent, summed across the subtree
    pub cpu_usage_avg: Option<f64>,
    /// Peak CPU usage in percent, summed across the subtree
    pub cpu_usage_max: Option<f64>,
    /// Peak resident memory in MiB, summed across the subtree
    pub memory_peak_mb: Option<f64>,
}

/// Samples the subtree rooted at one pid until told to stop.
pub(crate) struct ResourceMonitor {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<ResourceUsage>,
}

impl ResourceMonitor {
    /// Start sampling `pid` and its descendants on a background thread.
    pub(crate) fn start(pid: u32) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::spawn(move || sample_loop(Pid::from_u32(pid), &flag));
        Self { stop, handle }
    }

    /// Stop the sampler and fold its samples into a usage summary.
    pub(crate) fn finish(self) -> ResourceUsage {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.join().unwrap_or_default()
    }
}

fn sample_loop(root: Pid, stop: &AtomicBool) -> ResourceUsage {
    let mut sys = System::new();
    let mut cpu_samples: Vec<f64> = Vec::new();
    let mut memory_peak: u64 = 0;

    // The first refresh only establishes the baseline for CPU deltas.
    sys.refresh_processes();

    while !stop.load(Ordering::Relaxed) {
        std::thread::sleep(SAMPLE_INTERVAL);
        sys.refresh_processes();

        let tracked = subtree(&sys, root);
        if tracked.is_empty() {
            continue;
        }

        let mut cpu = 0.0_f64;
        let mut memory = 0_u64;
        for pid in &tracked {
            if let Some(process) = sys.process(*pid) {
                cpu += f64::from(process.cpu_usage());
                memory += process.memory();
            }
        }
        cpu_samples.push(cpu);
        memory_peak = memory_peak.max(memory);
    }

    let mut usage = ResourceUsage::default();
    if !cpu_samples.is_empty() {
        usage.cpu_usage_avg = Some(cpu_samples.iter().sum::<f64>() / cpu_samples.len() as f64);
        usage.cpu_usage_max = Some(cpu_samples.iter().copied().fold(f64::MIN, f64::max));
    }
    if memory_peak > 0 {
        usage.memory_peak_mb = Some(memory_peak as f64 / (1024.0 * 1024.0));
    }
    usage
}

/// Pids of `root` and every live descendant, by walking parent links to a
/// fixpoint.
fn subtree(sys: &System, root: Pid) -> HashSet<Pid> {
    let mut tracked = HashSet::from([root]);
    if sys.process(root).is_none() {
        return HashSet::new();
    }
    loop {
        let before = tracked.len();
        for (pid, process) in sys.processes() {
            if process.parent().is_some_and(|parent| tracked.contains(&parent)) {
                tracked.insert(*pid);
            }
        }
        if tracked.len() == before {
            return tracked;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn monitor_observes_a_live_process() {
        let mut child = std::process::Command::new("sleep")
            .arg("2")
            .spawn()
            .unwrap();

        let monitor = ResourceMonitor::start(child.id());
        std::thread::sleep(Duration::from_millis(600));
        let usage = monitor.finish();

        let _ = child.kill();
        let _ = child.wait();

        assert!(usage.cpu_usage_avg.is_some());
        assert!(usage.memory_peak_mb.unwrap_or(0.0) > 0.0);
    }

    #[test]
    fn finished_process_yields_no_figures() {
        let usage = ResourceMonitor::start(u32::MAX - 1).finish();
        assert_eq!(usage, ResourceUsage::default());
    }
}
