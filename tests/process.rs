use mlfq_sim::config::{MAX_BLOCKING_TIME, MAX_CPU_TIME};
use mlfq_sim::process::{Interrupt, Process, QueueId};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn new_process_starts_without_parent_or_state_change() {
    let process = Process::new(7, Some(120), false);
    assert_eq!(process.pid(), 7);
    assert_eq!(process.cpu_time_needed(), 120);
    assert_eq!(process.blocking_time_needed(), 0);
    assert!(!process.is_state_changed());
    assert_eq!(process.parent_queue(), None);
}

#[test]
fn random_times_stay_within_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for pid in 0..200 {
        let process = Process::with_rng(pid, None, true, &mut rng);
        assert!((1..=MAX_CPU_TIME).contains(&process.cpu_time_needed()));
        assert!((1..=MAX_BLOCKING_TIME).contains(&process.blocking_time_needed()));
    }
}

#[test]
fn same_seed_gives_same_workload() {
    let mut first = StdRng::seed_from_u64(9);
    let mut second = StdRng::seed_from_u64(9);
    let a = Process::with_rng(1, None, true, &mut first);
    let b = Process::with_rng(1, None, true, &mut second);
    assert_eq!(a.cpu_time_needed(), b.cpu_time_needed());
    assert_eq!(a.blocking_time_needed(), b.blocking_time_needed());
}

#[test]
fn set_parent_queue_swaps_the_handle() {
    let mut process = Process::with_times(1, 10, 0);
    process.set_parent_queue(QueueId::cpu(0));
    assert_eq!(process.parent_queue(), Some(QueueId::cpu(0)));
    process.set_parent_queue(QueueId::blocking());
    assert_eq!(process.parent_queue(), Some(QueueId::blocking()));
}

#[test]
fn finished_only_when_both_counters_are_zero() {
    assert!(Process::with_times(1, 0, 0).is_finished());
    assert!(!Process::with_times(2, 0, 5).is_finished());
    assert!(!Process::with_times(3, 5, 0).is_finished());
}

#[test]
fn execute_exact_remaining_time_finishes() {
    let mut process = Process::with_times(1, 25, 0);
    assert_eq!(process.execute_process(25), None);
    assert_eq!(process.cpu_time_needed(), 0);
    assert!(process.is_finished());
}

#[test]
fn execute_past_remaining_time_clamps_to_zero() {
    let mut process = Process::with_times(1, 5, 0);
    assert_eq!(process.execute_process(40), None);
    assert_eq!(process.cpu_time_needed(), 0);
    assert!(!process.is_state_changed());
}

#[test]
fn execute_with_blocking_need_raises_blocked() {
    let mut process = Process::with_times(1, 30, 40);
    assert_eq!(process.execute_process(10), Some(Interrupt::ProcessBlocked));
    assert!(process.is_state_changed());
    // 阻塞前不消耗 CPU 时间
    assert_eq!(process.cpu_time_needed(), 30);
    assert_eq!(process.blocking_time_needed(), 40);
}

#[test]
fn blocking_execution_raises_ready_at_zero() {
    let mut process = Process::with_times(1, 30, 25);
    assert_eq!(process.execute_blocking_process(10), None);
    assert!(!process.is_state_changed());
    assert_eq!(process.execute_blocking_process(10), None);
    assert_eq!(process.blocking_time_needed(), 5);

    assert_eq!(process.execute_blocking_process(10), Some(Interrupt::ProcessReady));
    assert_eq!(process.blocking_time_needed(), 0);
    assert!(process.is_state_changed());
}

#[test]
fn blocking_step_clears_flag_left_by_blocked_step() {
    let mut process = Process::with_times(1, 30, 25);
    process.execute_process(10);
    assert!(process.is_state_changed());
    process.execute_blocking_process(5);
    assert!(!process.is_state_changed());
}

#[test]
fn ready_process_resumes_cpu_work_with_fresh_state() {
    let mut process = Process::with_times(1, 30, 10);
    assert_eq!(process.execute_process(10), Some(Interrupt::ProcessBlocked));
    assert_eq!(process.execute_blocking_process(10), Some(Interrupt::ProcessReady));

    assert_eq!(process.execute_process(10), None);
    assert!(!process.is_state_changed());
    assert_eq!(process.cpu_time_needed(), 20);
}
