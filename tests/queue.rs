use mlfq_sim::process::{Interrupt, Process, Queue, QueueEvent, QueueId, QueueType};

fn cpu_queue(quantum: u64, level: usize) -> Queue {
    Queue::new(quantum, level, QueueType::CpuQueue)
}

#[test]
fn new_queue_is_empty() {
    let mut queue = cpu_queue(10, 0);
    assert!(queue.is_empty());
    assert!(queue.peek().is_none());
    assert!(queue.dequeue().is_none());
    assert_eq!(queue.priority_level(), 0);
    assert_eq!(queue.queue_type(), QueueType::CpuQueue);
}

#[test]
fn enqueue_sets_parent_and_peek_returns_it() {
    let mut queue = cpu_queue(10, 1);
    let enqueued = queue.enqueue(Process::with_times(3, 10, 0));
    assert_eq!(enqueued.pid(), 3);
    assert_eq!(enqueued.parent_queue(), Some(QueueId::cpu(1)));

    let head = queue.peek().unwrap();
    assert_eq!(head.pid(), 3);
    assert_eq!(queue.len(), 1);
}

#[test]
fn dequeue_is_fifo_and_removes_one() {
    let mut queue = cpu_queue(10, 0);
    for pid in 0..3 {
        queue.enqueue(Process::with_times(pid, 10, 0));
    }
    assert_eq!(queue.dequeue().unwrap().pid(), 0);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.peek().unwrap().pid(), 1);
}

#[test]
fn blocking_queue_has_its_own_type() {
    let queue = Queue::new(50, 0, QueueType::BlockingQueue);
    assert_eq!(queue.id(), QueueId::blocking());
    assert!(queue.id().is_blocking());
    assert_eq!(queue.quantum(), 50);
}

#[test]
fn work_on_empty_queue_is_noop() {
    let mut queue = cpu_queue(10, 0);
    assert!(queue.do_cpu_work(10).is_none());
    assert!(queue.do_blocking_work(10).is_none());
    assert_eq!(queue.quantum_clock(), 0);
}

#[test]
fn head_keeps_running_inside_its_quantum() {
    let mut queue = cpu_queue(30, 1);
    queue.enqueue(Process::with_times(1, 100, 0));
    assert!(queue.do_cpu_work(10).is_none());
    assert!(queue.do_cpu_work(10).is_none());
    assert_eq!(queue.quantum_clock(), 20);
    assert_eq!(queue.peek().unwrap().cpu_time_needed(), 80);
}

#[test]
fn exhausted_quantum_evicts_with_lower_priority() {
    let mut queue = cpu_queue(10, 0);
    queue.enqueue(Process::with_times(1, 30, 0));
    queue.enqueue(Process::with_times(2, 30, 0));

    match queue.do_cpu_work(10) {
        Some(QueueEvent::Interrupt(forwarded)) => {
            assert_eq!(forwarded.queue, QueueId::cpu(0));
            assert_eq!(forwarded.interrupt, Interrupt::LowerPriority);
            assert_eq!(forwarded.process.pid(), 1);
            assert_eq!(forwarded.process.cpu_time_needed(), 20);
        }
        other => panic!("expected LowerPriority, got {:?}", other),
    }
    assert_eq!(queue.quantum_clock(), 0);
    assert_eq!(queue.peek().unwrap().pid(), 2);
}

#[test]
fn process_finishing_inside_quantum_is_retired() {
    let mut queue = cpu_queue(30, 1);
    queue.enqueue(Process::with_times(1, 15, 0));
    queue.enqueue(Process::with_times(2, 50, 0));

    assert!(queue.do_cpu_work(10).is_none());
    match queue.do_cpu_work(10) {
        Some(QueueEvent::Retired(process)) => {
            assert_eq!(process.pid(), 1);
            assert!(process.is_finished());
        }
        other => panic!("expected retirement, got {:?}", other),
    }
    assert_eq!(queue.quantum_clock(), 0);
    assert_eq!(queue.peek().unwrap().pid(), 2);
}

#[test]
fn process_finishing_on_quantum_boundary_is_retired_not_demoted() {
    let mut queue = cpu_queue(10, 0);
    queue.enqueue(Process::with_times(1, 10, 0));
    assert!(matches!(queue.do_cpu_work(10), Some(QueueEvent::Retired(_))));
    assert!(queue.is_empty());
}

#[test]
fn blocked_process_leaves_without_being_charged() {
    let mut queue = cpu_queue(10, 0);
    queue.enqueue(Process::with_times(1, 50, 0));
    queue.enqueue(Process::with_times(2, 30, 40));
    queue.do_cpu_work(5);
    assert_eq!(queue.quantum_clock(), 5);

    // 让阻塞型进程成为队首
    queue.emit_interrupt(1, Interrupt::LowerPriority);
    match queue.do_cpu_work(5) {
        Some(QueueEvent::Interrupt(forwarded)) => {
            assert_eq!(forwarded.interrupt, Interrupt::ProcessBlocked);
            assert_eq!(forwarded.process.pid(), 2);
            assert!(forwarded.process.is_state_changed());
        }
        other => panic!("expected ProcessBlocked, got {:?}", other),
    }
    assert!(queue.is_empty());
    assert_eq!(queue.quantum_clock(), 0);
}

#[test]
fn blocking_work_raises_ready_when_wait_is_over() {
    let mut queue = Queue::new(50, 0, QueueType::BlockingQueue);
    queue.enqueue(Process::with_times(1, 20, 15));

    assert!(queue.do_blocking_work(10).is_none());
    assert_eq!(queue.quantum_clock(), 10);
    match queue.do_blocking_work(10) {
        Some(QueueEvent::Interrupt(forwarded)) => {
            assert_eq!(forwarded.queue, QueueId::blocking());
            assert_eq!(forwarded.interrupt, Interrupt::ProcessReady);
            assert_eq!(forwarded.process.blocking_time_needed(), 0);
        }
        other => panic!("expected ProcessReady, got {:?}", other),
    }
    assert!(queue.is_empty());
    assert_eq!(queue.quantum_clock(), 0);
}

#[test]
fn blocking_queue_rotates_long_waits() {
    let mut queue = Queue::new(20, 0, QueueType::BlockingQueue);
    queue.enqueue(Process::with_times(1, 20, 100));
    queue.enqueue(Process::with_times(2, 20, 100));

    assert!(queue.do_blocking_work(10).is_none());
    match queue.do_blocking_work(10) {
        Some(QueueEvent::Interrupt(forwarded)) => {
            assert_eq!(forwarded.interrupt, Interrupt::LowerPriority);
            assert_eq!(forwarded.process.pid(), 1);
            assert_eq!(forwarded.process.blocking_time_needed(), 80);
        }
        other => panic!("expected LowerPriority, got {:?}", other),
    }
    assert_eq!(queue.peek().unwrap().pid(), 2);
}

#[test]
fn state_changed_time_slice_leaves_members_untouched() {
    let mut queue = cpu_queue(30, 1);
    queue.enqueue(Process::with_times(1, 100, 0));
    queue.enqueue(Process::with_times(2, 100, 0));
    queue.do_cpu_work(20);
    assert_eq!(queue.quantum_clock(), 20);

    assert!(queue.manage_time_slice(true, 20).is_none());
    assert_eq!(queue.quantum_clock(), 0);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.peek().unwrap().pid(), 1);
}

#[test]
fn quantum_clock_never_exceeds_quantum_after_accounting() {
    let mut queue = cpu_queue(25, 1);
    for pid in 0..4 {
        queue.enqueue(Process::with_times(pid, 1000, 0));
    }
    for _ in 0..50 {
        if let Some(QueueEvent::Interrupt(forwarded)) = queue.do_cpu_work(7) {
            queue.enqueue(forwarded.process);
        }
        assert!(queue.quantum_clock() <= queue.quantum());
    }
}

#[test]
fn emit_interrupt_removes_interior_process() {
    let mut queue = cpu_queue(10, 0);
    for pid in 0..3 {
        queue.enqueue(Process::with_times(pid, 10, 0));
    }
    let forwarded = queue.emit_interrupt(1, Interrupt::ProcessBlocked);
    assert_eq!(forwarded.process.pid(), 1);
    assert_eq!(forwarded.queue, QueueId::cpu(0));
    let remaining: Vec<_> = queue.iter().map(Process::pid).collect();
    assert_eq!(remaining, vec![0, 2]);
}

#[test]
#[should_panic(expected = "cannot find pid 9")]
fn emit_interrupt_for_foreign_process_panics() {
    let mut queue = cpu_queue(10, 0);
    queue.enqueue(Process::with_times(1, 10, 0));
    queue.emit_interrupt(9, Interrupt::ProcessReady);
}

#[test]
fn drain_empties_queue_and_resets_clock() {
    let mut queue = cpu_queue(30, 2);
    queue.enqueue(Process::with_times(1, 100, 0));
    queue.enqueue(Process::with_times(2, 100, 0));
    queue.do_cpu_work(10);

    let drained = queue.drain();
    assert_eq!(drained.len(), 2);
    assert!(queue.is_empty());
    assert_eq!(queue.quantum_clock(), 0);
}
