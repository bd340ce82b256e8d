use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Re-evaluates auto close after a duration elapsed. Never cancelled,
    /// running it against a closed gate does nothing.
    CloseIfAllowed { gate: String },
    CountdownTick { actor: String, gate: String },
}

impl Task {
    pub fn gate(&self) -> &str {
        match self {
            Task::CloseIfAllowed { gate } => gate,
            Task::CountdownTick { gate, .. } => gate,
        }
    }

    fn rename_gate(&mut self, old: &str, new: &str) {
        let gate = match self {
            Task::CloseIfAllowed { gate } => gate,
            Task::CountdownTick { gate, .. } => gate,
        };
        if gate == old {
            *gate = new.to_string();
        }
    }
}

/// Deferred main thread tasks ordered by due time.
#[derive(Default)]
pub struct Scheduler {
    sequence: u64,
    queue: BinaryHeap<Reverse<(i64, TaskId)>>,
    tasks: HashMap<TaskId, Task>,
}

impl Scheduler {
    pub fn schedule_at(&mut self, due: i64, task: Task) -> TaskId {
        self.sequence += 1;
        let id = TaskId(self.sequence);
        self.queue.push(Reverse((due, id)));
        self.tasks.insert(id, task);
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    #[inline]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Takes the next task due at `now` with its due time. Cancelled tasks
    /// are skipped.
    pub fn poll(&mut self, now: i64) -> Option<(TaskId, i64, Task)> {
        while let Some(Reverse((due, id))) = self.queue.peek().copied() {
            if due > now {
                return None;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&id) {
                return Some((id, due, task));
            }
        }
        None
    }

    pub fn rename_gate(&mut self, old: &str, new: &str) {
        for task in self.tasks.values_mut() {
            task.rename_gate(old, new);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.tasks.clear();
    }
}
