use std::sync::Arc;

use dashmap::DashMap;

use super::task::TaskRecord;

/// 任务表：task_id -> TaskRecord
///
/// 读写都在 DashMap 分片锁内完成，锁不会跨越任何网络调用。
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<DashMap<String, TaskRecord>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, task_id: &str) {
        self.tasks
            .insert(task_id.to_string(), TaskRecord::new(task_id));
    }

    pub fn get(&self, task_id: &str) -> Option<TaskRecord> {
        self.tasks.get(task_id).map(|task| task.value().clone())
    }

    /// 原地修改任务，任务不存在时什么也不做，返回是否找到
    pub fn mutate<F>(&self, task_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut TaskRecord),
    {
        match self.tasks.get_mut(task_id) {
            Some(mut task) => {
                f(task.value_mut());
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::task::TaskStatus;

    #[test]
    fn create_starts_zeroed() {
        let registry = TaskRegistry::new();
        registry.create("t1");
        let task = registry.get("t1").unwrap();
        assert_eq!(task.status, TaskStatus::Starting);
        assert_eq!(task.progress, 0);
        assert_eq!(task.total_pages, 0);
        assert!(task.destination_path.is_none());
    }

    #[test]
    fn mutate_missing_is_noop() {
        let registry = TaskRegistry::new();
        assert!(!registry.mutate("ghost", |task| task.progress = 5));
        assert!(registry.get("ghost").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn concurrent_readers_see_writes() {
        let registry = TaskRegistry::new();
        registry.create("t1");

        std::thread::scope(|scope| {
            let writer = registry.clone();
            scope.spawn(move || {
                for i in 1..=1000 {
                    writer.mutate("t1", |task| task.progress = i);
                }
            });
            for _ in 0..4 {
                let reader = registry.clone();
                scope.spawn(move || {
                    let mut last = 0;
                    for _ in 0..1000 {
                        let progress = reader.get("t1").unwrap().progress;
                        assert!(progress >= last);
                        last = progress;
                    }
                });
            }
        });

        assert_eq!(registry.get("t1").unwrap().progress, 1000);
    }
}
