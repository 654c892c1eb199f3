//! Dependency graph queries over an experiment's task snapshot.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::Task;

/// Returns `true` if adding the edge `task_id -> candidate_dependency_id`
/// would introduce a directed cycle.
///
/// A task depending on itself is always a cycle. Otherwise the graph formed
/// by the snapshot plus the candidate edge is walked depth-first from
/// `task_id`; meeting a node that is still on the current path closes a
/// cycle. Nodes are only expanded once, so shared ancestors (diamonds) are
/// not mistaken for cycles.
///
/// # Examples
///
/// ```rust
/// # use std::collections::BTreeSet;
/// # use jiff::Timestamp;
/// # use labplan_core::{models::Task, schedule::{would_create_cycle, WeekId}};
/// # fn task(id: u64, deps: &[u64]) -> Task {
/// #     Task {
/// #         id,
/// #         experiment_id: 1,
/// #         title: format!("Task {id}"),
/// #         description: None,
/// #         week_id: "2024-01-07".parse::<WeekId>().unwrap(),
/// #         importance: 3,
/// #         completed: false,
/// #         dependencies: deps.iter().copied().collect::<BTreeSet<_>>(),
/// #         recurrence_group_id: None,
/// #         plan_task_id: None,
/// #         created_at: Timestamp::UNIX_EPOCH,
/// #         updated_at: Timestamp::UNIX_EPOCH,
/// #     }
/// # }
/// // 1 depends on 2, 2 depends on 3.
/// let tasks = vec![task(1, &[2]), task(2, &[3]), task(3, &[])];
///
/// assert!(would_create_cycle(&tasks, 3, 1));
/// assert!(!would_create_cycle(&tasks, 1, 3));
/// ```
pub fn would_create_cycle(tasks: &[Task], task_id: u64, candidate_dependency_id: u64) -> bool {
    if task_id == candidate_dependency_id {
        return true;
    }

    let mut edges: HashMap<u64, Vec<u64>> = tasks
        .iter()
        .map(|task| (task.id, task.dependencies.iter().copied().collect()))
        .collect();
    edges
        .entry(task_id)
        .or_default()
        .push(candidate_dependency_id);

    let mut visited: HashSet<u64> = HashSet::new();
    let mut on_path: HashSet<u64> = HashSet::new();
    // (node, index of the next outgoing edge to follow)
    let mut stack: Vec<(u64, usize)> = vec![(task_id, 0)];
    visited.insert(task_id);
    on_path.insert(task_id);

    while let Some((node, next)) = stack.last_mut() {
        let node = *node;
        let successor = edges.get(&node).and_then(|deps| deps.get(*next)).copied();
        *next += 1;

        match successor {
            Some(dep) if on_path.contains(&dep) => return true,
            Some(dep) => {
                if visited.insert(dep) {
                    on_path.insert(dep);
                    stack.push((dep, 0));
                }
            }
            None => {
                on_path.remove(&node);
                stack.pop();
            }
        }
    }

    false
}

/// Returns `true` if at least one dependency of `task` resolves to an
/// incomplete task in `all_tasks`.
///
/// Dependency IDs that do not resolve to any task are ignored.
pub fn is_blocked(task: &Task, all_tasks: &[Task]) -> bool {
    task.dependencies.iter().any(|dep_id| {
        all_tasks
            .iter()
            .any(|other| other.id == *dep_id && !other.completed)
    })
}

/// IDs of every incomplete task blocked by an incomplete dependency.
pub fn blocked_task_ids(tasks: &[Task]) -> BTreeSet<u64> {
    let completed: HashMap<u64, bool> = tasks.iter().map(|t| (t.id, t.completed)).collect();

    tasks
        .iter()
        .filter(|task| !task.completed)
        .filter(|task| {
            task.dependencies
                .iter()
                .any(|dep_id| completed.get(dep_id) == Some(&false))
        })
        .map(|task| task.id)
        .collect()
}

/// Removes `task_id` from the snapshot and strips it from every remaining
/// task's dependencies. Dependents are kept.
pub fn remove_task(tasks: &[Task], task_id: u64) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.id != task_id)
        .cloned()
        .map(|mut task| {
            task.dependencies.remove(&task_id);
            task
        })
        .collect()
}
