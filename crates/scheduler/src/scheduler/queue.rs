//! Queue Store: pending tasks grouped by the resource they need.

use std::collections::{BTreeMap, VecDeque};

use costq_core::{ResourceHandle, Task};

/// Key a group is stored under.
///
/// Ordering defines the store's scan order: resource groups in handle
/// issue order, then the unbound group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum GroupKey {
    Resource(u64),
    Unbound,
}

impl GroupKey {
    pub(crate) fn for_resource(resource: Option<&ResourceHandle>) -> Self {
        match resource {
            Some(handle) => GroupKey::Resource(handle.id()),
            None => GroupKey::Unbound,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Entry<T> {
    /// Cost as reported at push time.
    pub(crate) cost: f64,
    pub(crate) task: T,
}

/// Tasks sharing one resource, kept in ascending cost order.
#[derive(Debug)]
pub(crate) struct Group<T> {
    pub(crate) resource: Option<ResourceHandle>,
    entries: VecDeque<Entry<T>>,
}

impl<T> Group<T> {
    fn new(resource: Option<ResourceHandle>) -> Self {
        Self {
            resource,
            entries: VecDeque::new(),
        }
    }

    /// Insert after any entries of equal cost.
    fn insert(&mut self, entry: Entry<T>) {
        let at = self.entries.partition_point(|e| e.cost <= entry.cost);
        self.entries.insert(at, entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn pop_highest(&mut self) -> Option<Entry<T>> {
        self.entries.pop_back()
    }

    fn pop_lowest(&mut self) -> Option<Entry<T>> {
        self.entries.pop_front()
    }
}

/// Which end of a group to take from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Take {
    Highest,
    Lowest,
}

#[derive(Debug)]
pub(crate) struct QueueStore<T> {
    groups: BTreeMap<GroupKey, Group<T>>,
}

impl<T> Default for QueueStore<T> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<T: Task> QueueStore<T> {
    pub(crate) fn insert(&mut self, cost: f64, task: T) {
        let resource = task.resource().cloned();
        let key = GroupKey::for_resource(resource.as_ref());
        self.groups
            .entry(key)
            .or_insert_with(|| Group::new(resource))
            .insert(Entry { cost, task });
    }
}

impl<T> QueueStore<T> {
    /// Groups in storage order.
    pub(crate) fn groups(&self) -> impl Iterator<Item = (&GroupKey, &Group<T>)> {
        self.groups.iter()
    }

    /// Remove one entry from the group under `key`, dropping the group once
    /// it is empty.
    pub(crate) fn take(&mut self, key: &GroupKey, take: Take) -> Option<Entry<T>> {
        let group = self.groups.get_mut(key)?;
        let entry = match take {
            Take::Highest => group.pop_highest(),
            Take::Lowest => group.pop_lowest(),
        };
        if group.is_empty() {
            self.groups.remove(key);
        }
        entry
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.values().map(Group::len).sum()
    }

    pub(crate) fn group_count(&self) -> usize {
        self.groups.values().filter(|g| !g.is_empty()).count()
    }

    /// Drop every queued task, returning how many were discarded.
    pub(crate) fn clear(&mut self) -> usize {
        let discarded = self.len();
        self.groups.clear();
        discarded
    }
}
