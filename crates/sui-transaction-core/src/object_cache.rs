// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use dashmap::DashMap;
use tracing::trace;

use crate::base_types::{ObjectID, SequenceNumber};
use crate::transaction::ObjectArg;

#[cfg(test)]
#[path = "unit_tests/object_cache_tests.rs"]
mod object_cache_tests;

/// Memoizes lookups whose answers never change once known: the version a shared object was
/// first shared at, and the package a state object belongs to.
///
/// Entries are never evicted or overwritten. The resolver runs outside any lock, so two
/// threads racing on the same key may both resolve it; the first insert wins and both callers
/// see that value.
#[derive(Debug, Default)]
pub struct ObjectCache {
    shared_versions: DashMap<ObjectID, SequenceNumber>,
    package_ids: DashMap<ObjectID, ObjectID>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared_version(&self, id: &ObjectID) -> Option<SequenceNumber> {
        self.shared_versions.get(id).map(|v| *v)
    }

    pub fn package_id(&self, state_object: &ObjectID) -> Option<ObjectID> {
        self.package_ids.get(state_object).map(|v| *v)
    }

    pub fn get_or_try_insert_shared_version<F, E>(
        &self,
        id: ObjectID,
        resolve: F,
    ) -> Result<SequenceNumber, E>
    where
        F: FnOnce(ObjectID) -> Result<SequenceNumber, E>,
    {
        get_or_try_insert(&self.shared_versions, id, resolve, "shared version")
    }

    pub fn get_or_try_insert_package_id<F, E>(
        &self,
        state_object: ObjectID,
        resolve: F,
    ) -> Result<ObjectID, E>
    where
        F: FnOnce(ObjectID) -> Result<ObjectID, E>,
    {
        get_or_try_insert(&self.package_ids, state_object, resolve, "package id")
    }

    /// A shared-object argument whose initial shared version comes from the cache, or from
    /// `resolve` on a miss.
    pub fn shared_object_arg<F, E>(
        &self,
        id: ObjectID,
        mutable: bool,
        resolve: F,
    ) -> Result<ObjectArg, E>
    where
        F: FnOnce(ObjectID) -> Result<SequenceNumber, E>,
    {
        let initial_shared_version = self.get_or_try_insert_shared_version(id, resolve)?;
        Ok(ObjectArg::SharedObject {
            id,
            initial_shared_version,
            mutable,
        })
    }

    pub fn len(&self) -> usize {
        self.shared_versions.len() + self.package_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn get_or_try_insert<V, F, E>(
    map: &DashMap<ObjectID, V>,
    key: ObjectID,
    resolve: F,
    what: &'static str,
) -> Result<V, E>
where
    V: Copy,
    F: FnOnce(ObjectID) -> Result<V, E>,
{
    if let Some(hit) = map.get(&key) {
        trace!(object_id = %key, what, "cache hit");
        return Ok(*hit);
    }
    let resolved = resolve(key)?;
    let value = *map.entry(key).or_insert(resolved);
    trace!(object_id = %key, what, "cache insert");
    Ok(value)
}
