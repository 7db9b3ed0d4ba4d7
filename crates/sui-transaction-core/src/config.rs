// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[cfg(test)]
#[path = "unit_tests/config_tests.rs"]
mod config_tests;

/// YAML-backed configuration files.
pub trait Config
where
    Self: DeserializeOwned + Serialize,
{
    fn persisted(self, path: &Path) -> PersistedConfig<Self> {
        PersistedConfig {
            inner: self,
            path: path.to_path_buf(),
        }
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        trace!("Reading config from {}", path.display());
        let reader = fs::File::open(path)
            .with_context(|| format!("Unable to load config from {}", path.display()))?;
        Ok(serde_yaml::from_reader(reader)?)
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), anyhow::Error> {
        let path = path.as_ref();
        trace!("Writing config to {}", path.display());
        let config = serde_yaml::to_string(&self)?;
        fs::write(path, config)
            .with_context(|| format!("Unable to save config to {}", path.display()))?;
        Ok(())
    }
}

/// A config value that remembers the file it came from.
#[derive(Clone, Debug)]
pub struct PersistedConfig<C> {
    inner: C,
    path: PathBuf,
}

impl<C> PersistedConfig<C>
where
    C: Config,
{
    pub fn read(path: &Path) -> Result<C, anyhow::Error> {
        C::load(path)
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        self.inner.save(&self.path)
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<C> Deref for PersistedConfig<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<C> DerefMut for PersistedConfig<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

/// Limits the network enforces on a transaction, checked locally so oversized transactions
/// fail at construction instead of at submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProtocolLimits {
    pub max_input_objects: u64,
    pub max_pure_argument_size: u64,
    pub max_programmable_tx_commands: u64,
    pub max_arguments: u64,
    pub max_type_arguments: u64,
    pub max_type_argument_depth: u64,
    pub max_tx_size_bytes: u64,
    pub max_gas_payment_objects: u64,
    pub max_signers_in_multisig: u64,
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_input_objects: 2048,
            max_pure_argument_size: 16 * 1024,
            max_programmable_tx_commands: 1024,
            max_arguments: 512,
            max_type_arguments: 16,
            max_type_argument_depth: 16,
            max_tx_size_bytes: 128 * 1024,
            max_gas_payment_objects: 256,
            max_signers_in_multisig: 10,
        }
    }
}

impl Config for ProtocolLimits {}
