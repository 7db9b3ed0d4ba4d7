// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Utility for generating programmable transactions, or for logic dealing with them.
//!
//! Inputs and commands are append-only. Every `Argument` handed out stays valid for the life of
//! the builder, and snapshots taken with [`ProgrammableTransactionBuilder::finalize`] never
//! change when more commands are added afterwards.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::base_types::{ObjectID, ObjectRef, SuiAddress};
use crate::config::ProtocolLimits;
use crate::error::{SuiError, SuiResult};
use crate::transaction::{
    check_argument, check_command_limits, Argument, CallArg, Command, ObjectArg,
    ProgrammableTransaction, PureArg,
};
use crate::type_tag::{Identifier, TypeTag};
use crate::SUI_FRAMEWORK_PACKAGE_ID;

#[cfg(test)]
#[path = "unit_tests/programmable_transaction_builder_tests.rs"]
mod programmable_transaction_builder_tests;

/// Dedup key for inputs.
#[derive(PartialEq, Eq, Hash, Clone, Debug)]
enum BuilderArg {
    Object(ObjectID),
    /// Typed pure values dedup on type and encoding; untyped ones on encoding alone.
    Pure {
        type_: Option<TypeTag>,
        bytes: Vec<u8>,
    },
    ForcedNonUniquePure(usize),
}

#[derive(Clone, Debug)]
pub struct ProgrammableTransactionBuilder {
    inputs: IndexMap<BuilderArg, CallArg>,
    commands: Vec<Command>,
    /// Output count per command, `None` when only the network knows.
    outputs: Vec<Option<usize>>,
    limits: ProtocolLimits,
}

impl Default for ProgrammableTransactionBuilder {
    fn default() -> Self {
        Self::with_limits(ProtocolLimits::default())
    }
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: ProtocolLimits) -> Self {
        Self {
            inputs: IndexMap::new(),
            commands: vec![],
            outputs: vec![],
            limits,
        }
    }

    /// An immutable snapshot of everything added so far. The builder stays usable.
    pub fn finalize(&self) -> ProgrammableTransaction {
        debug!(
            inputs = self.inputs.len(),
            commands = self.commands.len(),
            "finalized programmable transaction"
        );
        ProgrammableTransaction {
            inputs: self.inputs.values().cloned().collect(),
            commands: self.commands.clone(),
        }
    }

    pub fn finish(self) -> ProgrammableTransaction {
        let Self {
            inputs, commands, ..
        } = self;
        let inputs = inputs.into_values().collect();
        ProgrammableTransaction { inputs, commands }
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn pure_bytes(&mut self, bytes: Vec<u8>, force_separate: bool) -> SuiResult<Argument> {
        self.insert_pure(None, bytes, force_separate)
    }

    /// Adds a value BCS-encoded through serde, deduplicated by its bytes.
    pub fn pure<T: Serialize>(&mut self, value: T) -> SuiResult<Argument> {
        self.pure_bytes(bcs::to_bytes(&value)?, false)
    }

    /// Like `pure`, but always adds a new input even when identical bytes were added before.
    pub fn force_separate_pure<T: Serialize>(&mut self, value: T) -> SuiResult<Argument> {
        self.pure_bytes(bcs::to_bytes(&value)?, true)
    }

    /// Adds a typed value, deduplicated by its type and encoding.
    pub fn pure_typed(&mut self, arg: PureArg) -> SuiResult<Argument> {
        let bytes = arg.encode()?;
        self.insert_pure(Some(arg.type_.type_tag()), bytes, false)
    }

    fn insert_pure(
        &mut self,
        type_: Option<TypeTag>,
        bytes: Vec<u8>,
        force_separate: bool,
    ) -> SuiResult<Argument> {
        fp_ensure!(
            bytes.len() as u64 <= self.limits.max_pure_argument_size,
            SuiError::size_limit("max_pure_argument_size", bytes.len())
        );
        let key = if force_separate {
            BuilderArg::ForcedNonUniquePure(self.inputs.len())
        } else {
            BuilderArg::Pure {
                type_,
                bytes: bytes.clone(),
            }
        };
        if let Some(existing) = self.inputs.get_index_of(&key) {
            trace!(index = existing, "reusing pure input");
            return Ok(Argument::Input(existing as u16));
        }
        self.push_input(key, CallArg::Pure(bytes))
    }

    /// Adds an object input, deduplicated by object id. Re-adding a shared object with a
    /// different mutability keeps the mutable form; any other disagreement is an error.
    pub fn obj(&mut self, obj_arg: ObjectArg) -> SuiResult<Argument> {
        let id = obj_arg.id();
        let key = BuilderArg::Object(id);
        let Some(index) = self.inputs.get_index_of(&key) else {
            let object_inputs = self
                .inputs
                .keys()
                .filter(|k| matches!(k, BuilderArg::Object(_)))
                .count();
            fp_ensure!(
                (object_inputs as u64) < self.limits.max_input_objects,
                SuiError::size_limit("max_input_objects", object_inputs + 1)
            );
            return self.push_input(key, CallArg::Object(obj_arg));
        };
        let existing = &mut self.inputs[index];
        let merged = match (&*existing, obj_arg) {
            (
                CallArg::Object(ObjectArg::SharedObject {
                    id: id1,
                    initial_shared_version: v1,
                    mutable: m1,
                }),
                ObjectArg::SharedObject {
                    id: id2,
                    initial_shared_version: v2,
                    mutable: m2,
                },
            ) if v1 == &v2 => {
                debug_assert_eq!(id1, &id2);
                ObjectArg::SharedObject {
                    id: id2,
                    initial_shared_version: v2,
                    mutable: *m1 || m2,
                }
            }
            (CallArg::Object(old), new) if old == &new => new,
            (old, new) => {
                return Err(SuiError::ObjectArgMismatch {
                    object_id: id.to_string(),
                    error: format!("already added as {old:?}, now given {new:?}"),
                })
            }
        };
        *existing = CallArg::Object(merged);
        trace!(object_id = %id, index, "reusing object input");
        Ok(Argument::Input(index as u16))
    }

    pub fn input(&mut self, call_arg: CallArg) -> SuiResult<Argument> {
        match call_arg {
            CallArg::Pure(bytes) => self.pure_bytes(bytes, false),
            CallArg::Object(obj) => self.obj(obj),
        }
    }

    fn push_input(&mut self, key: BuilderArg, arg: CallArg) -> SuiResult<Argument> {
        let index = self.inputs.len();
        fp_ensure!(
            index < u16::MAX as usize,
            SuiError::size_limit("inputs", index + 1)
        );
        self.inputs.insert(key, arg);
        trace!(index, "added input");
        Ok(Argument::Input(index as u16))
    }

    /// Appends a command after checking its shape, limits and argument references, and returns
    /// `Result(i)` for it.
    pub fn command(&mut self, command: Command) -> SuiResult<Argument> {
        let outputs = command.output_arity();
        self.push_command(command, outputs)
    }

    fn push_command(&mut self, command: Command, outputs: Option<usize>) -> SuiResult<Argument> {
        let position = self.commands.len();
        fp_ensure!(
            (position as u64) < self.limits.max_programmable_tx_commands,
            SuiError::size_limit("max_programmable_tx_commands", position + 1)
        );
        command.validate_shape()?;
        check_command_limits(&command, &self.limits)?;
        for argument in command.arguments() {
            check_argument(argument, position, self.inputs.len(), |i| self.outputs[i])?;
        }
        trace!(position, %command, "appended command");
        self.commands.push(command);
        self.outputs.push(outputs);
        Ok(Argument::Result(position as u16))
    }

    /// Will fail to generate if recipients and amounts do not have the same lengths
    pub fn pay_sui(&mut self, recipients: Vec<SuiAddress>, amounts: Vec<u64>) -> SuiResult {
        self.pay_impl(recipients, amounts, Argument::GasCoin)
    }

    pub fn pay_all_sui(&mut self, recipient: SuiAddress) -> SuiResult {
        let rec_arg = self.pure(recipient)?;
        self.command(Command::TransferObjects(vec![Argument::GasCoin], rec_arg))?;
        Ok(())
    }

    /// Will fail to generate if recipients and amounts do not have the same lengths.
    /// Or if coins is empty
    pub fn pay(
        &mut self,
        coins: Vec<ObjectRef>,
        recipients: Vec<SuiAddress>,
        amounts: Vec<u64>,
    ) -> SuiResult {
        let mut coins = coins.into_iter();
        let Some(coin) = coins.next() else {
            return Err(SuiError::InvalidTransaction {
                error: "coins vector is empty".to_string(),
            });
        };
        let coin_arg = self.obj(ObjectArg::ImmOrOwnedObject(coin))?;
        let merge_args = coins
            .map(|c| self.obj(ObjectArg::ImmOrOwnedObject(c)))
            .collect::<SuiResult<Vec<_>>>()?;
        if !merge_args.is_empty() {
            self.command(Command::MergeCoins(coin_arg, merge_args))?;
        }
        self.pay_impl(recipients, amounts, coin_arg)
    }

    fn pay_impl(
        &mut self,
        recipients: Vec<SuiAddress>,
        amounts: Vec<u64>,
        coin: Argument,
    ) -> SuiResult {
        fp_ensure!(
            recipients.len() == amounts.len(),
            SuiError::InvalidTransaction {
                error: format!(
                    "recipients and amounts mismatch. Got {} recipients but {} amounts",
                    recipients.len(),
                    amounts.len()
                ),
            }
        );
        if amounts.is_empty() {
            return Ok(());
        }

        // unify recipients, so we only have one transfer per recipient
        let mut recipient_map: IndexMap<SuiAddress, Vec<usize>> = IndexMap::new();
        let mut amt_args = Vec::with_capacity(recipients.len());
        for (i, (recipient, amount)) in recipients.into_iter().zip(amounts).enumerate() {
            recipient_map.entry(recipient).or_default().push(i);
            amt_args.push(self.pure(amount)?);
        }
        let Argument::Result(split_primary) = self.command(Command::SplitCoins(coin, amt_args))?
        else {
            return Err(SuiError::graph("SplitCoins did not produce a result"));
        };
        for (recipient, split_secondaries) in recipient_map {
            let rec_arg = self.pure(recipient)?;
            let coins = split_secondaries
                .into_iter()
                .map(|j| Argument::NestedResult(split_primary, j as u16))
                .collect();
            self.command(Command::TransferObjects(coins, rec_arg))?;
        }
        Ok(())
    }

    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<u64>) -> SuiResult<Argument> {
        let amt_args = amounts
            .into_iter()
            .map(|amount| self.pure(amount))
            .collect::<SuiResult<Vec<_>>>()?;
        self.command(Command::SplitCoins(coin, amt_args))
    }

    pub fn merge_coins(&mut self, target: ObjectRef, coins: Vec<ObjectRef>) -> SuiResult {
        let target = self.obj(ObjectArg::ImmOrOwnedObject(target))?;
        let coins = coins
            .into_iter()
            .map(|coin| self.obj(ObjectArg::ImmOrOwnedObject(coin)))
            .collect::<SuiResult<Vec<_>>>()?;
        self.command(Command::MergeCoins(target, coins))?;
        Ok(())
    }

    /// Merges all coins into the first one and returns it.
    pub fn smash_coins(&mut self, coins: Vec<ObjectRef>) -> SuiResult<Argument> {
        let mut coins = coins.into_iter();
        let Some(target) = coins.next() else {
            return Err(SuiError::InvalidTransaction {
                error: "cannot smash an empty list of coins".to_string(),
            });
        };
        let coin_arg = self.obj(ObjectArg::ImmOrOwnedObject(target))?;
        let sources = coins
            .map(|c| self.obj(ObjectArg::ImmOrOwnedObject(c)))
            .collect::<SuiResult<Vec<_>>>()?;
        self.command(Command::MergeCoins(coin_arg, sources))?;
        Ok(coin_arg)
    }

    pub fn transfer_arg(&mut self, recipient: SuiAddress, arg: Argument) -> SuiResult {
        self.transfer_args(recipient, vec![arg])
    }

    pub fn transfer_args(&mut self, recipient: SuiAddress, args: Vec<Argument>) -> SuiResult {
        let rec_arg = self.pure(recipient)?;
        self.command(Command::TransferObjects(args, rec_arg))?;
        Ok(())
    }

    pub fn transfer_object(&mut self, recipient: SuiAddress, object_ref: ObjectRef) -> SuiResult {
        let rec_arg = self.pure(recipient)?;
        let obj_arg = self.obj(ObjectArg::ImmOrOwnedObject(object_ref))?;
        self.command(Command::TransferObjects(vec![obj_arg], rec_arg))?;
        Ok(())
    }

    /// Sends `amount` split from the gas coin, or the whole gas coin when `amount` is `None`.
    pub fn transfer_sui(&mut self, recipient: SuiAddress, amount: Option<u64>) -> SuiResult {
        let rec_arg = self.pure(recipient)?;
        let coin_arg = if let Some(amount) = amount {
            let amt_arg = self.pure(amount)?;
            self.command(Command::SplitCoins(Argument::GasCoin, vec![amt_arg]))?
        } else {
            Argument::GasCoin
        };
        self.command(Command::TransferObjects(vec![coin_arg], rec_arg))?;
        Ok(())
    }

    /// Calls a Move function whose return count is not declared. Its results can be used with
    /// `NestedResult` at any index; the network checks them.
    pub fn programmable_move_call(
        &mut self,
        package: ObjectID,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> SuiResult<Argument> {
        self.command(Command::move_call(
            package,
            module,
            function,
            type_arguments,
            arguments,
        ))
    }

    /// Calls a Move function that returns exactly `returns` values, so later references to its
    /// results are range checked.
    pub fn move_call_with_returns(
        &mut self,
        package: ObjectID,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
        returns: usize,
    ) -> SuiResult<Argument> {
        self.push_command(
            Command::move_call(package, module, function, type_arguments, arguments),
            Some(returns),
        )
    }

    /// Adds every call argument as an input, then calls the function on them.
    pub fn move_call(
        &mut self,
        package: ObjectID,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        call_args: Vec<CallArg>,
    ) -> SuiResult<Argument> {
        let arguments = call_args
            .into_iter()
            .map(|a| self.input(a))
            .collect::<SuiResult<Vec<_>>>()?;
        self.programmable_move_call(package, module, function, type_arguments, arguments)
    }

    pub fn make_move_vec(
        &mut self,
        type_: Option<TypeTag>,
        elements: Vec<Argument>,
    ) -> SuiResult<Argument> {
        self.command(Command::MakeMoveVec(type_, elements))
    }

    pub fn make_obj_vec(
        &mut self,
        objs: impl IntoIterator<Item = ObjectArg>,
    ) -> SuiResult<Argument> {
        let make_vec_args = objs
            .into_iter()
            .map(|obj| self.obj(obj))
            .collect::<SuiResult<Vec<_>>>()?;
        self.make_move_vec(None, make_vec_args)
    }

    /// Publishes the modules and returns the upgrade capability.
    pub fn publish_upgradeable(
        &mut self,
        modules: Vec<Vec<u8>>,
        dep_ids: Vec<ObjectID>,
    ) -> SuiResult<Argument> {
        self.command(Command::Publish(modules, dep_ids))
    }

    /// Publishes the modules and makes the package immutable by consuming its upgrade cap.
    pub fn publish_immutable(&mut self, modules: Vec<Vec<u8>>, dep_ids: Vec<ObjectID>) -> SuiResult {
        let cap = self.publish_upgradeable(modules, dep_ids)?;
        self.move_call_with_returns(
            SUI_FRAMEWORK_PACKAGE_ID,
            crate::ident!("package"),
            crate::ident!("make_immutable"),
            vec![],
            vec![cap],
            0,
        )?;
        Ok(())
    }

    /// Upgrades a package given a ticket produced earlier in the same transaction; returns the
    /// upgrade receipt.
    pub fn upgrade(
        &mut self,
        current_package_object_id: ObjectID,
        upgrade_ticket: Argument,
        transitive_deps: Vec<ObjectID>,
        modules: Vec<Vec<u8>>,
    ) -> SuiResult<Argument> {
        self.command(Command::Upgrade(
            modules,
            transitive_deps,
            current_package_object_id,
            upgrade_ticket,
        ))
    }
}
