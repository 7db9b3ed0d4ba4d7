// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter, Write};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use ethnum::U256;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::base_types::{EpochId, ObjectID, ObjectRef, SequenceNumber, SuiAddress};
use crate::codec::{self, MoveFieldLayout, MoveTypeLayout, MoveValue};
use crate::config::ProtocolLimits;
use crate::crypto::{Signature, SuiSigner};
use crate::digests::TransactionDigest;
use crate::error::{SuiError, SuiResult};
use crate::intent::{Intent, IntentMessage};
use crate::programmable_transaction_builder::ProgrammableTransactionBuilder;
use crate::signature::GenericSignature;
use crate::type_tag::{Identifier, TypeTag};
use crate::{SUI_CLOCK_OBJECT_ID, SUI_CLOCK_OBJECT_SHARED_VERSION};

#[cfg(test)]
#[path = "unit_tests/transaction_tests.rs"]
mod transaction_tests;

/// An input to a programmable transaction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum CallArg {
    /// Already-encoded BCS bytes of a pure value.
    Pure(Vec<u8>),
    Object(ObjectArg),
}

impl CallArg {
    pub const CLOCK_IMM: Self = Self::Object(ObjectArg::SharedObject {
        id: SUI_CLOCK_OBJECT_ID,
        initial_shared_version: SUI_CLOCK_OBJECT_SHARED_VERSION,
        mutable: false,
    });
    pub const CLOCK_MUT: Self = Self::Object(ObjectArg::SharedObject {
        id: SUI_CLOCK_OBJECT_ID,
        initial_shared_version: SUI_CLOCK_OBJECT_SHARED_VERSION,
        mutable: true,
    });

    pub fn object_id(&self) -> Option<ObjectID> {
        match self {
            CallArg::Pure(_) => None,
            CallArg::Object(o) => Some(o.id()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum ObjectArg {
    /// A Move object, either immutable or address owned.
    ImmOrOwnedObject(ObjectRef),
    /// The version is resolved by the network; only the version it was first shared at travels.
    SharedObject {
        id: ObjectID,
        initial_shared_version: SequenceNumber,
        mutable: bool,
    },
    /// An object sent to another object, to be received in this transaction.
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectID {
        match self {
            ObjectArg::ImmOrOwnedObject((id, _, _))
            | ObjectArg::SharedObject { id, .. }
            | ObjectArg::Receiving((id, _, _)) => *id,
        }
    }
}

/// The types a pure argument may have, which are exactly those whose layout needs no on-chain
/// lookup.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum BasePureType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    /// `0x1::string::String`
    String,
    /// `0x2::object::ID`
    ID,
    Vector(Box<BasePureType>),
    /// `0x1::option::Option<T>`
    Option(Box<BasePureType>),
}

impl BasePureType {
    pub fn vector(inner: BasePureType) -> Self {
        BasePureType::Vector(Box::new(inner))
    }

    pub fn option(inner: BasePureType) -> Self {
        BasePureType::Option(Box::new(inner))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            BasePureType::Bool => TypeTag::Bool,
            BasePureType::U8 => TypeTag::U8,
            BasePureType::U16 => TypeTag::U16,
            BasePureType::U32 => TypeTag::U32,
            BasePureType::U64 => TypeTag::U64,
            BasePureType::U128 => TypeTag::U128,
            BasePureType::U256 => TypeTag::U256,
            BasePureType::Address => TypeTag::Address,
            BasePureType::String => TypeTag::string(),
            BasePureType::ID => TypeTag::object_id(),
            BasePureType::Vector(inner) => TypeTag::vector(inner.type_tag()),
            BasePureType::Option(inner) => TypeTag::option(inner.type_tag()),
        }
    }

    pub fn layout(&self) -> MoveTypeLayout {
        let single_field = |name, layout| {
            MoveTypeLayout::struct_(
                self.type_tag().struct_tag().cloned(),
                vec![MoveFieldLayout::new(name, layout)],
            )
        };
        match self {
            BasePureType::Bool => MoveTypeLayout::Bool,
            BasePureType::U8 => MoveTypeLayout::U8,
            BasePureType::U16 => MoveTypeLayout::U16,
            BasePureType::U32 => MoveTypeLayout::U32,
            BasePureType::U64 => MoveTypeLayout::U64,
            BasePureType::U128 => MoveTypeLayout::U128,
            BasePureType::U256 => MoveTypeLayout::U256,
            BasePureType::Address => MoveTypeLayout::Address,
            BasePureType::String => single_field(
                crate::ident!("bytes"),
                MoveTypeLayout::vector(MoveTypeLayout::U8),
            ),
            BasePureType::ID => single_field(crate::ident!("bytes"), MoveTypeLayout::Address),
            BasePureType::Vector(inner) => MoveTypeLayout::vector(inner.layout()),
            BasePureType::Option(inner) => single_field(
                crate::ident!("vec"),
                MoveTypeLayout::vector(inner.layout()),
            ),
        }
    }
}

impl TryFrom<&TypeTag> for BasePureType {
    type Error = SuiError;

    fn try_from(tag: &TypeTag) -> Result<Self, Self::Error> {
        Ok(match tag {
            TypeTag::Bool => BasePureType::Bool,
            TypeTag::U8 => BasePureType::U8,
            TypeTag::U16 => BasePureType::U16,
            TypeTag::U32 => BasePureType::U32,
            TypeTag::U64 => BasePureType::U64,
            TypeTag::U128 => BasePureType::U128,
            TypeTag::U256 => BasePureType::U256,
            TypeTag::Address => BasePureType::Address,
            TypeTag::Vector(inner) => BasePureType::vector((&**inner).try_into()?),
            TypeTag::Struct(s) if s.is_std_string() => BasePureType::String,
            TypeTag::Struct(s) if s.is_object_id() => BasePureType::ID,
            TypeTag::Struct(s) => match s.option_element() {
                Some(inner) => BasePureType::option(inner.try_into()?),
                None => {
                    return Err(SuiError::type_mismatch(format!(
                        "{s} cannot be passed as a pure argument"
                    )))
                }
            },
            TypeTag::Signer => {
                return Err(SuiError::type_mismatch(
                    "signer cannot be passed as a pure argument",
                ))
            }
        })
    }
}

/// A pure value together with the type it is encoded as.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct PureArg {
    pub value: MoveValue,
    pub type_: BasePureType,
}

impl PureArg {
    pub fn new(value: MoveValue, type_: BasePureType) -> Self {
        Self { value, type_ }
    }

    pub fn bool(v: bool) -> Self {
        Self::new(MoveValue::Bool(v), BasePureType::Bool)
    }

    pub fn u8(v: u8) -> Self {
        Self::new(MoveValue::U8(v), BasePureType::U8)
    }

    pub fn u16(v: u16) -> Self {
        Self::new(MoveValue::U16(v), BasePureType::U16)
    }

    pub fn u32(v: u32) -> Self {
        Self::new(MoveValue::U32(v), BasePureType::U32)
    }

    pub fn u64(v: u64) -> Self {
        Self::new(MoveValue::U64(v), BasePureType::U64)
    }

    pub fn u128(v: u128) -> Self {
        Self::new(MoveValue::U128(v), BasePureType::U128)
    }

    pub fn u256(v: U256) -> Self {
        Self::new(MoveValue::U256(v), BasePureType::U256)
    }

    pub fn address(v: SuiAddress) -> Self {
        Self::new(MoveValue::Address(v), BasePureType::Address)
    }

    pub fn string(v: &str) -> Self {
        Self::new(MoveValue::string(v), BasePureType::String)
    }

    pub fn id(v: ObjectID) -> Self {
        Self::new(
            MoveValue::Struct(vec![MoveValue::Address(v.into())]),
            BasePureType::ID,
        )
    }

    pub fn bytes(v: impl AsRef<[u8]>) -> Self {
        Self::new(
            MoveValue::vector_u8(v),
            BasePureType::vector(BasePureType::U8),
        )
    }

    /// `Option<T>` is a struct holding a vector of at most one element.
    pub fn option(inner: BasePureType, value: Option<MoveValue>) -> Self {
        let vec = value.into_iter().collect();
        Self::new(
            MoveValue::Struct(vec![MoveValue::Vector(vec)]),
            BasePureType::option(inner),
        )
    }

    /// Encodes the value, failing with `TypeMismatch` when it does not fit `type_`.
    pub fn encode(&self) -> SuiResult<Vec<u8>> {
        if let Err(e) = check_pure_shape(&self.value, &self.type_) {
            fp_bail!(SuiError::type_mismatch(e.to_string()));
        }
        codec::encode(&self.value, &self.type_.layout())
    }

    pub fn decode(bytes: &[u8], type_: BasePureType) -> SuiResult<Self> {
        let value = codec::decode(bytes, &type_.layout())?;
        match check_pure_shape(&value, &type_) {
            Ok(()) => Ok(Self { value, type_ }),
            Err(PureShapeError::OptionTooLong) => Err(SuiError::NonCanonicalEncoding {
                error: "option length prefix greater than 1".to_string(),
            }),
            Err(e @ PureShapeError::InvalidUtf8) => Err(SuiError::type_mismatch(e.to_string())),
        }
    }

    pub fn into_call_arg(&self) -> SuiResult<CallArg> {
        Ok(CallArg::Pure(self.encode()?))
    }
}

/// Constraints on a pure value that its layout alone cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PureShapeError {
    /// `Option<T>` travels as a vector, which must hold at most one element.
    OptionTooLong,
    /// `0x1::string::String` bytes must be UTF-8.
    InvalidUtf8,
}

impl Display for PureShapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PureShapeError::OptionTooLong => write!(f, "an option holds more than one value"),
            PureShapeError::InvalidUtf8 => write!(f, "string bytes are not valid UTF-8"),
        }
    }
}

/// Values that do not match the layout at all pass here and are rejected by the codec.
fn check_pure_shape(value: &MoveValue, type_: &BasePureType) -> Result<(), PureShapeError> {
    match (value, type_) {
        (MoveValue::Vector(elems), BasePureType::Vector(inner)) => {
            elems.iter().try_for_each(|e| check_pure_shape(e, inner))
        }
        (MoveValue::Struct(fields), BasePureType::Option(inner)) => match fields.as_slice() {
            [MoveValue::Vector(elems)] => {
                if elems.len() > 1 {
                    return Err(PureShapeError::OptionTooLong);
                }
                elems.iter().try_for_each(|e| check_pure_shape(e, inner))
            }
            _ => Ok(()),
        },
        (MoveValue::Struct(fields), BasePureType::String) => match fields.as_slice() {
            [MoveValue::Vector(elems)] => {
                let bytes = elems
                    .iter()
                    .map(|e| match e {
                        MoveValue::U8(b) => Some(*b),
                        _ => None,
                    })
                    .collect::<Option<Vec<u8>>>();
                match bytes {
                    Some(bytes) if std::str::from_utf8(&bytes).is_err() => {
                        Err(PureShapeError::InvalidUtf8)
                    }
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}

/// An argument to a programmable transaction command.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin. The gas coin can only be used by-ref, except for with `TransferObjects`,
    /// which can use it by-value.
    GasCoin,
    /// One of the input objects or primitive values (from `ProgrammableTransaction` inputs).
    Input(u16),
    /// The result of another command (from `ProgrammableTransaction` commands).
    Result(u16),
    /// Like a `Result` but used when the result is a tuple, from which a single value is used.
    NestedResult(u16, u16),
}

/// The command for calling a Move function, either an entry function or a public function.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: Identifier,
    pub function: Identifier,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

/// A single command in a programmable transaction. The variant order is the wire order.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// Sends the objects to the address. Takes `Vec<forall T: key + store. T>` and `address`.
    TransferObjects(Vec<Argument>, Argument),
    /// Splits off one coin per amount from the first argument.
    SplitCoins(Argument, Vec<Argument>),
    /// Merges the sources into the target coin. An empty source list leaves the target unchanged
    /// and is accepted.
    MergeCoins(Argument, Vec<Argument>),
    /// Publishes modules, returning the upgrade capability.
    Publish(Vec<Vec<u8>>, Vec<ObjectID>),
    /// Given a type and elements, builds a vector. The type may be omitted only when there is
    /// at least one element to infer it from.
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// Upgrades a package given its modules, dependencies, current id and upgrade ticket.
    Upgrade(Vec<Vec<u8>>, Vec<ObjectID>, ObjectID, Argument),
}

impl Command {
    pub fn move_call(
        package: ObjectID,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Self {
        Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        }))
    }

    /// Every argument this command consumes, in wire order.
    pub fn arguments(&self) -> Vec<&Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.iter().collect(),
            Command::TransferObjects(objects, recipient) => {
                objects.iter().chain(std::iter::once(recipient)).collect()
            }
            Command::SplitCoins(coin, amounts) => {
                std::iter::once(coin).chain(amounts.iter()).collect()
            }
            Command::MergeCoins(target, sources) => {
                std::iter::once(target).chain(sources.iter()).collect()
            }
            Command::Publish(_, _) => vec![],
            Command::MakeMoveVec(_, elements) => elements.iter().collect(),
            Command::Upgrade(_, _, _, ticket) => vec![ticket],
        }
    }

    pub fn type_arguments(&self) -> Vec<&TypeTag> {
        match self {
            Command::MoveCall(call) => call.type_arguments.iter().collect(),
            Command::MakeMoveVec(Some(ty), _) => vec![ty],
            _ => vec![],
        }
    }

    /// Number of values the command produces, or `None` when only the network knows
    /// (a Move call without a declared return count).
    pub fn output_arity(&self) -> Option<usize> {
        match self {
            Command::MoveCall(_) => None,
            Command::TransferObjects(_, _) | Command::MergeCoins(_, _) => Some(0),
            Command::SplitCoins(_, amounts) => Some(amounts.len()),
            Command::Publish(_, _) | Command::MakeMoveVec(_, _) | Command::Upgrade(_, _, _, _) => {
                Some(1)
            }
        }
    }

    /// Checks the command's own shape, independent of where it sits in a transaction.
    ///
    /// `MergeCoins` with no sources passes: merging nothing is a no-op on the target, and
    /// `merge_coins(target, vec![])` builds exactly that.
    pub fn validate_shape(&self) -> SuiResult {
        match self {
            Command::MakeMoveVec(None, elements) if elements.is_empty() => {
                Err(SuiError::type_mismatch(
                    "MakeMoveVec with no elements needs an explicit element type",
                ))
            }
            Command::TransferObjects(objects, _) if objects.is_empty() => {
                Err(SuiError::InvalidTransaction {
                    error: "TransferObjects needs at least one object".to_string(),
                })
            }
            Command::SplitCoins(_, amounts) if amounts.is_empty() => {
                Err(SuiError::InvalidTransaction {
                    error: "SplitCoins needs at least one amount".to_string(),
                })
            }
            Command::Publish(modules, _) | Command::Upgrade(modules, _, _, _)
                if modules.is_empty() =>
            {
                Err(SuiError::InvalidTransaction {
                    error: "publishing requires at least one module".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Checks that `argument`, used by the command at `position`, points at something that exists
/// and, for results, at an earlier command with enough outputs. `arity` reports the output count
/// of an earlier command (`None` meaning unknown).
pub(crate) fn check_argument(
    argument: &Argument,
    position: usize,
    num_inputs: usize,
    arity: impl Fn(usize) -> Option<usize>,
) -> SuiResult {
    let earlier = |idx: u16| -> SuiResult {
        fp_ensure!(
            (idx as usize) < position,
            SuiError::graph(format!(
                "command {position} references result of command {idx}, which is not earlier"
            ))
        );
        Ok(())
    };
    match *argument {
        Argument::GasCoin => Ok(()),
        Argument::Input(idx) => {
            fp_ensure!(
                (idx as usize) < num_inputs,
                SuiError::graph(format!(
                    "command {position} references input {idx} but only {num_inputs} exist"
                ))
            );
            Ok(())
        }
        Argument::Result(idx) => {
            earlier(idx)?;
            match arity(idx as usize) {
                Some(1) | None => Ok(()),
                Some(n) => Err(SuiError::graph(format!(
                    "Result({idx}) needs a command with exactly one output, command {idx} has {n}"
                ))),
            }
        }
        Argument::NestedResult(idx, sub) => {
            earlier(idx)?;
            match arity(idx as usize) {
                Some(n) if (sub as usize) >= n => Err(SuiError::graph(format!(
                    "NestedResult({idx}, {sub}) is out of range: command {idx} has {n} output(s)"
                ))),
                _ => Ok(()),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    /// Input objects or primitive values
    pub inputs: Vec<CallArg>,
    /// The commands to be executed sequentially. A failure in any command will
    /// result in the failure of the entire transaction.
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Re-checks the graph rules for a transaction that did not come out of the builder, such as
    /// one decoded from bytes. Move call output counts are not known here and are not checked.
    pub fn validate(&self) -> SuiResult {
        self.validate_with_limits(&ProtocolLimits::default())
    }

    pub fn validate_with_limits(&self, limits: &ProtocolLimits) -> SuiResult {
        fp_ensure!(
            self.commands.len() as u64 <= limits.max_programmable_tx_commands,
            SuiError::size_limit("max_programmable_tx_commands", self.commands.len())
        );
        let object_inputs = self.inputs.iter().filter(|i| i.object_id().is_some()).count();
        fp_ensure!(
            object_inputs as u64 <= limits.max_input_objects,
            SuiError::size_limit("max_input_objects", object_inputs)
        );
        if let Some(id) = self
            .inputs
            .iter()
            .filter_map(CallArg::object_id)
            .duplicates()
            .next()
        {
            return Err(SuiError::ObjectArgMismatch {
                object_id: id.to_string(),
                error: "object appears more than once in the inputs".to_string(),
            });
        }
        for input in &self.inputs {
            if let CallArg::Pure(bytes) = input {
                fp_ensure!(
                    bytes.len() as u64 <= limits.max_pure_argument_size,
                    SuiError::size_limit("max_pure_argument_size", bytes.len())
                );
            }
        }
        for (position, command) in self.commands.iter().enumerate() {
            command.validate_shape()?;
            check_command_limits(command, limits)?;
            for argument in command.arguments() {
                check_argument(argument, position, self.inputs.len(), |i| {
                    self.commands[i].output_arity()
                })?;
            }
        }
        Ok(())
    }

    pub fn input_objects(&self) -> impl Iterator<Item = &ObjectArg> {
        self.inputs.iter().filter_map(|arg| match arg {
            CallArg::Object(o) => Some(o),
            CallArg::Pure(_) => None,
        })
    }

    pub fn shared_input_objects(&self) -> impl Iterator<Item = SharedInputObject> + '_ {
        self.input_objects().filter_map(|o| match *o {
            ObjectArg::SharedObject {
                id,
                initial_shared_version,
                mutable,
            } => Some(SharedInputObject {
                id,
                initial_shared_version,
                mutable,
            }),
            _ => None,
        })
    }

    pub fn move_calls(&self) -> Vec<(&ObjectID, &str, &str)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::MoveCall(m) => {
                    Some((&m.package, m.module.as_str(), m.function.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

pub(crate) fn check_command_limits(command: &Command, limits: &ProtocolLimits) -> SuiResult {
    let num_args = command.arguments().len();
    fp_ensure!(
        num_args as u64 <= limits.max_arguments,
        SuiError::size_limit("max_arguments", num_args)
    );
    let type_args = command.type_arguments();
    fp_ensure!(
        type_args.len() as u64 <= limits.max_type_arguments,
        SuiError::size_limit("max_type_arguments", type_args.len())
    );
    for ty in type_args {
        fp_ensure!(
            ty.depth() as u64 <= limits.max_type_argument_depth,
            SuiError::size_limit("max_type_argument_depth", ty.depth())
        );
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SharedInputObject {
    pub id: ObjectID,
    pub initial_shared_version: SequenceNumber,
    pub mutable: bool,
}

fn write_sep<T: Display>(
    f: &mut Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    let mut xs = items.into_iter();
    let Some(x) = xs.next() else {
        return Ok(());
    };
    write!(f, "{x}")?;
    for x in xs {
        write!(f, "{sep}{x}")?;
    }
    Ok(())
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Argument::GasCoin => write!(f, "GasCoin"),
            Argument::Input(i) => write!(f, "Input({i})"),
            Argument::Result(i) => write!(f, "Result({i})"),
            Argument::NestedResult(i, j) => write!(f, "NestedResult({i},{j})"),
        }
    }
}

impl Display for ProgrammableMoveCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ProgrammableMoveCall {
            package,
            module,
            function,
            type_arguments,
            arguments,
        } = self;
        write!(f, "{package}::{module}::{function}")?;
        if !type_arguments.is_empty() {
            write!(f, "<")?;
            write_sep(f, type_arguments, ",")?;
            write!(f, ">")?;
        }
        write!(f, "(")?;
        write_sep(f, arguments, ",")?;
        write!(f, ")")
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::MoveCall(p) => write!(f, "MoveCall({p})"),
            Command::MakeMoveVec(ty_opt, elems) => {
                write!(f, "MakeMoveVec(")?;
                match ty_opt {
                    Some(ty) => write!(f, "Some({ty})")?,
                    None => write!(f, "None")?,
                }
                write!(f, ",[")?;
                write_sep(f, elems, ",")?;
                write!(f, "])")
            }
            Command::TransferObjects(objs, addr) => {
                write!(f, "TransferObjects([")?;
                write_sep(f, objs, ",")?;
                write!(f, "],{addr})")
            }
            Command::SplitCoins(coin, amounts) => {
                write!(f, "SplitCoins({coin},[")?;
                write_sep(f, amounts, ",")?;
                write!(f, "])")
            }
            Command::MergeCoins(target, coins) => {
                write!(f, "MergeCoins({target},[")?;
                write_sep(f, coins, ",")?;
                write!(f, "])")
            }
            Command::Publish(modules, deps) => {
                write!(f, "Publish({} module(s),[", modules.len())?;
                write_sep(f, deps, ",")?;
                write!(f, "])")
            }
            Command::Upgrade(modules, deps, package, ticket) => {
                write!(f, "Upgrade({} module(s),[", modules.len())?;
                write_sep(f, deps, ",")?;
                write!(f, "],{package},{ticket})")
            }
        }
    }
}

impl Display for ProgrammableTransaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ProgrammableTransaction { inputs, commands } = self;
        writeln!(f, "Inputs: {inputs:?}")?;
        writeln!(f, "Commands: [")?;
        for c in commands {
            writeln!(f, "  {c},")?;
        }
        writeln!(f, "]")
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A transaction that allows the interleaving of Move calls and native commands.
    ProgrammableTransaction(ProgrammableTransaction),
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut writer = String::new();
        match &self {
            Self::ProgrammableTransaction(p) => {
                writeln!(writer, "Transaction Kind : Programmable")?;
                write!(writer, "{p}")?;
            }
        }
        write!(f, "{}", writer)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum TransactionExpiration {
    /// The transaction has no expiration
    None,
    /// Validators won't sign a transaction unless the expiration epoch is greater than or equal
    /// to the current epoch
    Epoch(EpochId),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

impl TransactionData {
    pub fn new_with_gas_data(kind: TransactionKind, sender: SuiAddress, gas_data: GasData) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind,
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        })
    }

    pub fn new(
        kind: TransactionKind,
        sender: SuiAddress,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new_with_gas_coins(kind, sender, vec![gas_payment], gas_budget, gas_price)
    }

    pub fn new_with_gas_coins(
        kind: TransactionKind,
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new_with_gas_coins_allow_sponsor(
            kind,
            sender,
            gas_payment,
            gas_budget,
            gas_price,
            sender,
        )
    }

    pub fn new_with_gas_coins_allow_sponsor(
        kind: TransactionKind,
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        gas_budget: u64,
        gas_price: u64,
        gas_sponsor: SuiAddress,
    ) -> Self {
        Self::new_with_gas_data(
            kind,
            sender,
            GasData {
                payment: gas_payment,
                owner: gas_sponsor,
                price: gas_price,
                budget: gas_budget,
            },
        )
    }

    pub fn new_programmable(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new_programmable_allow_sponsor(sender, gas_payment, pt, gas_budget, gas_price, sender)
    }

    pub fn new_programmable_allow_sponsor(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
        sponsor: SuiAddress,
    ) -> Self {
        let kind = TransactionKind::ProgrammableTransaction(pt);
        Self::new_with_gas_coins_allow_sponsor(
            kind,
            sender,
            gas_payment,
            gas_budget,
            gas_price,
            sponsor,
        )
    }

    pub fn new_transfer(
        recipient: SuiAddress,
        object_ref: ObjectRef,
        sender: SuiAddress,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> SuiResult<Self> {
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.transfer_object(recipient, object_ref)?;
        Ok(Self::new_programmable(
            sender,
            vec![gas_payment],
            builder.finish(),
            gas_budget,
            gas_price,
        ))
    }

    pub fn new_transfer_sui(
        recipient: SuiAddress,
        sender: SuiAddress,
        amount: Option<u64>,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> SuiResult<Self> {
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.transfer_sui(recipient, amount)?;
        Ok(Self::new_programmable(
            sender,
            vec![gas_payment],
            builder.finish(),
            gas_budget,
            gas_price,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_move_call(
        sender: SuiAddress,
        package: ObjectID,
        module: Identifier,
        function: Identifier,
        type_arguments: Vec<TypeTag>,
        gas_payment: ObjectRef,
        arguments: Vec<CallArg>,
        gas_budget: u64,
        gas_price: u64,
    ) -> SuiResult<Self> {
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.move_call(package, module, function, type_arguments, arguments)?;
        Ok(Self::new_programmable(
            sender,
            vec![gas_payment],
            builder.finish(),
            gas_budget,
            gas_price,
        ))
    }

    pub fn new_pay_sui(
        sender: SuiAddress,
        mut coins: Vec<ObjectRef>,
        recipients: Vec<SuiAddress>,
        amounts: Vec<u64>,
        gas_payment: ObjectRef,
        gas_budget: u64,
        gas_price: u64,
    ) -> SuiResult<Self> {
        coins.insert(0, gas_payment);
        let mut builder = ProgrammableTransactionBuilder::new();
        builder.pay_sui(recipients, amounts)?;
        Ok(Self::new_programmable(
            sender,
            coins,
            builder.finish(),
            gas_budget,
            gas_price,
        ))
    }

    pub fn new_module(
        sender: SuiAddress,
        gas_payment: ObjectRef,
        modules: Vec<Vec<u8>>,
        dep_ids: Vec<ObjectID>,
        gas_budget: u64,
        gas_price: u64,
    ) -> SuiResult<Self> {
        let mut builder = ProgrammableTransactionBuilder::new();
        let upgrade_cap = builder.publish_upgradeable(modules, dep_ids)?;
        builder.transfer_arg(sender, upgrade_cap)?;
        Ok(Self::new_programmable(
            sender,
            vec![gas_payment],
            builder.finish(),
            gas_budget,
            gas_price,
        ))
    }

    fn v1(&self) -> &TransactionDataV1 {
        match self {
            TransactionData::V1(v1) => v1,
        }
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.v1().kind
    }

    pub fn sender(&self) -> SuiAddress {
        self.v1().sender
    }

    pub fn gas_data(&self) -> &GasData {
        &self.v1().gas_data
    }

    pub fn gas(&self) -> &[ObjectRef] {
        &self.gas_data().payment
    }

    pub fn gas_owner(&self) -> SuiAddress {
        self.gas_data().owner
    }

    pub fn gas_price(&self) -> u64 {
        self.gas_data().price
    }

    pub fn gas_budget(&self) -> u64 {
        self.gas_data().budget
    }

    pub fn expiration(&self) -> &TransactionExpiration {
        &self.v1().expiration
    }

    pub fn with_expiration(mut self, expiration: TransactionExpiration) -> Self {
        match &mut self {
            TransactionData::V1(v1) => v1.expiration = expiration,
        }
        self
    }

    pub fn is_sponsored_tx(&self) -> bool {
        self.gas_owner() != self.sender()
    }

    pub fn programmable_transaction(&self) -> &ProgrammableTransaction {
        match self.kind() {
            TransactionKind::ProgrammableTransaction(pt) => pt,
        }
    }

    pub fn to_bytes(&self) -> SuiResult<Vec<u8>> {
        codec::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        codec::from_bytes(bytes)
    }

    pub fn digest(&self) -> SuiResult<TransactionDigest> {
        Ok(TransactionDigest::from_transaction_bytes(&self.to_bytes()?))
    }

    /// Checks the limits the network applies before execution.
    pub fn validate_size(&self, limits: &ProtocolLimits) -> SuiResult {
        let size = self.to_bytes()?.len();
        fp_ensure!(
            size as u64 <= limits.max_tx_size_bytes,
            SuiError::size_limit("max_tx_size_bytes", size)
        );
        fp_ensure!(
            !self.gas().is_empty(),
            SuiError::InvalidTransaction {
                error: "no gas payment objects".to_string(),
            }
        );
        fp_ensure!(
            self.gas().len() as u64 <= limits.max_gas_payment_objects,
            SuiError::size_limit("max_gas_payment_objects", self.gas().len())
        );
        self.programmable_transaction().validate_with_limits(limits)
    }
}

/// Transaction data with the signatures that authorize it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub intent_message: IntentMessage<TransactionData>,
    pub tx_signatures: Vec<GenericSignature>,
}

impl Transaction {
    pub fn from_data(data: TransactionData, tx_signatures: Vec<GenericSignature>) -> Self {
        Self {
            intent_message: IntentMessage::new(Intent::sui_transaction(), data),
            tx_signatures,
        }
    }

    /// Signs the data once per signer, in order. A sponsored transaction needs both the sender
    /// and the sponsor.
    pub fn from_data_and_signer(
        data: TransactionData,
        signers: Vec<&dyn SuiSigner>,
    ) -> SuiResult<Self> {
        let intent_message = IntentMessage::new(Intent::sui_transaction(), data);
        let tx_signatures = signers
            .into_iter()
            .map(|signer| {
                Signature::new_secure(&intent_message, signer).map(GenericSignature::Signature)
            })
            .collect::<SuiResult<Vec<_>>>()?;
        debug!(
            num_signatures = tx_signatures.len(),
            "signed transaction data"
        );
        Ok(Self {
            intent_message,
            tx_signatures,
        })
    }

    pub fn from_generic_sig_data(
        data: TransactionData,
        signatures: Vec<GenericSignature>,
    ) -> Self {
        Self::from_data(data, signatures)
    }

    pub fn data(&self) -> &TransactionData {
        &self.intent_message.value
    }

    pub fn digest(&self) -> SuiResult<TransactionDigest> {
        self.data().digest()
    }

    /// Base64 transaction bytes and Base64 signatures, ready for submission.
    pub fn to_tx_bytes_and_signatures(&self) -> SuiResult<(String, Vec<String>)> {
        let tx_bytes = BASE64_STANDARD.encode(self.data().to_bytes()?);
        let signatures = self
            .tx_signatures
            .iter()
            .map(GenericSignature::encode_base64)
            .collect::<SuiResult<Vec<_>>>()?;
        Ok((tx_bytes, signatures))
    }

    /// Checks data limits and the signer count of every multisig.
    pub fn validate(&self, limits: &ProtocolLimits) -> SuiResult {
        self.data().validate_size(limits)?;
        fp_ensure!(
            !self.tx_signatures.is_empty(),
            SuiError::InvalidSignature {
                error: "transaction carries no signatures".to_string(),
            }
        );
        for sig in &self.tx_signatures {
            if let GenericSignature::MultiSig(multisig) = sig {
                let signers = multisig.get_pk().pubkeys().len();
                fp_ensure!(
                    signers as u64 <= limits.max_signers_in_multisig,
                    SuiError::size_limit("max_signers_in_multisig", signers)
                );
            }
        }
        Ok(())
    }
}
