// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! On-chain type descriptors.
//!
//! Type tags are compared structurally. Nothing here resolves names against on-chain packages;
//! a tag naming a struct that does not exist is still a well-formed tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::base_types::SuiAddress;
use crate::error::{SuiError, SuiResult};
use crate::{MOVE_STDLIB_ADDRESS, SUI_FRAMEWORK_ADDRESS};

#[cfg(test)]
#[path = "unit_tests/type_tag_tests.rs"]
mod type_tag_tests;

/// Nesting bound for parsed type strings, matching the protocol's type argument depth.
pub const MAX_TYPE_TAG_NESTING: usize = 16;

/// A Move identifier: `[a-zA-Z][a-zA-Z0-9_]*` or `_[a-zA-Z0-9_]+`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(Box<str>);

impl Identifier {
    pub fn new(s: impl Into<Box<str>>) -> SuiResult<Self> {
        let s = s.into();
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(SuiError::InvalidIdentifier(s.into()))
        }
    }

    pub fn is_valid(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => chars.all(is_identifier_char),
            Some('_') => {
                let rest = chars.as_str();
                !rest.is_empty() && rest.chars().all(is_identifier_char)
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl TryFrom<String> for Identifier {
    type Error = SuiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0.into()
    }
}

impl FromStr for Identifier {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::new(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds an `Identifier` from a literal known to be valid.
#[macro_export]
macro_rules! ident {
    ($s:literal) => {
        $crate::type_tag::Identifier::new($s).expect("literal identifier is valid")
    };
}

/// The variant order is the BCS discriminant order and must never change.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    #[serde(rename = "bool", alias = "Bool")]
    Bool,
    #[serde(rename = "u8", alias = "U8")]
    U8,
    #[serde(rename = "u64", alias = "U64")]
    U64,
    #[serde(rename = "u128", alias = "U128")]
    U128,
    #[serde(rename = "address", alias = "Address")]
    Address,
    /// Only present so that the wire discriminants line up; never used for call arguments.
    #[serde(rename = "signer", alias = "Signer")]
    Signer,
    #[serde(rename = "vector", alias = "Vector")]
    Vector(Box<TypeTag>),
    #[serde(rename = "struct", alias = "Struct")]
    Struct(Box<StructTag>),
    #[serde(rename = "u16", alias = "U16")]
    U16,
    #[serde(rename = "u32", alias = "U32")]
    U32,
    #[serde(rename = "u256", alias = "U256")]
    U256,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: Identifier,
    pub name: Identifier,
    #[serde(rename = "type_args", alias = "type_params")]
    pub type_params: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: SuiAddress,
        module: Identifier,
        name: Identifier,
        type_params: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_params,
        }
    }

    /// `0x2::coin::Coin<0x2::sui::SUI>`
    pub fn sui_coin() -> Self {
        Self::new(
            SUI_FRAMEWORK_ADDRESS,
            ident!("coin"),
            ident!("Coin"),
            vec![TypeTag::Struct(Box::new(Self::sui()))],
        )
    }

    /// `0x2::sui::SUI`
    pub fn sui() -> Self {
        Self::new(SUI_FRAMEWORK_ADDRESS, ident!("sui"), ident!("SUI"), vec![])
    }

    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        &self.address == address && self.module.as_str() == module && self.name.as_str() == name
    }

    pub fn is_std_string(&self) -> bool {
        self.type_params.is_empty() && self.is(&MOVE_STDLIB_ADDRESS, "string", "String")
    }

    pub fn is_ascii_string(&self) -> bool {
        self.type_params.is_empty() && self.is(&MOVE_STDLIB_ADDRESS, "ascii", "String")
    }

    pub fn is_object_id(&self) -> bool {
        self.type_params.is_empty() && self.is(&SUI_FRAMEWORK_ADDRESS, "object", "ID")
    }

    /// The element type of `0x1::option::Option<T>`.
    pub fn option_element(&self) -> Option<&TypeTag> {
        match self.type_params.as_slice() {
            [inner] if self.is(&MOVE_STDLIB_ADDRESS, "option", "Option") => Some(inner),
            _ => None,
        }
    }
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    /// `0x1::string::String`
    pub fn string() -> Self {
        TypeTag::Struct(Box::new(StructTag::new(
            MOVE_STDLIB_ADDRESS,
            ident!("string"),
            ident!("String"),
            vec![],
        )))
    }

    /// `0x1::option::Option<inner>`
    pub fn option(inner: TypeTag) -> Self {
        TypeTag::Struct(Box::new(StructTag::new(
            MOVE_STDLIB_ADDRESS,
            ident!("option"),
            ident!("Option"),
            vec![inner],
        )))
    }

    /// `0x2::object::ID`
    pub fn object_id() -> Self {
        TypeTag::Struct(Box::new(StructTag::new(
            SUI_FRAMEWORK_ADDRESS,
            ident!("object"),
            ident!("ID"),
            vec![],
        )))
    }

    pub fn struct_tag(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Depth of the deepest nested type, counting this one as 1.
    pub fn depth(&self) -> usize {
        match self {
            TypeTag::Vector(inner) => 1 + inner.depth(),
            TypeTag::Struct(s) => 1 + s.type_params.iter().map(TypeTag::depth).max().unwrap_or(0),
            _ => 1,
        }
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for ty in rest {
                write!(f, ", {ty}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{inner}>"),
            TypeTag::Struct(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeTagParser::new(s)?;
        let tag = parser.parse_type_tag(0)?;
        parser.expect_end()?;
        Ok(tag)
    }
}

impl FromStr for StructTag {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TypeTag::from_str(s)? {
            TypeTag::Struct(s) => Ok(*s),
            other => Err(parse_error(format!("expected a struct type, found {other}"))),
        }
    }
}

fn parse_error(error: String) -> SuiError {
    SuiError::parse("type tag", error)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Address(String),
    ColonColon,
    Lt,
    Gt,
    Comma,
}

/// Recursive-descent parser over a pre-tokenized type string.
struct TypeTagParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl TypeTagParser {
    fn new(s: &str) -> SuiResult<Self> {
        Ok(Self {
            tokens: tokenize(s)?,
            pos: 0,
        })
    }

    fn next(&mut self) -> SuiResult<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| parse_error("unexpected end of input".to_string()))?;
        self.pos += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn expect(&mut self, expected: Token) -> SuiResult<()> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(parse_error(format!("expected {expected:?}, found {token:?}")))
        }
    }

    fn expect_end(&self) -> SuiResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(parse_error(format!("unexpected trailing {token:?}"))),
        }
    }

    fn parse_type_tag(&mut self, depth: usize) -> SuiResult<TypeTag> {
        if depth >= MAX_TYPE_TAG_NESTING {
            return Err(parse_error(format!(
                "type nesting exceeds {MAX_TYPE_TAG_NESTING}"
            )));
        }
        match self.next()? {
            Token::Name(name) => match name.as_str() {
                "bool" => Ok(TypeTag::Bool),
                "u8" => Ok(TypeTag::U8),
                "u16" => Ok(TypeTag::U16),
                "u32" => Ok(TypeTag::U32),
                "u64" => Ok(TypeTag::U64),
                "u128" => Ok(TypeTag::U128),
                "u256" => Ok(TypeTag::U256),
                "address" => Ok(TypeTag::Address),
                "signer" => Ok(TypeTag::Signer),
                "vector" => {
                    self.expect(Token::Lt)?;
                    let inner = self.parse_type_tag(depth + 1)?;
                    self.expect(Token::Gt)?;
                    Ok(TypeTag::vector(inner))
                }
                "std" => self.parse_struct_tail(MOVE_STDLIB_ADDRESS, depth),
                "sui" => self.parse_struct_tail(SUI_FRAMEWORK_ADDRESS, depth),
                other => Err(parse_error(format!("unknown type {other:?}"))),
            },
            Token::Address(literal) => {
                let address = SuiAddress::from_str(&literal)?;
                self.parse_struct_tail(address, depth)
            }
            token => Err(parse_error(format!("unexpected {token:?}"))),
        }
    }

    fn parse_struct_tail(&mut self, address: SuiAddress, depth: usize) -> SuiResult<TypeTag> {
        self.expect(Token::ColonColon)?;
        let module = self.parse_identifier()?;
        self.expect(Token::ColonColon)?;
        let name = self.parse_identifier()?;
        let mut type_params = vec![];
        if self.peek() == Some(&Token::Lt) {
            self.pos += 1;
            loop {
                type_params.push(self.parse_type_tag(depth + 1)?);
                match self.next()? {
                    Token::Comma => continue,
                    Token::Gt => break,
                    token => {
                        return Err(parse_error(format!("expected ',' or '>', found {token:?}")))
                    }
                }
            }
        }
        Ok(TypeTag::Struct(Box::new(StructTag::new(
            address,
            module,
            name,
            type_params,
        ))))
    }

    fn parse_identifier(&mut self) -> SuiResult<Identifier> {
        match self.next()? {
            Token::Name(name) => Identifier::new(name),
            token => Err(parse_error(format!("expected identifier, found {token:?}"))),
        }
    }
}

fn tokenize(s: &str) -> SuiResult<Vec<Token>> {
    let mut tokens = vec![];
    let mut chars = s.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '<' => {
                chars.next();
                tokens.push(Token::Lt);
            }
            '>' => {
                chars.next();
                tokens.push(Token::Gt);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            ':' => {
                chars.next();
                if chars.next() != Some(':') {
                    return Err(parse_error("expected '::'".to_string()));
                }
                tokens.push(Token::ColonColon);
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if !literal.starts_with("0x") {
                    return Err(parse_error(format!(
                        "address literal {literal:?} must start with 0x"
                    )));
                }
                tokens.push(Token::Address(literal));
            }
            c if is_identifier_char(c) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if is_identifier_char(c) {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(name));
            }
            other => return Err(parse_error(format!("unexpected character {other:?}"))),
        }
    }
    Ok(tokens)
}
