//! Minimal Solidity ABI support for the lending contract.
//!
//! Every argument and return value the dashboards exchange with the contract
//! is a static 32-byte word (`uint256` or `address`), so calldata is just the
//! 4-byte selector followed by one word per argument.

use alloy_primitives::{Address, Bytes, U256, keccak256};
use anyhow::{Result, bail};

use crate::error::{ContractError, ContractResult};

pub const WORD: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Uint256,
    Address,
}

impl ParamKind {
    pub fn solidity_name(self) -> &'static str {
        match self {
            ParamKind::Uint256 => "uint256",
            ParamKind::Address => "address",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    Address(Address),
}

impl Token {
    fn word(&self) -> [u8; WORD] {
        match self {
            Token::Uint(value) => value.to_be_bytes::<WORD>(),
            Token::Address(address) => {
                let mut word = [0u8; WORD];
                word[WORD - 20..].copy_from_slice(address.as_slice());
                word
            }
        }
    }
}

/// First four bytes of keccak-256 over the canonical signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

pub fn encode_call(signature: &str, args: &[Token]) -> Bytes {
    let mut data = Vec::with_capacity(4 + WORD * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&arg.word());
    }
    Bytes::from(data)
}

/// Split return data into its leading `count` words. Trailing words are
/// ignored so a struct getter may grow fields without breaking the decoder.
pub fn decode_words(data: &[u8], count: usize) -> ContractResult<Vec<U256>> {
    if data.len() < count * WORD {
        return Err(ContractError::Decode(format!(
            "expected {} words, got {} bytes",
            count,
            data.len()
        )));
    }

    Ok(data
        .chunks_exact(WORD)
        .take(count)
        .map(U256::from_be_slice)
        .collect())
}

/// Check that `signature` is canonical (`name(type,type)`, no whitespace) and
/// that its parameter list matches `expected`.
pub fn check_signature(signature: &str, expected: &[ParamKind]) -> Result<()> {
    let Some((name, rest)) = signature.split_once('(') else {
        bail!("`{signature}` is missing a parameter list");
    };
    let Some(params) = rest.strip_suffix(')') else {
        bail!("`{signature}` must end with `)`");
    };

    if name.is_empty()
        || name.starts_with(|c: char| c.is_ascii_digit())
        || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        bail!("`{signature}` has an invalid function name");
    }

    let found: Vec<&str> = if params.is_empty() {
        Vec::new()
    } else {
        params.split(',').collect()
    };

    let wanted: Vec<&str> = expected.iter().map(|kind| kind.solidity_name()).collect();
    if found != wanted {
        bail!(
            "`{signature}` takes ({}), expected ({})",
            found.join(","),
            wanted.join(",")
        );
    }

    Ok(())
}
