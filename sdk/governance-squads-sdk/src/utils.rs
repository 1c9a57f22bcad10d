use crate::core::constants::NATIVE_TREASURY_SEED;
use crate::error::{Result, SquadsSdkError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

//=============================================================================
// Address Helpers
//=============================================================================

/// True when `value` is a base58 string decoding to exactly 32 bytes
pub fn is_valid_address(value: &str) -> bool {
    parse_address(value).is_ok()
}

pub fn parse_address(value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|_| SquadsSdkError::InvalidAddress(value.to_string()))
}

/// Derive the native treasury PDA of a governance
pub fn derive_native_treasury(governance_program_id: &Pubkey, governance: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[NATIVE_TREASURY_SEED, governance.as_ref()],
        governance_program_id,
    )
}

//=============================================================================
// Governance Instruction Envelope
//=============================================================================

/// Account meta as stored in a governance proposal transaction
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
struct AccountMetaData {
    pubkey: [u8; 32],
    is_signer: bool,
    is_writable: bool,
}

/// Instruction as stored in a governance proposal transaction
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
struct InstructionData {
    program_id: [u8; 32],
    accounts: Vec<AccountMetaData>,
    data: Vec<u8>,
}

impl From<&Instruction> for InstructionData {
    fn from(ix: &Instruction) -> Self {
        Self {
            program_id: ix.program_id.to_bytes(),
            accounts: ix
                .accounts
                .iter()
                .map(|meta| AccountMetaData {
                    pubkey: meta.pubkey.to_bytes(),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: ix.data.clone(),
        }
    }
}

impl From<InstructionData> for Instruction {
    fn from(data: InstructionData) -> Self {
        Instruction {
            program_id: Pubkey::new_from_array(data.program_id),
            accounts: data
                .accounts
                .into_iter()
                .map(|meta| AccountMeta {
                    pubkey: Pubkey::new_from_array(meta.pubkey),
                    is_signer: meta.is_signer,
                    is_writable: meta.is_writable,
                })
                .collect(),
            data: data.data,
        }
    }
}

/// Encode an instruction the way governance proposals store it:
/// base64 of the borsh `InstructionData`.
pub fn serialize_instruction_to_base64(ix: &Instruction) -> Result<String> {
    let bytes = borsh::to_vec(&InstructionData::from(ix))?;
    Ok(STANDARD.encode(bytes))
}

pub fn deserialize_instruction_from_base64(encoded: &str) -> Result<Instruction> {
    let bytes = STANDARD.decode(encoded)?;
    let data = InstructionData::try_from_slice(&bytes)?;
    Ok(data.into())
}

//=============================================================================
// Serde Helpers
//=============================================================================

/// Serialize a `Pubkey` as its base58 string
pub(crate) mod pubkey_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let value = String::deserialize(deserializer)?;
        Pubkey::from_str(&value).map_err(|e| D::Error::custom(format!("{value}: {e}")))
    }
}
