use crate::core::constants::FULL_PERMISSIONS_MASK;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Governance identity of a governed account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRef {
    /// Governance account, the authority instructions execute under
    #[serde(with = "crate::utils::pubkey_string")]
    pub pubkey: Pubkey,

    /// Native treasury PDA owned by the governance, pays rent
    #[serde(with = "crate::utils::pubkey_string")]
    pub native_treasury_address: Pubkey,
}

impl GovernanceRef {
    pub fn new(pubkey: Pubkey, native_treasury_address: Pubkey) -> Self {
        Self {
            pubkey,
            native_treasury_address,
        }
    }

    /// Build the reference for a governance, deriving its native treasury
    pub fn derive(governance_program_id: &Pubkey, governance: Pubkey) -> Self {
        let (native_treasury_address, _) =
            crate::utils::derive_native_treasury(governance_program_id, &governance);
        Self::new(governance, native_treasury_address)
    }
}

/// An asset selectable as the account an instruction executes for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernedAccount {
    pub pubkey: Pubkey,

    /// None when the account has no resolvable governance on-chain
    pub governance: Option<GovernanceRef>,
}

impl GovernedAccount {
    pub fn new(pubkey: Pubkey, governance: Option<GovernanceRef>) -> Self {
        Self { pubkey, governance }
    }
}

/// Names of the inputs of the add-member form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    GovernedAccount,
    Vault,
    Member,
}

impl FormField {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::GovernedAccount => "governedAccount",
            FormField::Vault => "vault",
            FormField::Member => "member",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current values of the add-member form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub governed_account: Option<GovernedAccount>,

    /// Squads multisig address, as typed
    pub vault: String,

    /// Member wallet address or domain name, as typed
    pub member: String,
}

/// Why `get_instruction` produced nothing to submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvalidReason {
    /// At least one field failed validation
    Validation,
    /// The selected governed account has no governance identity
    MissingGovernance,
    /// No wallet is connected
    WalletNotConnected,
    /// The built instruction could not be serialized
    Serialization,
    /// The form was dropped before the coordinator asked for its instruction
    FormDropped,
}

/// Instruction handed to the proposal coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiInstruction {
    /// Base64 governance `InstructionData`, empty when invalid
    pub serialized_instruction: String,

    pub is_valid: bool,

    pub governance: Option<GovernanceRef>,

    /// How many instructions of this kind share one transaction
    pub chunk_by: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<InvalidReason>,
}

impl UiInstruction {
    pub fn valid(serialized_instruction: String, governance: GovernanceRef, chunk_by: u32) -> Self {
        Self {
            serialized_instruction,
            is_valid: true,
            governance: Some(governance),
            chunk_by,
            invalid_reason: None,
        }
    }

    pub fn invalid(
        governance: Option<GovernanceRef>,
        chunk_by: u32,
        reason: InvalidReason,
    ) -> Self {
        Self {
            serialized_instruction: String::new(),
            is_valid: false,
            governance,
            chunk_by,
            invalid_reason: Some(reason),
        }
    }
}

/// Squads member permission bitmask
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub mask: u8,
}

impl Permissions {
    pub const INITIATE: u8 = 1 << 0;
    pub const VOTE: u8 = 1 << 1;
    pub const EXECUTE: u8 = 1 << 2;

    pub fn all() -> Self {
        Self {
            mask: FULL_PERMISSIONS_MASK,
        }
    }

    pub fn has(&self, permission: u8) -> bool {
        self.mask & permission == permission
    }
}

/// Squads multisig member as laid out on-chain
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub key: [u8; 32],
    pub permissions: Permissions,
}

impl Member {
    pub fn new(key: Pubkey, permissions: Permissions) -> Self {
        Self {
            key: key.to_bytes(),
            permissions,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_permissions_cover_every_bit() {
        let permissions = Permissions::all();
        assert_eq!(permissions.mask, 7);
        assert!(permissions.has(Permissions::INITIATE));
        assert!(permissions.has(Permissions::VOTE));
        assert!(permissions.has(Permissions::EXECUTE));
    }

    #[test]
    fn invalid_instruction_serializes_camel_case() {
        let ix = UiInstruction::invalid(None, 1, InvalidReason::WalletNotConnected);
        let json = serde_json::to_value(&ix).unwrap();
        assert_eq!(json["serializedInstruction"], "");
        assert_eq!(json["isValid"], false);
        assert_eq!(json["chunkBy"], 1);
        assert_eq!(json["invalidReason"], "walletNotConnected");
    }
}
