pub mod advanced;
pub mod basic;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::basic::form::{AddMemberForm, AddMemberFormBuilder, GovernedAccountSource};
pub use crate::basic::registry::{
    InstructionRegistry, InstructionSource, ProposalInstructions, RegisteredInstruction,
};
pub use crate::basic::resolver::{DomainResolver, SnsResolver};
pub use crate::core::config::FormConfig;
pub use crate::core::connection::SolConnection;
pub use crate::core::wallet::{StaticWallet, WalletProvider};
pub use crate::error::{Result, SquadsSdkError};
pub use crate::types::{
    FormField, FormState, GovernanceRef, GovernedAccount, InvalidReason, Member, Permissions,
    UiInstruction,
};
pub use crate::utils::{
    deserialize_instruction_from_base64, is_valid_address, parse_address,
    serialize_instruction_to_base64,
};
