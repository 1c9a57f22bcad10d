use crate::core::constants::MULTISIG_ADD_MEMBER_DISCRIMINATOR;
use crate::error::Result;
use crate::types::Member;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

/// Arguments of the Squads V4 `multisig_add_member` instruction
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct MultisigAddMemberArgs {
    pub new_member: Member,
    pub memo: Option<String>,
}

/// Add a member to a Squads V4 multisig, signed by its config authority.
///
/// Accounts:
/// 0. `[writable]` Multisig
/// 1. `[signer]` Config authority
/// 2. `[writable, signer]` Rent payer (program id placeholder when absent)
/// 3. `[]` System program
pub fn multisig_add_member(
    program_id: &Pubkey,
    multisig: &Pubkey,
    config_authority: &Pubkey,
    rent_payer: Option<&Pubkey>,
    new_member: Member,
    memo: Option<String>,
) -> Result<Instruction> {
    let args = MultisigAddMemberArgs { new_member, memo };

    let mut data = MULTISIG_ADD_MEMBER_DISCRIMINATOR.to_vec();
    data.extend(borsh::to_vec(&args)?);

    let rent_payer_meta = match rent_payer {
        Some(payer) => AccountMeta::new(*payer, true),
        None => AccountMeta::new_readonly(*program_id, false),
    };

    let accounts = vec![
        AccountMeta::new(*multisig, false),
        AccountMeta::new_readonly(*config_authority, true),
        rent_payer_meta,
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Decode the arguments of a `multisig_add_member` instruction
pub fn parse_multisig_add_member(data: &[u8]) -> Option<MultisigAddMemberArgs> {
    let args = data.strip_prefix(&MULTISIG_ADD_MEMBER_DISCRIMINATOR[..])?;
    MultisigAddMemberArgs::try_from_slice(args).ok()
}
