// Example: drafting a Squads V4 add-member instruction for a governance proposal
//
// This example demonstrates how to:
// 1. Wire the form to an RPC-backed SNS resolver and a proposal slot table
// 2. Fill the form, resolving the member from a `.sol` name
// 3. Assemble the serialized instruction for the proposal
//
// Usage: cargo run --example add_member -- <governance> <vault> <member or name.sol>
// RPC_URL defaults to mainnet-beta.

use governance_squads_sdk::core::constants::GOVERNANCE_PROGRAM_ID;
use governance_squads_sdk::{
    AddMemberForm, GovernanceRef, GovernedAccount, ProposalInstructions, SnsResolver,
    StaticWallet,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [governance, vault, member] = args.as_slice() else {
        eprintln!("usage: add_member <governance> <vault> <member or name.sol>");
        std::process::exit(2);
    };

    let rpc_url = std::env::var("RPC_URL")
        .unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".to_string());

    // 1. Collaborators
    let proposal = Arc::new(ProposalInstructions::new());
    let governance = GovernanceRef::derive(&GOVERNANCE_PROGRAM_ID, Pubkey::from_str(governance)?);
    let form = AddMemberForm::builder(0)
        .with_wallet(Arc::new(StaticWallet::connected(Pubkey::new_unique())))
        .with_resolver(Arc::new(SnsResolver::new(RpcClient::new(rpc_url))))
        .with_registry(proposal.clone())
        .build()?;

    // 2. Fill the form like a user would
    form.set_governed_account(Some(GovernedAccount::new(governance.pubkey, Some(governance))));
    form.set_vault(vault.as_str());
    form.set_member(member.as_str());
    if form.on_member_blur() {
        println!("Resolving {}...", member);
        while form.is_resolving_domain() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        println!("Member resolved to {}", form.state().member);
    }

    // 3. Assemble
    match proposal.assemble().await {
        Ok(instructions) => {
            for ix in instructions {
                println!("{}", serde_json::to_string_pretty(&ix)?);
            }
        },
        Err(e) => {
            println!("Proposal not ready: {}", e);
            for (field, message) in form.errors().iter() {
                println!("  {}: {}", field, message);
            }
        },
    }

    Ok(())
}
