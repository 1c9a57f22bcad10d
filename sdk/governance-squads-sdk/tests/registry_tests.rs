use governance_squads_sdk::{
    AddMemberForm, FormConfig, InstructionRegistry, InvalidReason, ProposalInstructions,
    RegisteredInstruction, SquadsSdkError, StaticWallet,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::{
    connected_wallet, governed_account, setup_form, setup_valid_form, MockResolver,
};

#[tokio::test]
async fn test_form_registers_on_build_and_on_every_change() {
    let ctx = setup_form(3, connected_wallet(), MockResolver::default());
    assert_eq!(ctx.registry.count(), 1);
    assert!(ctx.registry.table.get(3).is_some());

    ctx.form.set_vault(Pubkey::new_unique().to_string());
    ctx.form.set_member(Pubkey::new_unique().to_string());
    ctx.form.update_form(|state| state.member.push('x'));
    assert_eq!(ctx.registry.count(), 4);

    // one slot, overwritten each time
    assert_eq!(ctx.registry.table.len(), 1);
}

#[tokio::test]
async fn test_registered_governance_follows_selection() {
    let ctx = setup_form(0, connected_wallet(), MockResolver::default());
    assert_eq!(ctx.registry.table.get(0).unwrap().governance, None);

    let account = governed_account();
    ctx.form.set_governed_account(Some(account.clone()));
    assert_eq!(
        ctx.registry.table.get(0).unwrap().governance,
        account.governance
    );
}

#[tokio::test]
async fn test_registered_source_reads_live_state() {
    let ctx = setup_form(0, connected_wallet(), MockResolver::default());
    let stale_entry = ctx.registry.table.get(0).unwrap();

    ctx.form.set_governed_account(Some(governed_account()));
    ctx.form.set_vault(Pubkey::new_unique().to_string());
    ctx.form.set_member(Pubkey::new_unique().to_string());

    // even the entry from before the edits sees the current state
    let ix = stale_entry.source.get_instruction().await;
    assert!(ix.is_valid);
    assert_eq!(ix, ctx.form.get_instruction().await);
}

#[tokio::test]
async fn test_dropped_form_reports_invalid() {
    let ctx = setup_valid_form();
    let entry = ctx.registry.table.get(0).unwrap();
    drop(ctx.form);

    let ix = entry.source.get_instruction().await;
    assert!(!ix.is_valid);
    assert_eq!(ix.serialized_instruction, "");
    assert_eq!(ix.invalid_reason, Some(InvalidReason::FormDropped));
}

fn form_at(index: usize, registry: Arc<ProposalInstructions>) -> AddMemberForm {
    AddMemberForm::builder(index)
        .with_wallet(Arc::new(connected_wallet()))
        .with_resolver(Arc::new(MockResolver::default()))
        .with_registry(registry)
        .build()
        .unwrap()
}

fn fill(form: &AddMemberForm) {
    form.set_governed_account(Some(governed_account()));
    form.set_vault(Pubkey::new_unique().to_string());
    form.set_member(Pubkey::new_unique().to_string());
}

#[tokio::test]
async fn test_proposal_assembles_every_slot() {
    let proposal = Arc::new(ProposalInstructions::new());
    let first = form_at(0, proposal.clone());
    let second = form_at(1, proposal.clone());
    fill(&first);
    fill(&second);

    let instructions = proposal.assemble().await.unwrap();
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0], first.get_instruction().await);
    assert_eq!(instructions[1], second.get_instruction().await);

    let chunks = proposal.chunked().await.unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|chunk| chunk.len() == 1));
}

#[tokio::test]
async fn test_proposal_rejects_unfinished_form() {
    let proposal = Arc::new(ProposalInstructions::new());
    let first = form_at(0, proposal.clone());
    let _second = form_at(1, proposal.clone());
    fill(&first);

    assert!(matches!(
        proposal.assemble().await,
        Err(SquadsSdkError::InvalidInstruction(1))
    ));

    let collected = proposal.collect().await;
    assert!(collected[0].1.is_valid);
    assert_eq!(collected[1].1.invalid_reason, Some(InvalidReason::Validation));
}

#[tokio::test]
async fn test_disconnected_wallet_blocks_assembly() {
    let proposal = Arc::new(ProposalInstructions::new());
    let form = AddMemberForm::builder(0)
        .with_wallet(Arc::new(StaticWallet::disconnected()))
        .with_resolver(Arc::new(MockResolver::default()))
        .with_registry(proposal.clone())
        .build()
        .unwrap();
    fill(&form);

    assert!(proposal.assemble().await.is_err());
}

/// Coordinator that blocks once inside `register` for an entry without governance
#[derive(Default)]
struct StallingRegistry {
    table: ProposalInstructions,
    armed: AtomicBool,
}

impl InstructionRegistry for StallingRegistry {
    fn register(&self, index: usize, entry: RegisteredInstruction) {
        if entry.governance.is_none() && self.armed.swap(false, Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(300));
        }
        self.table.register(index, entry);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resolution_registration_does_not_overwrite_newer_edit() {
    let registry = Arc::new(StallingRegistry::default());
    let resolver = MockResolver::default().with_answer("alice.sol", Pubkey::new_unique());
    let form = AddMemberForm::builder(0)
        .with_config(FormConfig::default().with_debounce_ms(10))
        .with_wallet(Arc::new(connected_wallet()))
        .with_resolver(Arc::new(resolver))
        .with_registry(registry.clone())
        .build()
        .unwrap();

    form.set_member("alice.sol");
    registry.armed.store(true, Ordering::SeqCst);
    assert!(form.on_member_blur());

    // the resolver merge is now registering its stale snapshot
    tokio::time::sleep(Duration::from_millis(50)).await;
    let account = governed_account();
    form.set_governed_account(Some(account.clone()));

    assert!(!registry.armed.load(Ordering::SeqCst));
    assert_eq!(
        registry.table.get(0).unwrap().governance,
        account.governance
    );
    assert_eq!(form.state().governed_account, Some(account));
}
