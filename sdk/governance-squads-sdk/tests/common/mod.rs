#![allow(dead_code)]

use async_trait::async_trait;
use governance_squads_sdk::{
    core::constants::GOVERNANCE_PROGRAM_ID, AddMemberForm, DomainResolver, GovernanceRef,
    GovernedAccount, InstructionRegistry, ProposalInstructions, RegisteredInstruction,
    SolConnection, SquadsSdkError, StaticWallet,
};
use solana_sdk::{account::Account, pubkey::Pubkey};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory accounts, optionally failing every lookup
#[derive(Default)]
pub struct MockConnection {
    pub accounts: Mutex<HashMap<Pubkey, Account>>,
    pub fail: bool,
}

impl MockConnection {
    pub fn with_account(self, pubkey: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.lock().unwrap().insert(
            pubkey,
            Account {
                lamports: 1_000_000,
                data,
                owner: governance_squads_sdk::core::constants::NAME_PROGRAM_ID,
                executable: false,
                rent_epoch: 0,
            },
        );
        self
    }
}

#[async_trait]
impl SolConnection for MockConnection {
    async fn get_account(
        &self,
        pubkey: &Pubkey,
    ) -> Result<Option<Account>, Box<dyn std::error::Error + Send + Sync>> {
        if self.fail {
            return Err("rpc unavailable".into());
        }
        Ok(self.accounts.lock().unwrap().get(pubkey).cloned())
    }
}

/// Resolver answering from a table and recording every lookup
#[derive(Default)]
pub struct MockResolver {
    pub answers: Mutex<HashMap<String, Pubkey>>,
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl MockResolver {
    pub fn with_answer(self, domain: &str, address: Pubkey) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), address);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainResolver for MockResolver {
    async fn resolve(&self, domain: &str) -> governance_squads_sdk::Result<Option<Pubkey>> {
        self.calls.lock().unwrap().push(domain.to_string());
        if self.fail {
            return Err(SquadsSdkError::Connection("lookup failed".into()));
        }
        Ok(self.answers.lock().unwrap().get(domain).copied())
    }
}

/// Coordinator that also counts registrations
#[derive(Default)]
pub struct CountingRegistry {
    pub table: ProposalInstructions,
    pub registrations: AtomicUsize,
}

impl CountingRegistry {
    pub fn count(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

impl InstructionRegistry for CountingRegistry {
    fn register(&self, index: usize, entry: RegisteredInstruction) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.table.register(index, entry);
    }
}

pub struct TestContext {
    pub form: AddMemberForm,
    pub resolver: Arc<MockResolver>,
    pub registry: Arc<CountingRegistry>,
}

pub fn governed_account() -> GovernedAccount {
    let governance = GovernanceRef::derive(&GOVERNANCE_PROGRAM_ID, Pubkey::new_unique());
    GovernedAccount::new(Pubkey::new_unique(), Some(governance))
}

pub fn setup_form(index: usize, wallet: StaticWallet, resolver: MockResolver) -> TestContext {
    let resolver = Arc::new(resolver);
    let registry = Arc::new(CountingRegistry::default());
    let form = AddMemberForm::builder(index)
        .with_wallet(Arc::new(wallet))
        .with_resolver(resolver.clone())
        .with_registry(registry.clone())
        .build()
        .unwrap();

    TestContext {
        form,
        resolver,
        registry,
    }
}

pub fn connected_wallet() -> StaticWallet {
    StaticWallet::connected(Pubkey::new_unique())
}

/// Form with every field filled in correctly and a wallet connected
pub fn setup_valid_form() -> TestContext {
    let ctx = setup_form(0, connected_wallet(), MockResolver::default());
    ctx.form.set_governed_account(Some(governed_account()));
    ctx.form.set_vault(Pubkey::new_unique().to_string());
    ctx.form.set_member(Pubkey::new_unique().to_string());
    ctx
}
