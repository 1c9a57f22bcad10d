use crate::advanced::instructions;
use crate::basic::debounce::Debouncer;
use crate::basic::registry::{InstructionRegistry, InstructionSource, RegisteredInstruction};
use crate::basic::resolver::{looks_like_domain, DomainResolver};
use crate::basic::validation::{validate, ValidationErrors};
use crate::core::config::FormConfig;
use crate::core::constants::ADD_MEMBER_CHUNK_BY;
use crate::core::wallet::WalletProvider;
use crate::error::{Result, SquadsSdkError};
use crate::types::{
    FormField, FormState, GovernanceRef, GovernedAccount, InvalidReason, Member, Permissions,
    UiInstruction,
};
use crate::utils::{parse_address, serialize_instruction_to_base64};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tracing::{debug, error, info, warn};

/// Lists the governed accounts the user can pick from.
pub trait GovernedAccountSource: Send + Sync {
    fn governed_accounts(&self) -> Vec<GovernedAccount>;
}

impl GovernedAccountSource for Vec<GovernedAccount> {
    fn governed_accounts(&self) -> Vec<GovernedAccount> {
        self.clone()
    }
}

/// How an input of the form is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    GovernedAccount {
        selected: Option<GovernedAccount>,
        options: Vec<GovernedAccount>,
        /// Restrict options to the proposal's governance
        should_be_governed: bool,
        governance: Option<GovernanceRef>,
    },
    Text {
        value: String,
        placeholder: Option<&'static str>,
    },
}

/// Descriptor of one input, for whatever renders the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionInput {
    pub label: &'static str,
    pub name: FormField,
    pub kind: InputKind,
    /// Show a spinner next to the input
    pub is_resolving: bool,
}

pub const MEMBER_PLACEHOLDER: &str = "Member wallet or domain name (e.g. domain.solana)";

/// Draft of a Squads V4 "add member" instruction inside a governance proposal.
///
/// The form registers itself with the proposal coordinator at `index` when
/// built and again after every state change. The registered source reads the
/// live form state when invoked, so the coordinator only has to call it once
/// the proposal is submitted.
pub struct AddMemberForm {
    inner: Arc<FormInner>,
    debouncer: Debouncer,
}

struct FormInner {
    index: usize,
    config: FormConfig,
    governance: Option<GovernanceRef>,
    state: RwLock<FormState>,
    /// Held across a state write and its registration so the coordinator
    /// always ends up with the entry of the latest write
    registration: Mutex<()>,
    errors: RwLock<ValidationErrors>,
    resolving: AtomicBool,
    wallet: Arc<dyn WalletProvider>,
    resolver: Arc<dyn DomainResolver>,
    registry: Arc<dyn InstructionRegistry>,
    accounts: Option<Arc<dyn GovernedAccountSource>>,
}

/// Weak handle registered with the coordinator
struct FormInstructionSource {
    form: Weak<FormInner>,
}

#[async_trait]
impl InstructionSource for FormInstructionSource {
    async fn get_instruction(&self) -> UiInstruction {
        match self.form.upgrade() {
            Some(form) => form.build_instruction(),
            None => UiInstruction::invalid(None, ADD_MEMBER_CHUNK_BY, InvalidReason::FormDropped),
        }
    }
}

pub struct AddMemberFormBuilder {
    index: usize,
    config: FormConfig,
    governance: Option<GovernanceRef>,
    wallet: Option<Arc<dyn WalletProvider>>,
    resolver: Option<Arc<dyn DomainResolver>>,
    registry: Option<Arc<dyn InstructionRegistry>>,
    accounts: Option<Arc<dyn GovernedAccountSource>>,
}

impl AddMemberFormBuilder {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            config: FormConfig::default(),
            governance: None,
            wallet: None,
            resolver: None,
            registry: None,
            accounts: None,
        }
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Governance the proposal is created under
    pub fn with_governance(mut self, governance: GovernanceRef) -> Self {
        self.governance = Some(governance);
        self
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn DomainResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn InstructionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_governed_accounts(mut self, accounts: Arc<dyn GovernedAccountSource>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn build(self) -> Result<AddMemberForm> {
        let wallet = self
            .wallet
            .ok_or_else(|| SquadsSdkError::Other("Wallet provider required".into()))?;
        let resolver = self
            .resolver
            .ok_or_else(|| SquadsSdkError::Other("Domain resolver required".into()))?;
        let registry = self
            .registry
            .ok_or_else(|| SquadsSdkError::Other("Instruction registry required".into()))?;

        let debouncer = Debouncer::new(self.config.debounce());
        let inner = Arc::new(FormInner {
            index: self.index,
            config: self.config,
            governance: self.governance,
            state: RwLock::new(FormState::default()),
            registration: Mutex::new(()),
            errors: RwLock::new(ValidationErrors::default()),
            resolving: AtomicBool::new(false),
            wallet,
            resolver,
            registry,
            accounts: self.accounts,
        });
        inner.notify();

        Ok(AddMemberForm { inner, debouncer })
    }
}

impl AddMemberForm {
    pub fn builder(index: usize) -> AddMemberFormBuilder {
        AddMemberFormBuilder::new(index)
    }

    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn state(&self) -> FormState {
        self.inner.read_state().clone()
    }

    /// Errors of the last validation pass
    pub fn errors(&self) -> ValidationErrors {
        read(&self.inner.errors).clone()
    }

    pub fn is_resolving_domain(&self) -> bool {
        self.inner.resolving.load(Ordering::SeqCst)
    }

    /// Replace the whole form state
    pub fn set_form(&self, state: FormState) {
        self.inner.update_state(|current| *current = state);
    }

    /// Merge changes into the current form state
    pub fn update_form(&self, update: impl FnOnce(&mut FormState)) {
        self.inner.update_state(update);
    }

    pub fn set_governed_account(&self, account: Option<GovernedAccount>) {
        self.edit_field(|state| state.governed_account = account);
    }

    pub fn set_vault(&self, vault: impl Into<String>) {
        let vault = vault.into();
        self.edit_field(|state| state.vault = vault);
    }

    pub fn set_member(&self, member: impl Into<String>) {
        let member = member.into();
        self.edit_field(|state| state.member = member);
    }

    /// User edit of a single input; stale messages are cleared
    fn edit_field(&self, update: impl FnOnce(&mut FormState)) {
        *write(&self.inner.errors) = ValidationErrors::default();
        self.inner.update_state(update);
    }

    /// Member input lost focus.
    ///
    /// Returns true when a domain resolution was scheduled.
    pub fn on_member_blur(&self) -> bool {
        let member = self.inner.read_state().member.clone();
        if !looks_like_domain(&member) {
            return false;
        }

        self.inner.resolving.store(true, Ordering::SeqCst);

        let form = Arc::downgrade(&self.inner);
        let resolver = Arc::clone(&self.inner.resolver);
        let scheduled = self.debouncer.call(move |ticket| async move {
            debug!(domain = %member, generation = ticket.generation(), "resolving domain");
            let result = resolver.resolve(&member).await;

            let Some(form) = form.upgrade() else {
                return;
            };
            if ticket.is_current() {
                form.apply_resolution(&member, result);
            }
        });

        match scheduled {
            Ok(_) => true,
            Err(e) => {
                warn!(index = self.inner.index, "cannot schedule domain resolution: {}", e);
                self.inner.resolving.store(false, Ordering::SeqCst);
                false
            },
        }
    }

    /// Run the schema, store the errors and report validity
    pub fn validate(&self) -> bool {
        self.inner.validate_current().0
    }

    /// Build the instruction from the current state
    pub async fn get_instruction(&self) -> UiInstruction {
        self.inner.build_instruction()
    }

    /// Source reading this form's live state, as registered with the coordinator
    pub fn instruction_source(&self) -> Arc<dyn InstructionSource> {
        self.inner.source()
    }

    pub fn inputs(&self) -> Vec<InstructionInput> {
        let state = self.state();
        let options = self
            .inner
            .accounts
            .as_ref()
            .map(|accounts| accounts.governed_accounts())
            .unwrap_or_default();

        vec![
            InstructionInput {
                label: "Governance",
                name: FormField::GovernedAccount,
                kind: InputKind::GovernedAccount {
                    selected: state.governed_account,
                    options,
                    should_be_governed: self.inner.index != 0 && self.inner.governance.is_some(),
                    governance: self.inner.governance,
                },
                is_resolving: false,
            },
            InstructionInput {
                label: "Vault",
                name: FormField::Vault,
                kind: InputKind::Text {
                    value: state.vault,
                    placeholder: None,
                },
                is_resolving: false,
            },
            InstructionInput {
                label: "Member",
                name: FormField::Member,
                kind: InputKind::Text {
                    value: state.member,
                    placeholder: Some(MEMBER_PLACEHOLDER),
                },
                is_resolving: self.is_resolving_domain(),
            },
        ]
    }
}

impl FormInner {
    fn read_state(&self) -> RwLockReadGuard<'_, FormState> {
        read(&self.state)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FormState> {
        write(&self.state)
    }

    fn update_state(self: &Arc<Self>, update: impl FnOnce(&mut FormState)) {
        let _registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        update(&mut self.write_state());
        self.notify();
    }

    fn source(self: &Arc<Self>) -> Arc<dyn InstructionSource> {
        Arc::new(FormInstructionSource {
            form: Arc::downgrade(self),
        })
    }

    /// Push the latest entry for this slot to the coordinator
    fn notify(self: &Arc<Self>) {
        let governance = governance_of(&self.read_state());
        debug!(
            index = self.index,
            governance = ?governance.map(|g| g.pubkey),
            "registering instruction"
        );
        self.registry.register(
            self.index,
            RegisteredInstruction {
                governance,
                source: self.source(),
            },
        );
    }

    fn apply_resolution(self: &Arc<Self>, domain: &str, result: Result<Option<Pubkey>>) {
        match result {
            Ok(Some(address)) => {
                info!(domain, %address, "domain resolved");
                self.update_state(|state| state.member = address.to_string());
            },
            Ok(None) => debug!(domain, "domain did not resolve to an address"),
            Err(e) => error!(domain, "error resolving domain: {}", e),
        }
        self.resolving.store(false, Ordering::SeqCst);
    }

    fn validate_current(&self) -> (bool, FormState) {
        let state = self.read_state().clone();
        let validation = validate(&state);
        *write(&self.errors) = validation.errors;
        (validation.is_valid, state)
    }

    fn build_instruction(&self) -> UiInstruction {
        let (is_valid, state) = self.validate_current();
        let governance = governance_of(&state);

        if !is_valid {
            return UiInstruction::invalid(
                governance,
                ADD_MEMBER_CHUNK_BY,
                InvalidReason::Validation,
            );
        }
        let Some(governance) = governance else {
            return UiInstruction::invalid(
                None,
                ADD_MEMBER_CHUNK_BY,
                InvalidReason::MissingGovernance,
            );
        };
        if !self.wallet.is_connected() {
            return UiInstruction::invalid(
                Some(governance),
                ADD_MEMBER_CHUNK_BY,
                InvalidReason::WalletNotConnected,
            );
        }

        match self.serialize_add_member(&state, &governance) {
            Ok(serialized) => UiInstruction::valid(serialized, governance, ADD_MEMBER_CHUNK_BY),
            Err(e) => {
                error!(index = self.index, "failed to build add member instruction: {}", e);
                UiInstruction::invalid(
                    Some(governance),
                    ADD_MEMBER_CHUNK_BY,
                    InvalidReason::Serialization,
                )
            },
        }
    }

    fn serialize_add_member(
        &self,
        state: &FormState,
        governance: &GovernanceRef,
    ) -> Result<String> {
        let multisig = parse_address(&state.vault)?;
        let member = parse_address(&state.member)?;

        let ix = instructions::multisig_add_member(
            &self.config.squads_program_id,
            &multisig,
            &governance.pubkey,
            Some(&governance.native_treasury_address),
            Member::new(member, Permissions::all()),
            None,
        )?;

        serialize_instruction_to_base64(&ix)
    }
}

fn governance_of(state: &FormState) -> Option<GovernanceRef> {
    state
        .governed_account
        .as_ref()
        .and_then(|account| account.governance)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
