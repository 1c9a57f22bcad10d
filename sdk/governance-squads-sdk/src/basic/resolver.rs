use crate::core::connection::SolConnection;
use crate::core::constants::{NAME_HASH_PREFIX, NAME_PROGRAM_ID, SOL_ROOT_DOMAIN};
use crate::error::{Result, SquadsSdkError};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Turns a human-readable name into the wallet address it points at.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// `Ok(None)` when the name is unknown or unsupported.
    async fn resolve(&self, domain: &str) -> Result<Option<Pubkey>>;
}

/// True when a member input should be treated as a domain, not an address
pub fn looks_like_domain(value: &str) -> bool {
    value.contains('.')
}

/// Name record header: parent (32) | owner (32) | class (32)
const NAME_RECORD_HEADER_LEN: usize = 96;

/// Resolves `.sol` names through the SPL name service.
pub struct SnsResolver<C> {
    connection: C,
}

impl<C: SolConnection> SnsResolver<C> {
    pub fn new(connection: C) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    async fn owner_of(&self, name_account: &Pubkey) -> Result<Option<Pubkey>> {
        let account = self
            .connection
            .get_account(name_account)
            .await
            .map_err(|e| SquadsSdkError::Connection(e.to_string()))?;

        let Some(account) = account else {
            return Ok(None);
        };

        if account.data.len() < NAME_RECORD_HEADER_LEN {
            return Err(SquadsSdkError::InvalidAccountData(format!(
                "Name record {} too small: {} bytes",
                name_account,
                account.data.len()
            )));
        }

        let mut owner = [0u8; 32];
        owner.copy_from_slice(&account.data[32..64]);
        let owner = Pubkey::new_from_array(owner);

        Ok((owner != Pubkey::default()).then_some(owner))
    }
}

#[async_trait]
impl<C: SolConnection> DomainResolver for SnsResolver<C> {
    async fn resolve(&self, domain: &str) -> Result<Option<Pubkey>> {
        let Some(name_account) = derive_sol_domain_key(domain) else {
            debug!(domain, "not a .sol name, skipping SNS lookup");
            return Ok(None);
        };
        self.owner_of(&name_account).await
    }
}

//=============================================================================
// Name Account Derivation
//=============================================================================

pub fn hash_name(name: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(NAME_HASH_PREFIX.as_bytes());
    hasher.update(name.as_bytes());
    hasher.finalize().into()
}

/// Name account for `hashed_name` under `parent`, with no class
pub fn derive_name_account(hashed_name: &[u8; 32], parent: &Pubkey) -> Pubkey {
    let class = Pubkey::default();
    Pubkey::find_program_address(
        &[hashed_name.as_ref(), class.as_ref(), parent.as_ref()],
        &NAME_PROGRAM_ID,
    )
    .0
}

/// Name account of `name.sol` or `sub.name.sol`.
///
/// The `.sol` suffix is optional for bare names; anything with another
/// suffix or more than one subdomain level returns `None`.
pub fn derive_sol_domain_key(domain: &str) -> Option<Pubkey> {
    let domain = domain.trim().to_lowercase();
    let name = domain.strip_suffix(".sol").unwrap_or(&domain);

    let labels: Vec<&str> = name.split('.').collect();
    if labels.iter().any(|label| label.is_empty()) {
        return None;
    }

    match labels.as_slice() {
        [name] if domain.ends_with(".sol") || !domain.contains('.') => {
            Some(derive_name_account(&hash_name(name), &SOL_ROOT_DOMAIN))
        },
        [sub, name] if domain.ends_with(".sol") => {
            let parent = derive_name_account(&hash_name(name), &SOL_ROOT_DOMAIN);
            Some(derive_name_account(&hash_name(&format!("\0{}", sub)), &parent))
        },
        _ => None,
    }
}
