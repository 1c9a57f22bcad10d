use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

/// Abstraction over the connected wallet.
/// Building an instruction only needs to know whether a wallet is connected,
/// signing happens later when the proposal transaction is sent.
pub trait WalletProvider: Send + Sync {
    fn public_key(&self) -> Option<Pubkey>;

    fn is_connected(&self) -> bool {
        self.public_key().is_some()
    }
}

/// Wallet with a fixed (possibly absent) public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticWallet(pub Option<Pubkey>);

impl StaticWallet {
    pub fn connected(pubkey: Pubkey) -> Self {
        Self(Some(pubkey))
    }

    pub fn disconnected() -> Self {
        Self(None)
    }
}

impl WalletProvider for StaticWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.0
    }
}

impl WalletProvider for Keypair {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.pubkey())
    }
}
