use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use dcs_api_types::{
    Address, CreditScore, LoanId, PoolId, RiskLevel, RiskPool, TxReceipt, U256,
};
use tracing::{debug, info, warn};

use crate::abi::{self, Token};
use crate::{
    CallRequest, ContractConfig, ContractError, ContractMethods, ContractResult, LendingContract,
    WalletProvider,
};

/// A callable binding of the configured contract to one signer account.
///
/// A handle belongs to one wallet session generation. When the session
/// changes it is revoked, and every later call on it fails with
/// [`ContractError::StaleHandle`] without reaching the provider.
pub struct ContractHandle<P> {
    provider: Rc<P>,
    address: Address,
    signer: Address,
    methods: ContractMethods,
    generation: u64,
    revoked: Cell<bool>,
}

impl<P: WalletProvider> ContractHandle<P> {
    pub fn bind(provider: Rc<P>, config: &ContractConfig, signer: Address, generation: u64) -> Self {
        debug!(contract = %config.address, %signer, generation, "binding contract handle");
        Self {
            provider,
            address: config.address,
            signer,
            methods: config.methods.clone(),
            generation,
            revoked: Cell::new(false),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked.get()
    }

    pub fn revoke(&self) {
        self.revoked.set(true);
    }

    fn ensure_live(&self) -> ContractResult<()> {
        if self.revoked.get() {
            return Err(ContractError::StaleHandle);
        }
        Ok(())
    }

    fn request(&self, signature: &str, args: &[Token]) -> CallRequest {
        CallRequest {
            from: Some(self.signer),
            to: self.address,
            data: abi::encode_call(signature, args),
        }
    }

    async fn transact(&self, signature: &str, args: &[Token]) -> ContractResult<TxReceipt> {
        self.ensure_live()?;

        let request = self.request(signature, args);
        let hash = self.provider.send_transaction(&request).await?;
        info!(%hash, method = signature, "transaction submitted");

        let receipt = self.provider.wait_for_transaction(hash).await?;
        if !receipt.success {
            warn!(%hash, method = signature, "transaction reverted");
            return Err(ContractError::Reverted(hash));
        }

        debug!(%hash, block = ?receipt.block_number, "transaction confirmed");
        Ok(receipt)
    }

    async fn query(&self, signature: &str, args: &[Token], words: usize) -> ContractResult<Vec<U256>> {
        self.ensure_live()?;

        let request = self.request(signature, args);
        let raw = self.provider.call(&request).await?;
        abi::decode_words(&raw, words)
    }
}

#[async_trait(?Send)]
impl<P: WalletProvider> LendingContract for ContractHandle<P> {
    async fn request_loan(&self, amount: U256, duration_secs: u64) -> ContractResult<TxReceipt> {
        self.transact(
            &self.methods.request_loan,
            &[Token::Uint(amount), Token::Uint(U256::from(duration_secs))],
        )
        .await
    }

    async fn repay_loan(&self, loan_id: LoanId) -> ContractResult<TxReceipt> {
        self.transact(&self.methods.repay_loan, &[Token::Uint(loan_id.0)])
            .await
    }

    async fn credit_score(&self, account: Address) -> ContractResult<CreditScore> {
        let words = self
            .query(&self.methods.credit_score, &[Token::Address(account)], 1)
            .await?;
        Ok(CreditScore(words[0]))
    }

    async fn create_pool(&self, risk_level: RiskLevel) -> ContractResult<TxReceipt> {
        self.transact(&self.methods.create_pool, &[Token::Uint(risk_level.0)])
            .await
    }

    async fn add_funds(&self, pool_id: PoolId, amount: U256) -> ContractResult<TxReceipt> {
        self.transact(
            &self.methods.add_funds,
            &[Token::Uint(U256::from(pool_id.0)), Token::Uint(amount)],
        )
        .await
    }

    async fn pool_count(&self) -> ContractResult<u64> {
        let words = self.query(&self.methods.pool_count, &[], 1).await?;
        let count = words[0];
        u64::try_from(count)
            .map_err(|_| ContractError::Decode(format!("pool count {count} does not fit in u64")))
    }

    async fn pool(&self, id: PoolId) -> ContractResult<RiskPool> {
        let words = self
            .query(&self.methods.pool_details, &[Token::Uint(U256::from(id.0))], 3)
            .await?;
        Ok(RiskPool {
            id,
            total_funds: words[0],
            available_funds: words[1],
            risk_level: RiskLevel(words[2]),
        })
    }
}
