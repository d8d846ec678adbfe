use std::cell::RefCell;
use std::rc::Rc;

use dcs_api_types::{Address, ProviderEvent};
use dcs_contract_client::{
    ContractConfig, ContractError, ContractHandle, ContractResult, WalletProvider,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected(Address),
    Failed(String),
}

/// What a provider event did to the session, so the shell knows whether
/// dependent page state must be reset and whether to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Unchanged,
    AccountSwitched,
    Disconnected,
    ReconnectRequired,
}

/// A connect attempt in flight. Carries the generation it was started under.
pub struct ConnectAttempt<P> {
    pub provider: Rc<P>,
    pub generation: u64,
    pub expected_chain: Option<u64>,
}

/// Connection to the injected wallet plus the contract handle bound to it.
///
/// Every transition bumps `generation` and revokes the current handle, so a
/// handle obtained before an account or network change can never be used
/// after it.
pub struct WalletSession<P> {
    provider: Option<Rc<P>>,
    config: ContractConfig,
    status: SessionStatus,
    handle: Option<Rc<ContractHandle<P>>>,
    generation: u64,
}

impl<P: WalletProvider> WalletSession<P> {
    /// `provider` is `None` when no wallet is injected into the page.
    pub fn new(provider: Option<Rc<P>>, config: ContractConfig) -> Self {
        Self {
            provider,
            config,
            status: SessionStatus::Disconnected,
            handle: None,
            generation: 0,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn account(&self) -> Option<Address> {
        match self.status {
            SessionStatus::Connected(account) => Some(account),
            _ => None,
        }
    }

    /// The live contract handle, or `NotInitialized` when not connected.
    pub fn contract(&self) -> ContractResult<Rc<ContractHandle<P>>> {
        self.handle.clone().ok_or(ContractError::NotInitialized)
    }

    pub fn begin_connect(&mut self) -> ContractResult<ConnectAttempt<P>> {
        let Some(provider) = self.provider.clone() else {
            let err = ContractError::ProviderMissing;
            self.status = SessionStatus::Failed(err.to_string());
            return Err(err);
        };

        self.invalidate();
        self.status = SessionStatus::Connecting;
        Ok(ConnectAttempt {
            provider,
            generation: self.generation,
            expected_chain: self.config.chain_id,
        })
    }

    /// Apply the outcome of a connect attempt. Outcomes from an attempt that
    /// was overtaken by another transition are dropped.
    pub fn finish_connect(
        &mut self,
        attempt: &ConnectAttempt<P>,
        outcome: ContractResult<Address>,
    ) -> ContractResult<Address> {
        if attempt.generation != self.generation {
            debug!(
                attempt = attempt.generation,
                current = self.generation,
                "dropping superseded connect result"
            );
            return Err(ContractError::StaleHandle);
        }

        match outcome {
            Ok(account) => {
                self.adopt(attempt.provider.clone(), account);
                info!(%account, "wallet connected");
                Ok(account)
            }
            Err(err) => {
                warn!(error = %err, "wallet connection failed");
                self.status = SessionStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.invalidate();
        self.status = SessionStatus::Disconnected;
        info!("wallet disconnected");
    }

    pub fn handle_event(&mut self, event: ProviderEvent) -> SessionChange {
        match event {
            ProviderEvent::AccountsChanged(accounts) => self.accounts_changed(&accounts),
            ProviderEvent::ChainChanged(chain_id) => self.chain_changed(chain_id),
        }
    }

    fn accounts_changed(&mut self, accounts: &[Address]) -> SessionChange {
        let SessionStatus::Connected(current) = self.status else {
            return SessionChange::Unchanged;
        };

        match accounts.first() {
            None => {
                self.disconnect();
                SessionChange::Disconnected
            }
            Some(&account) if account == current => SessionChange::Unchanged,
            Some(&account) => {
                let Some(provider) = self.provider.clone() else {
                    return SessionChange::Unchanged;
                };
                self.invalidate();
                self.adopt(provider, account);
                info!(%account, "wallet account switched");
                SessionChange::AccountSwitched
            }
        }
    }

    fn chain_changed(&mut self, chain_id: u64) -> SessionChange {
        info!(chain_id, "wallet network changed");
        match self.status {
            // The attempt in flight reads the chain id only after the account
            // prompt resolves, so it already sees the new network.
            SessionStatus::Connecting => SessionChange::Unchanged,
            SessionStatus::Connected(_) | SessionStatus::Failed(_) => {
                self.invalidate();
                self.status = SessionStatus::Disconnected;
                SessionChange::ReconnectRequired
            }
            SessionStatus::Disconnected => SessionChange::Unchanged,
        }
    }

    fn adopt(&mut self, provider: Rc<P>, account: Address) {
        let handle = ContractHandle::bind(provider, &self.config, account, self.generation);
        self.handle = Some(Rc::new(handle));
        self.status = SessionStatus::Connected(account);
    }

    fn invalidate(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.revoke();
        }
        self.generation += 1;
    }
}

/// Request account access and bind the contract.
///
/// Borrows the session only between awaits, so other UI handlers can read
/// it while the wallet prompt is open.
pub async fn connect<P: WalletProvider>(session: &RefCell<WalletSession<P>>) -> ContractResult<Address> {
    let attempt = session.borrow_mut().begin_connect()?;
    let outcome = authorize(&attempt).await;
    session.borrow_mut().finish_connect(&attempt, outcome)
}

async fn authorize<P: WalletProvider>(attempt: &ConnectAttempt<P>) -> ContractResult<Address> {
    let accounts = attempt.provider.request_accounts().await?;
    let account = accounts.first().copied().ok_or(ContractError::NoAccounts)?;

    if let Some(expected) = attempt.expected_chain {
        let actual = attempt.provider.chain_id().await?;
        if actual != expected {
            return Err(ContractError::WrongNetwork { expected, actual });
        }
    }

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dcs_api_types::{Bytes, TxHash, TxReceipt};
    use dcs_contract_client::{CallRequest, LendingContract};
    use std::cell::Cell;

    const CONTRACT: Address = Address::repeat_byte(0xcc);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    struct MockProvider {
        accounts: RefCell<ContractResult<Vec<Address>>>,
        chain_id: Cell<u64>,
        sends: Cell<usize>,
    }

    impl MockProvider {
        fn with_accounts(accounts: Vec<Address>) -> Rc<Self> {
            Rc::new(Self {
                accounts: RefCell::new(Ok(accounts)),
                chain_id: Cell::new(1),
                sends: Cell::new(0),
            })
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for MockProvider {
        async fn request_accounts(&self) -> ContractResult<Vec<Address>> {
            self.accounts.borrow().clone()
        }

        async fn chain_id(&self) -> ContractResult<u64> {
            Ok(self.chain_id.get())
        }

        async fn call(&self, _request: &CallRequest) -> ContractResult<Bytes> {
            Ok(Bytes::from(vec![0u8; 32]))
        }

        async fn send_transaction(&self, _request: &CallRequest) -> ContractResult<TxHash> {
            self.sends.set(self.sends.get() + 1);
            Ok(TxHash::ZERO)
        }

        async fn wait_for_transaction(&self, hash: TxHash) -> ContractResult<TxReceipt> {
            Ok(TxReceipt {
                transaction_hash: hash,
                block_number: Some(1),
                success: true,
            })
        }

        fn subscribe(&self, _listener: Box<dyn Fn(ProviderEvent)>) {}
    }

    fn session(provider: Option<Rc<MockProvider>>) -> RefCell<WalletSession<MockProvider>> {
        RefCell::new(WalletSession::new(provider, ContractConfig::new(CONTRACT)))
    }

    #[tokio::test]
    async fn connect_binds_handle_to_first_account() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE, BOB])));

        let account = connect(&session).await.unwrap();
        assert_eq!(account, ALICE);

        let session = session.borrow();
        assert_eq!(session.status(), &SessionStatus::Connected(ALICE));
        let handle = session.contract().unwrap();
        assert_eq!(handle.signer(), ALICE);
        assert_eq!(handle.address(), CONTRACT);
    }

    #[tokio::test]
    async fn missing_provider_fails_without_handle() {
        let session = session(None);

        let err = connect(&session).await.unwrap_err();
        assert_eq!(err, ContractError::ProviderMissing);

        let session = session.borrow();
        assert_eq!(
            session.status(),
            &SessionStatus::Failed("Please install MetaMask to use this dApp".into())
        );
        assert_eq!(session.contract().err(), Some(ContractError::NotInitialized));
    }

    #[tokio::test]
    async fn rejected_request_leaves_session_failed() {
        let provider = MockProvider::with_accounts(vec![]);
        *provider.accounts.borrow_mut() = Err(ContractError::from_rpc(4001, "User rejected the request."));
        let session = session(Some(provider));

        let err = connect(&session).await.unwrap_err();
        assert!(matches!(err, ContractError::Rejected(_)));
        assert!(session.borrow().account().is_none());
        assert!(session.borrow().contract().is_err());
    }

    #[tokio::test]
    async fn wrong_network_is_refused_when_chain_is_pinned() {
        let provider = MockProvider::with_accounts(vec![ALICE]);
        provider.chain_id.set(5);
        let mut config = ContractConfig::new(CONTRACT);
        config.chain_id = Some(1);
        let session = RefCell::new(WalletSession::new(Some(provider), config));

        let err = connect(&session).await.unwrap_err();
        assert_eq!(err, ContractError::WrongNetwork { expected: 1, actual: 5 });
        assert!(session.borrow().contract().is_err());
    }

    #[tokio::test]
    async fn account_change_revokes_old_handle_and_binds_new_one() {
        let provider = MockProvider::with_accounts(vec![ALICE]);
        let session = session(Some(provider.clone()));
        connect(&session).await.unwrap();

        let stale = session.borrow().contract().unwrap();
        let change = session
            .borrow_mut()
            .handle_event(ProviderEvent::AccountsChanged(vec![BOB]));
        assert_eq!(change, SessionChange::AccountSwitched);

        assert!(stale.is_revoked());
        let err = stale.request_loan(dcs_api_types::U256::from(1u64), 86_400).await.unwrap_err();
        assert_eq!(err, ContractError::StaleHandle);
        assert_eq!(provider.sends.get(), 0);

        let fresh = session.borrow().contract().unwrap();
        assert_eq!(fresh.signer(), BOB);
        assert!(fresh.generation() > stale.generation());
        fresh.request_loan(dcs_api_types::U256::from(1u64), 86_400).await.unwrap();
        assert_eq!(provider.sends.get(), 1);
    }

    #[tokio::test]
    async fn empty_account_list_disconnects() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));
        connect(&session).await.unwrap();

        let change = session
            .borrow_mut()
            .handle_event(ProviderEvent::AccountsChanged(vec![]));
        assert_eq!(change, SessionChange::Disconnected);
        assert_eq!(session.borrow().status(), &SessionStatus::Disconnected);
        assert!(session.borrow().contract().is_err());
    }

    #[tokio::test]
    async fn chain_change_requires_reconnect() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));
        connect(&session).await.unwrap();
        let stale = session.borrow().contract().unwrap();

        let change = session.borrow_mut().handle_event(ProviderEvent::ChainChanged(10));
        assert_eq!(change, SessionChange::ReconnectRequired);
        assert!(stale.is_revoked());
        assert!(session.borrow().contract().is_err());

        connect(&session).await.unwrap();
        assert!(session.borrow().contract().is_ok());
    }

    #[tokio::test]
    async fn switching_to_pinned_chain_after_wrong_network_reconnects() {
        let provider = MockProvider::with_accounts(vec![ALICE]);
        provider.chain_id.set(5);
        let mut config = ContractConfig::new(CONTRACT);
        config.chain_id = Some(1);
        let session = RefCell::new(WalletSession::new(Some(provider.clone()), config));
        connect(&session).await.unwrap_err();

        provider.chain_id.set(1);
        let change = session.borrow_mut().handle_event(ProviderEvent::ChainChanged(1));
        assert_eq!(change, SessionChange::ReconnectRequired);
        assert_eq!(session.borrow().status(), &SessionStatus::Disconnected);

        assert_eq!(connect(&session).await.unwrap(), ALICE);
        assert!(session.borrow().contract().is_ok());
    }

    #[tokio::test]
    async fn chain_change_during_pending_connect_keeps_the_attempt() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));

        let attempt = session.borrow_mut().begin_connect().unwrap();
        let change = session.borrow_mut().handle_event(ProviderEvent::ChainChanged(10));
        assert_eq!(change, SessionChange::Unchanged);
        assert_eq!(session.borrow().status(), &SessionStatus::Connecting);

        let account = session.borrow_mut().finish_connect(&attempt, Ok(ALICE)).unwrap();
        assert_eq!(account, ALICE);
        assert!(session.borrow().contract().is_ok());
    }

    #[test]
    fn chain_change_after_disconnect_stays_disconnected() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));
        session.borrow_mut().disconnect();

        let change = session.borrow_mut().handle_event(ProviderEvent::ChainChanged(10));
        assert_eq!(change, SessionChange::Unchanged);
        assert_eq!(session.borrow().status(), &SessionStatus::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_revokes_handle() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));
        connect(&session).await.unwrap();
        let stale = session.borrow().contract().unwrap();

        session.borrow_mut().disconnect();
        assert!(stale.is_revoked());
        assert!(session.borrow().account().is_none());
    }

    #[tokio::test]
    async fn superseded_connect_result_is_dropped() {
        let provider = MockProvider::with_accounts(vec![ALICE]);
        let session = session(Some(provider));

        let attempt = session.borrow_mut().begin_connect().unwrap();
        session.borrow_mut().disconnect();

        let err = session.borrow_mut().finish_connect(&attempt, Ok(ALICE)).unwrap_err();
        assert_eq!(err, ContractError::StaleHandle);
        assert_eq!(session.borrow().status(), &SessionStatus::Disconnected);
        assert!(session.borrow().contract().is_err());
    }

    #[test]
    fn events_before_connect_change_nothing() {
        let session = session(Some(MockProvider::with_accounts(vec![ALICE])));
        let change = session
            .borrow_mut()
            .handle_event(ProviderEvent::AccountsChanged(vec![BOB]));
        assert_eq!(change, SessionChange::Unchanged);
        assert_eq!(session.borrow().status(), &SessionStatus::Disconnected);
    }
}
