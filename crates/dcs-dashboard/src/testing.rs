use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use dcs_api_types::{
    Address, CreditScore, LoanId, PoolId, RiskLevel, RiskPool, TxHash, TxReceipt, U256,
};
use dcs_contract_client::{ContractError, ContractResult, LendingContract};

/// Records every call as `name(args)` and answers from canned data.
#[derive(Default)]
pub struct MockContract {
    pub calls: RefCell<Vec<String>>,
    pub failure: Option<String>,
    pub credit_score: Cell<U256>,
    pub pools: Vec<RiskPool>,
    pub fail_on_pool: Option<u64>,
}

impl MockContract {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    pub fn with_pools(count: u64) -> Self {
        let pools = (0..count)
            .map(|i| RiskPool {
                id: PoolId(i),
                total_funds: U256::from(100 * (i + 1)),
                available_funds: U256::from(50 * (i + 1)),
                risk_level: RiskLevel(U256::from(i % 3)),
            })
            .collect();
        Self {
            pools,
            ..Self::default()
        }
    }

    pub fn log(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> ContractResult<()> {
        self.calls.borrow_mut().push(call);
        match &self.failure {
            Some(message) => Err(ContractError::from_rpc(-32000, message.clone())),
            None => Ok(()),
        }
    }

    fn receipt(&self) -> TxReceipt {
        TxReceipt {
            transaction_hash: TxHash::repeat_byte(0x01),
            block_number: Some(1),
            success: true,
        }
    }
}

#[async_trait(?Send)]
impl LendingContract for MockContract {
    async fn request_loan(&self, amount: U256, duration_secs: u64) -> ContractResult<TxReceipt> {
        self.record(format!("request_loan({amount},{duration_secs})"))?;
        Ok(self.receipt())
    }

    async fn repay_loan(&self, loan_id: LoanId) -> ContractResult<TxReceipt> {
        self.record(format!("repay_loan({loan_id})"))?;
        Ok(self.receipt())
    }

    async fn credit_score(&self, account: Address) -> ContractResult<CreditScore> {
        self.record(format!("credit_score({account})"))?;
        Ok(CreditScore(self.credit_score.get()))
    }

    async fn create_pool(&self, risk_level: RiskLevel) -> ContractResult<TxReceipt> {
        self.record(format!("create_pool({risk_level})"))?;
        Ok(self.receipt())
    }

    async fn add_funds(&self, pool_id: PoolId, amount: U256) -> ContractResult<TxReceipt> {
        self.record(format!("add_funds({pool_id},{amount})"))?;
        Ok(self.receipt())
    }

    async fn pool_count(&self) -> ContractResult<u64> {
        self.record("pool_count()".to_owned())?;
        Ok(self.pools.len() as u64)
    }

    async fn pool(&self, id: PoolId) -> ContractResult<RiskPool> {
        self.record(format!("pool({id})"))?;
        if self.fail_on_pool == Some(id.0) {
            return Err(ContractError::Transport("network error".into()));
        }
        self.pools
            .get(id.0 as usize)
            .cloned()
            .ok_or_else(|| ContractError::Decode(format!("no pool {id}")))
    }
}

/// A redraw callback that snapshots `view(page)` on every call.
pub fn recorder<'a, T, V: 'a>(
    page: &'a RefCell<T>,
    view: impl Fn(&T) -> V + 'a,
) -> (impl Fn() + 'a, Rc<RefCell<Vec<V>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let redraw = move || sink.borrow_mut().push(view(&page.borrow()));
    (redraw, seen)
}
