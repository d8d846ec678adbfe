//! Lender dashboard: create risk pools, add funds, inspect the pool table.

use std::cell::RefCell;
use std::rc::Rc;

use dcs_api_types::{PoolId, RiskLevel, RiskPool, TxReceipt, U256};
use dcs_contract_client::{ContractResult, LendingContract};
use tracing::{debug, warn};

use crate::error::FormError;
use crate::status::{ActionStatus, Ticket};
use crate::units;

pub const FUNDS_ADDED: &str = "Funds added successfully!";
pub const POOL_CREATED: &str = "Risk pool created successfully!";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddFundsForm {
    pub pool_id: String,
    pub amount: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreatePoolForm {
    pub risk_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub ticket: Ticket,
    pub pool_id: PoolId,
    pub amount: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPool {
    pub ticket: Ticket,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Default)]
pub struct LenderPage {
    pub add_funds: AddFundsForm,
    pub create_pool: CreatePoolForm,
    pool_count: Option<u64>,
    pools: Vec<RiskPool>,
    status: ActionStatus,
}

impl LenderPage {
    pub fn status(&self) -> &ActionStatus {
        &self.status
    }

    /// The last fetched pool count, hidden while it is zero.
    pub fn pool_count(&self) -> Option<u64> {
        self.pool_count.filter(|count| *count > 0)
    }

    pub fn pools(&self) -> &[RiskPool] {
        &self.pools
    }

    pub fn reset(&mut self) {
        self.add_funds = AddFundsForm::default();
        self.create_pool = CreatePoolForm::default();
        self.pool_count = None;
        self.pools.clear();
        self.status.reset();
    }

    pub fn prepare_deposit(&mut self) -> Option<Deposit> {
        self.status.dismiss();
        if units::is_blank(&self.add_funds.pool_id) || units::is_blank(&self.add_funds.amount) {
            self.status.fail(FormError::MissingFields);
            return None;
        }

        let parsed = units::parse_index("pool ID", &self.add_funds.pool_id).and_then(|pool_id| {
            units::parse_amount(&self.add_funds.amount).map(|amount| (PoolId(pool_id), amount))
        });
        match parsed {
            Ok((pool_id, amount)) => Some(Deposit {
                ticket: self.status.start(),
                pool_id,
                amount,
            }),
            Err(err) => {
                self.status.fail(err);
                None
            }
        }
    }

    pub fn finish_deposit(&mut self, ticket: Ticket, outcome: ContractResult<TxReceipt>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(_) => {
                self.add_funds = AddFundsForm::default();
                self.status.succeed(FUNDS_ADDED);
            }
            Err(err) => {
                warn!(error = %err, "adding funds failed");
                self.status.fail(err);
            }
        }
    }

    pub fn prepare_new_pool(&mut self) -> Option<NewPool> {
        self.status.dismiss();
        if units::is_blank(&self.create_pool.risk_level) {
            self.status.fail(FormError::MissingRiskLevel);
            return None;
        }

        match units::parse_uint("risk level", &self.create_pool.risk_level) {
            Ok(level) => Some(NewPool {
                ticket: self.status.start(),
                risk_level: RiskLevel(level),
            }),
            Err(err) => {
                self.status.fail(err);
                None
            }
        }
    }

    pub fn finish_new_pool(&mut self, ticket: Ticket, outcome: ContractResult<TxReceipt>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(_) => {
                self.create_pool = CreatePoolForm::default();
                self.status.succeed(POOL_CREATED);
            }
            Err(err) => {
                warn!(error = %err, "creating risk pool failed");
                self.status.fail(err);
            }
        }
    }

    pub fn begin_query(&mut self) -> Ticket {
        self.status.dismiss();
        self.status.start()
    }

    pub fn finish_pool_count(&mut self, ticket: Ticket, outcome: ContractResult<u64>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(count) => self.pool_count = Some(count),
            Err(err) => self.status.fail(err),
        }
    }

    /// A failed listing keeps the previously shown pools.
    pub fn finish_pool_listing(&mut self, ticket: Ticket, outcome: ContractResult<Vec<RiskPool>>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(pools) => self.pools = pools,
            Err(err) => self.status.fail(err),
        }
    }
}

/// Read the pool count, then every pool by ascending index.
pub async fn fetch_pools<C: LendingContract + ?Sized>(contract: &C) -> ContractResult<Vec<RiskPool>> {
    let count = contract.pool_count().await?;
    debug!(count, "fetching risk pools");

    let mut pools = Vec::new();
    for index in 0..count {
        pools.push(contract.pool(PoolId(index)).await?);
    }
    Ok(pools)
}

pub async fn add_funds<C: LendingContract>(
    page: &RefCell<LenderPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let prepared = page.borrow_mut().prepare_deposit();
    redraw();
    let Some(deposit) = prepared else {
        return;
    };

    let outcome = match contract {
        Ok(contract) => contract.add_funds(deposit.pool_id, deposit.amount).await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_deposit(deposit.ticket, outcome);
    redraw();
}

pub async fn create_pool<C: LendingContract>(
    page: &RefCell<LenderPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let prepared = page.borrow_mut().prepare_new_pool();
    redraw();
    let Some(new_pool) = prepared else {
        return;
    };

    let outcome = match contract {
        Ok(contract) => contract.create_pool(new_pool.risk_level).await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_new_pool(new_pool.ticket, outcome);
    redraw();
}

pub async fn fetch_pool_count<C: LendingContract>(
    page: &RefCell<LenderPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let ticket = page.borrow_mut().begin_query();
    redraw();

    let outcome = match contract {
        Ok(contract) => contract.pool_count().await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_pool_count(ticket, outcome);
    redraw();
}

pub async fn list_pools<C: LendingContract>(
    page: &RefCell<LenderPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let ticket = page.borrow_mut().begin_query();
    redraw();

    let outcome = match contract {
        Ok(contract) => fetch_pools(contract.as_ref()).await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_pool_listing(ticket, outcome);
    redraw();
}
