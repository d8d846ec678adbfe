//! Borrower dashboard: request a loan, repay a loan, look up the credit score.

use std::cell::RefCell;
use std::rc::Rc;

use dcs_api_types::{Address, CreditScore, LoanId, TxReceipt, U256};
use dcs_contract_client::{ContractError, ContractResult, LendingContract};
use tracing::warn;

use crate::error::FormError;
use crate::status::{ActionStatus, Ticket};
use crate::units;

pub const LOAN_REQUESTED: &str = "Loan request submitted successfully!";
pub const LOAN_REPAID: &str = "Loan repaid successfully!";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoanRequestForm {
    pub amount: String,
    pub duration_days: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepayForm {
    pub loan_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanRequest {
    pub ticket: Ticket,
    pub amount: U256,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repayment {
    pub ticket: Ticket,
    pub loan_id: LoanId,
}

#[derive(Debug, Default)]
pub struct BorrowerPage {
    pub loan: LoanRequestForm,
    pub repay: RepayForm,
    credit_score: Option<CreditScore>,
    status: ActionStatus,
}

impl BorrowerPage {
    pub fn status(&self) -> &ActionStatus {
        &self.status
    }

    pub fn credit_score(&self) -> Option<CreditScore> {
        self.credit_score
    }

    /// Forget all session-derived state after the wallet session changed.
    pub fn reset(&mut self) {
        self.loan = LoanRequestForm::default();
        self.repay = RepayForm::default();
        self.credit_score = None;
        self.status.reset();
    }

    pub fn prepare_loan_request(&mut self) -> Option<LoanRequest> {
        self.status.dismiss();
        if units::is_blank(&self.loan.amount) || units::is_blank(&self.loan.duration_days) {
            self.status.fail(FormError::MissingFields);
            return None;
        }

        let parsed = units::parse_amount(&self.loan.amount).and_then(|amount| {
            units::days_to_seconds(&self.loan.duration_days).map(|secs| (amount, secs))
        });
        match parsed {
            Ok((amount, duration_secs)) => Some(LoanRequest {
                ticket: self.status.start(),
                amount,
                duration_secs,
            }),
            Err(err) => {
                self.status.fail(err);
                None
            }
        }
    }

    pub fn finish_loan_request(&mut self, ticket: Ticket, outcome: ContractResult<TxReceipt>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(_) => {
                self.loan = LoanRequestForm::default();
                self.status.succeed(LOAN_REQUESTED);
            }
            Err(err) => {
                warn!(error = %err, "loan request failed");
                self.status.fail(err);
            }
        }
    }

    pub fn prepare_repayment(&mut self) -> Option<Repayment> {
        self.status.dismiss();
        if units::is_blank(&self.repay.loan_id) {
            self.status.fail(FormError::MissingLoanId);
            return None;
        }

        match units::parse_uint("loan ID", &self.repay.loan_id) {
            Ok(id) => Some(Repayment {
                ticket: self.status.start(),
                loan_id: LoanId(id),
            }),
            Err(err) => {
                self.status.fail(err);
                None
            }
        }
    }

    pub fn finish_repayment(&mut self, ticket: Ticket, outcome: ContractResult<TxReceipt>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(_) => {
                self.repay = RepayForm::default();
                self.status.succeed(LOAN_REPAID);
            }
            Err(err) => {
                warn!(error = %err, "loan repayment failed");
                self.status.fail(err);
            }
        }
    }

    pub fn begin_credit_score(&mut self) -> Ticket {
        self.status.dismiss();
        self.status.start()
    }

    pub fn finish_credit_score(&mut self, ticket: Ticket, outcome: ContractResult<CreditScore>) {
        if !self.status.settle(ticket) {
            return;
        }
        match outcome {
            Ok(score) => self.credit_score = Some(score),
            Err(err) => self.status.fail(err),
        }
    }
}

pub async fn request_loan<C: LendingContract>(
    page: &RefCell<BorrowerPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let prepared = page.borrow_mut().prepare_loan_request();
    redraw();
    let Some(request) = prepared else {
        return;
    };

    let outcome = match contract {
        Ok(contract) => contract.request_loan(request.amount, request.duration_secs).await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_loan_request(request.ticket, outcome);
    redraw();
}

pub async fn repay_loan<C: LendingContract>(
    page: &RefCell<BorrowerPage>,
    contract: ContractResult<Rc<C>>,
    redraw: &dyn Fn(),
) {
    let prepared = page.borrow_mut().prepare_repayment();
    redraw();
    let Some(repayment) = prepared else {
        return;
    };

    let outcome = match contract {
        Ok(contract) => contract.repay_loan(repayment.loan_id).await,
        Err(err) => Err(err),
    };
    page.borrow_mut().finish_repayment(repayment.ticket, outcome);
    redraw();
}

pub async fn fetch_credit_score<C: LendingContract>(
    page: &RefCell<BorrowerPage>,
    contract: ContractResult<Rc<C>>,
    account: Option<Address>,
    redraw: &dyn Fn(),
) {
    let ticket = page.borrow_mut().begin_credit_score();
    redraw();

    let outcome = match (contract, account) {
        (Err(err), _) => Err(err),
        (Ok(_), None) => Err(ContractError::NoAccount),
        (Ok(contract), Some(account)) => contract.credit_score(account).await,
    };
    page.borrow_mut().finish_credit_score(ticket, outcome);
    redraw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockContract, recorder};

    const ALICE: Address = Address::repeat_byte(0xa1);

    fn page_with(amount: &str, days: &str, loan_id: &str) -> RefCell<BorrowerPage> {
        let mut page = BorrowerPage::default();
        page.loan.amount = amount.into();
        page.loan.duration_days = days.into();
        page.repay.loan_id = loan_id.into();
        RefCell::new(page)
    }

    #[tokio::test]
    async fn loan_request_converts_units_and_clears_only_its_fields() {
        let page = page_with("1.5", "30", "7");
        let contract = Rc::new(MockContract::default());
        let (redraw, seen) = recorder(&page, |p| p.status().loading());

        request_loan(&page, Ok(contract.clone()), &redraw).await;

        assert_eq!(
            contract.log(),
            vec!["request_loan(1500000000000000000,2592000)".to_owned()]
        );
        let page = page.borrow();
        assert_eq!(page.loan, LoanRequestForm::default());
        assert_eq!(page.repay.loan_id, "7");
        assert_eq!(page.status().notice(), Some(LOAN_REQUESTED));
        assert_eq!(page.status().error(), None);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[tokio::test]
    async fn empty_field_never_reaches_contract() {
        for (amount, days) in [("", "30"), ("1.5", ""), ("  ", " ")] {
            let page = page_with(amount, days, "");
            let contract = Rc::new(MockContract::default());

            request_loan(&page, Ok(contract.clone()), &|| {}).await;

            assert!(contract.log().is_empty());
            let page = page.borrow();
            assert_eq!(page.status().error(), Some("Please fill in all fields"));
            assert!(!page.status().loading());
        }
    }

    #[tokio::test]
    async fn validation_wins_over_missing_contract() {
        let page = page_with("", "30", "");

        request_loan::<MockContract>(&page, Err(ContractError::NotInitialized), &|| {}).await;

        assert_eq!(page.borrow().status().error(), Some("Please fill in all fields"));
    }

    #[tokio::test]
    async fn failed_request_keeps_fields_and_stops_loading() {
        let page = page_with("2", "10", "");
        let contract = Rc::new(MockContract::failing("execution reverted: score too low"));

        request_loan(&page, Ok(contract.clone()), &|| {}).await;

        let page = page.borrow();
        assert_eq!(page.loan.amount, "2");
        assert_eq!(page.loan.duration_days, "10");
        assert_eq!(page.status().error(), Some("execution reverted: score too low"));
        assert_eq!(page.status().notice(), None);
        assert!(!page.status().loading());
    }

    #[tokio::test]
    async fn missing_contract_reports_not_initialized() {
        let page = page_with("1", "1", "");

        request_loan::<MockContract>(&page, Err(ContractError::NotInitialized), &|| {}).await;

        let page = page.borrow();
        assert_eq!(
            page.status().error(),
            Some("Contract not initialized. Please try again.")
        );
        assert_eq!(page.loan.amount, "1");
        assert!(!page.status().loading());
    }

    #[tokio::test]
    async fn invalid_duration_is_an_input_error() {
        let page = page_with("1", "1.5", "");
        let contract = Rc::new(MockContract::default());

        request_loan(&page, Ok(contract.clone()), &|| {}).await;

        assert!(contract.log().is_empty());
        assert!(page.borrow().status().error().unwrap().contains("whole number of days"));
    }

    #[tokio::test]
    async fn repayment_requires_loan_id() {
        let page = page_with("", "", "");
        let contract = Rc::new(MockContract::default());

        repay_loan(&page, Ok(contract.clone()), &|| {}).await;

        assert!(contract.log().is_empty());
        assert_eq!(page.borrow().status().error(), Some("Please enter a loan ID"));
    }

    #[tokio::test]
    async fn repayment_clears_loan_id_only() {
        let page = page_with("3", "4", "12");
        let contract = Rc::new(MockContract::default());

        repay_loan(&page, Ok(contract.clone()), &|| {}).await;

        assert_eq!(contract.log(), vec!["repay_loan(12)".to_owned()]);
        let page = page.borrow();
        assert_eq!(page.repay.loan_id, "");
        assert_eq!(page.loan.amount, "3");
        assert_eq!(page.status().notice(), Some(LOAN_REPAID));
    }

    #[tokio::test]
    async fn credit_score_needs_an_account() {
        let page = RefCell::new(BorrowerPage::default());
        let contract = Rc::new(MockContract::default());

        fetch_credit_score(&page, Ok(contract.clone()), None, &|| {}).await;

        assert!(contract.log().is_empty());
        assert_eq!(
            page.borrow().status().error(),
            Some("User address not available. Please connect your wallet.")
        );
        assert_eq!(page.borrow().credit_score(), None);
    }

    #[tokio::test]
    async fn credit_score_is_held_until_next_fetch() {
        let page = RefCell::new(BorrowerPage::default());
        let contract = Rc::new(MockContract::default());
        contract.credit_score.set(U256::from(640u64));

        fetch_credit_score(&page, Ok(contract.clone()), Some(ALICE), &|| {}).await;
        assert_eq!(page.borrow().credit_score(), Some(CreditScore(U256::from(640u64))));

        contract.credit_score.set(U256::from(700u64));
        fetch_credit_score(&page, Ok(contract.clone()), Some(ALICE), &|| {}).await;
        assert_eq!(page.borrow().credit_score(), Some(CreditScore(U256::from(700u64))));
        assert_eq!(contract.log().len(), 2);
    }

    #[tokio::test]
    async fn credit_score_keeps_unsubmitted_input() {
        let page = page_with("1.5", "30", "7");
        let contract = Rc::new(MockContract::default());
        let (redraw, seen) = recorder(&page, |p| (p.loan.clone(), p.repay.clone()));

        fetch_credit_score(&page, Ok(contract), Some(ALICE), &redraw).await;

        let expected = (
            LoanRequestForm {
                amount: "1.5".into(),
                duration_days: "30".into(),
            },
            RepayForm {
                loan_id: "7".into(),
            },
        );
        assert!(seen.borrow().iter().all(|forms| *forms == expected));
    }

    #[tokio::test]
    async fn completion_after_reset_is_dropped() {
        let page = page_with("1", "2", "");
        let request = page.borrow_mut().prepare_loan_request().unwrap();
        assert!(page.borrow().status().loading());

        page.borrow_mut().reset();
        let contract = MockContract::default();
        let outcome = contract.request_loan(request.amount, request.duration_secs).await;
        page.borrow_mut().finish_loan_request(request.ticket, outcome);

        let page = page.borrow();
        assert_eq!(page.status().notice(), None);
        assert!(!page.status().loading());
        assert_eq!(page.loan, LoanRequestForm::default());
    }
}
