//! Application state shared by every event handler.
//!
//! WASM is single-threaded: handlers hold an `Rc<App>` and borrow the
//! `RefCell`s in short phases, never across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use dcs_dashboard::{BorrowerPage, LenderPage};
use dcs_session::WalletSession;

use crate::dom::Elements;
use crate::provider::Eip1193Provider;

pub type Session = WalletSession<Eip1193Provider>;

pub struct App {
    pub els: Elements,
    pub session: RefCell<Session>,
    pub borrower: RefCell<BorrowerPage>,
    pub lender: RefCell<LenderPage>,
}

impl App {
    pub fn new(els: Elements, session: Session) -> Rc<App> {
        Rc::new(App {
            els,
            session: RefCell::new(session),
            borrower: RefCell::new(BorrowerPage::default()),
            lender: RefCell::new(LenderPage::default()),
        })
    }

    /// Drop all session-derived page state, including in-flight results.
    pub fn reset_pages(&self) {
        self.borrower.borrow_mut().reset();
        self.lender.borrow_mut().reset();
    }
}
