mod mock_ledger;
mod mock_ledger_client;
mod topic;

pub use crate::{
    mock_ledger::MockLedger,
    mock_ledger_client::MockLedgerClient,
    topic::{DIDState, Topic},
};
