pub mod ledger;

pub use ledger::SavedLedger;
