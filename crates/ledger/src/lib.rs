//! DynamoDB audit ledger for table version cleanup.

pub mod config;
pub mod dynamo;
pub mod ledger;

pub use config::*;
pub use dynamo::DynamoLedger;
pub use ledger::*;
