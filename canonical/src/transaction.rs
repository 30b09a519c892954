use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::TransactionStatus;
use crate::Fee;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub id: Option<String>,
    pub txid: Option<String>,
    pub kind: Option<TransactionType>,
    pub currency: Option<String>,
    pub network: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub amount: Option<Decimal>,
    pub fee: Option<Fee>,
    pub status: Option<TransactionStatus>,
    pub timestamp: Option<i64>,
    pub updated: Option<i64>,
    /// Set when the exchange reports an internal transfer.
    pub internal: Option<bool>,
    pub comment: Option<String>,
}
