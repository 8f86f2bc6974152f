//! Fixed value vocabularies for enumerated fields
//!
//! Membership is case-insensitive on input; accepted values are stored in
//! lower case. There is no ordering or transition graph between members.

/// A named, closed set of lower-case values.
#[derive(Debug, PartialEq, Eq)]
pub struct Vocabulary {
    name: &'static str,
    values: &'static [&'static str],
}

impl Vocabulary {
    pub const fn new(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, values }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn values(&self) -> &'static [&'static str] {
        self.values
    }

    /// Returns true if `value` is a member exactly as stored (lower case).
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// Lower-cases `raw` and returns it if it is a member.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let lower = raw.to_lowercase();
        self.contains(&lower).then_some(lower)
    }
}

/// Lifecycle of instruments, loans and loan balance entries
pub static LIFECYCLE_STATUS: Vocabulary = Vocabulary::new(
    "lifecycle status",
    &[
        "open",
        "sanctioned",
        "part disbursed",
        "disbursed",
        "part collected",
        "collected/settled",
        "overdue",
    ],
);

/// Receivables, payables, dealer finance
pub static PROGRAM_TYPE: Vocabulary = Vocabulary::new("program type", &["ar", "ap", "df"]);

pub static PROGRAM_EXPOSURE: Vocabulary =
    Vocabulary::new("program exposure", &["buyer", "seller"]);

pub static LOAN_BALANCE_TXN_TYPE: Vocabulary = Vocabulary::new(
    "loan balance transaction type",
    &["disbursement", "charges", "payment", "other changes"],
);

pub static TRANSACTION_TYPE: Vocabulary = Vocabulary::new(
    "transaction type",
    &["disbursement", "collection", "refund"],
);

/// Wallet-level postings recorded against a transaction balance
pub static LEDGER_TXN_TYPE: Vocabulary = Vocabulary::new(
    "ledger transaction type",
    &[
        "loan sanction",
        "disbursement",
        "charges",
        "repayment / collection",
        "margin refund",
        "interest refund",
        "tds",
        "penal charges",
        "cersai charges",
        "factor regn charges",
    ],
);
