use std::fmt;

/// Category of a diagnosis, for filtering and aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
    WrongNetwork,
    InsufficientFunds,
    ContractNotDeployed,
    MissingApproval,
    RpcConnection,
    NonceMismatch,
    Unknown,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WrongNetwork => "wrong_network",
            Self::InsufficientFunds => "insufficient_funds",
            Self::ContractNotDeployed => "contract_not_deployed",
            Self::MissingApproval => "missing_approval",
            Self::RpcConnection => "rpc_connection",
            Self::NonceMismatch => "nonce_mismatch",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One explanation of a failure together with a suggested fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisEntry {
    pub category: IssueCategory,

    /// Short label, prefixed with an emoji
    pub issue: String,
    pub detail: String,
    pub fix: String,
}

impl DiagnosisEntry {
    pub fn new(category: IssueCategory, issue: impl Into<String>, detail: impl Into<String>, fix: impl Into<String>) -> Self {
        Self {
            category,
            issue: issue.into(),
            detail: detail.into(),
            fix: fix.into(),
        }
    }

    /// Renders the entry as a quoted block
    pub fn render(&self) -> String {
        format!("{}\n> {}\n> 🔧 {}", self.issue, self.detail, self.fix)
    }
}

/// Renders every entry, in order, separated by a blank line
pub fn render(entries: &[DiagnosisEntry]) -> String {
    entries.iter().map(DiagnosisEntry::render).collect::<Vec<_>>().join("\n\n")
}
