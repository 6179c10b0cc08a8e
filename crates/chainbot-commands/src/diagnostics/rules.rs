//! Keyword rules recognising the usual causes of a failed chain call.

use std::sync::Arc;

use chainbot_evm::NetworkRegistry;

use crate::diagnostics::{DiagnosisEntry, DiagnosticContext, IssueCategory};

pub trait DiagnosisRule: Send + Sync {
    fn category(&self) -> IssueCategory;

    /// Produces an entry when the failure matches the rule
    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry>;
}

pub struct WrongNetworkRule;

impl WrongNetworkRule {
    pub const KEYWORDS: &'static [&'static str] = &["chain", "network", "chainid"];
}

impl DiagnosisRule for WrongNetworkRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::WrongNetwork
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        if !context.error_contains_any(Self::KEYWORDS) {
            return None;
        }

        let fix = match &context.expected_network {
            Some(network) => format!("Expected network: {}", network),
            None => "Verify your wallet is connected to the correct chain.".to_string(),
        };

        Some(DiagnosisEntry::new(
            self.category(),
            "🔗 Wrong Network",
            "The transaction was sent to the wrong chain. Double-check your MetaMask network or RPC endpoint.",
            fix,
        ))
    }
}

/// Points to the faucet of the failing network when one is configured
pub struct InsufficientFundsRule {
    registry: Arc<NetworkRegistry>,
}

impl InsufficientFundsRule {
    pub const KEYWORDS: &'static [&'static str] = &["insufficient", "underpriced", "balance"];

    pub fn new(registry: Arc<NetworkRegistry>) -> Self {
        Self { registry }
    }

    fn faucet(&self, context: &DiagnosticContext) -> Option<&str> {
        let key = context.network_key.as_deref()?;

        self.registry.lookup(key)?.faucet_url.as_deref()
    }
}

impl DiagnosisRule for InsufficientFundsRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::InsufficientFunds
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        if !context.error_contains_any(Self::KEYWORDS) {
            return None;
        }

        let fix = match self.faucet(context) {
            Some(faucet) => format!("Get testnet tokens here: {}", faucet),
            None => "Fund your wallet or request tokens from a faucet.".to_string(),
        };

        Some(DiagnosisEntry::new(
            self.category(),
            "⛽ Insufficient Funds / Gas",
            "Your wallet does not have enough funds to cover gas fees.",
            fix,
        ))
    }
}

pub struct ContractNotDeployedRule;

impl ContractNotDeployedRule {
    pub const KEYWORDS: &'static [&'static str] = &["not deployed", "no code", "execution reverted"];
}

impl DiagnosisRule for ContractNotDeployedRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::ContractNotDeployed
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        context.error_contains_any(Self::KEYWORDS).then(|| {
            DiagnosisEntry::new(
                self.category(),
                "📦 Contract Not Deployed",
                "The contract address has no deployed code on this network.",
                "Ensure the contract is deployed to the correct chain and the address is accurate.",
            )
        })
    }
}

pub struct MissingApprovalRule;

impl MissingApprovalRule {
    pub const KEYWORDS: &'static [&'static str] = &["allowance", "approval", "not approved"];
}

impl DiagnosisRule for MissingApprovalRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::MissingApproval
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        context.error_contains_any(Self::KEYWORDS).then(|| {
            DiagnosisEntry::new(
                self.category(),
                "✅ Missing Approval",
                "The contract is not approved to spend your tokens.",
                "Call the token's approve() function before interacting with the contract.",
            )
        })
    }
}

pub struct RpcConnectionRule;

impl RpcConnectionRule {
    // "network" is shared with WrongNetworkRule, both entries are reported
    pub const KEYWORDS: &'static [&'static str] = &["timeout", "network", "connect", "request failed"];
}

impl DiagnosisRule for RpcConnectionRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::RpcConnection
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        context.error_contains_any(Self::KEYWORDS).then(|| {
            DiagnosisEntry::new(
                self.category(),
                "📡 RPC Connection Failed",
                "Could not reach the RPC endpoint.",
                "The RPC may be down or rate-limited. Try a different endpoint or provider.",
            )
        })
    }
}

pub struct NonceMismatchRule;

impl NonceMismatchRule {
    pub const KEYWORDS: &'static [&'static str] = &["nonce", "replacement"];
}

impl DiagnosisRule for NonceMismatchRule {
    fn category(&self) -> IssueCategory {
        IssueCategory::NonceMismatch
    }

    fn try_diagnose(&self, context: &DiagnosticContext) -> Option<DiagnosisEntry> {
        context.error_contains_any(Self::KEYWORDS).then(|| {
            DiagnosisEntry::new(
                self.category(),
                "🔢 Nonce Mismatch",
                "A pending transaction is blocking this one.",
                "Wait for pending transactions to confirm, or cancel them in your wallet.",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use chainbot_evm::{Endpoints, NetworkRegistry};

    use super::*;

    fn registry() -> Arc<NetworkRegistry> {
        Arc::new(NetworkRegistry::ethereum(&Endpoints {
            sepolia_faucet_url: Some("https://sepoliafaucet.com".to_string()),
            ..Endpoints::default()
        }))
    }

    mod wrong_network {
        use super::*;

        #[test]
        fn should_mention_expected_network_when_known() {
            // Given
            let context = DiagnosticContext::new("ChainId mismatch").with_expected_network("Sepolia Testnet");

            // When
            let entry = WrongNetworkRule.try_diagnose(&context).unwrap();

            // Then
            assert_eq!(entry.category, IssueCategory::WrongNetwork);
            assert_eq!(entry.fix, "Expected network: Sepolia Testnet");
        }

        #[test]
        fn should_give_generic_fix_otherwise() {
            let entry = WrongNetworkRule.try_diagnose(&DiagnosticContext::new("invalid chain")).unwrap();

            assert_eq!(entry.fix, "Verify your wallet is connected to the correct chain.");
        }
    }

    mod insufficient_funds {
        use super::*;

        #[test]
        fn should_reference_faucet_of_the_network() {
            // Given
            let rule = InsufficientFundsRule::new(registry());
            let context = DiagnosticContext::new("insufficient funds for gas * price + value").with_network("sepolia");

            // When
            let entry = rule.try_diagnose(&context).unwrap();

            // Then
            assert_eq!(entry.fix, "Get testnet tokens here: https://sepoliafaucet.com");
        }

        #[test]
        fn should_give_generic_fix_without_faucet() {
            let rule = InsufficientFundsRule::new(registry());

            for context in [
                DiagnosticContext::new("insufficient funds").with_network("mainnet"),
                DiagnosticContext::new("insufficient funds").with_network("baseSepolia"),
                DiagnosticContext::new("insufficient funds").with_network("unknown"),
                DiagnosticContext::new("insufficient funds"),
            ] {
                let entry = rule.try_diagnose(&context).unwrap();

                assert_eq!(entry.fix, "Fund your wallet or request tokens from a faucet.");
            }
        }

        #[test]
        fn should_match_underpriced_and_balance() {
            let rule = InsufficientFundsRule::new(registry());

            assert!(rule.try_diagnose(&DiagnosticContext::new("transaction underpriced")).is_some());
            assert!(rule.try_diagnose(&DiagnosticContext::new("Balance too low")).is_some());
            assert!(rule.try_diagnose(&DiagnosticContext::new("nonce too low")).is_none());
        }
    }

    mod keyword_rules {
        use super::*;

        #[test]
        fn should_match_their_own_keywords_only() {
            let cases: Vec<(Box<dyn DiagnosisRule>, &str, &str)> = vec![
                (Box::new(ContractNotDeployedRule), "execution reverted", "allowance exceeded"),
                (Box::new(ContractNotDeployedRule), "no code at address", "nonce too low"),
                (Box::new(MissingApprovalRule), "ERC20: insufficient allowance", "execution reverted"),
                (Box::new(MissingApprovalRule), "token not approved", "timeout"),
                (Box::new(RpcConnectionRule), "error sending request: connection refused", "nonce too low"),
                (Box::new(RpcConnectionRule), "Request timeout", "execution reverted"),
                (Box::new(NonceMismatchRule), "replacement transaction underpriced", "timeout"),
                (Box::new(NonceMismatchRule), "nonce too low", "execution reverted"),
            ];

            for (rule, matching, other) in cases {
                assert!(rule.try_diagnose(&DiagnosticContext::new(matching)).is_some(), "{} should match {}", rule.category(), matching);
                assert!(rule.try_diagnose(&DiagnosticContext::new(other)).is_none(), "{} should not match {}", rule.category(), other);
            }
        }
    }
}
