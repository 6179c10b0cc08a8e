//! Rule registry orchestrating the classification of failures.

use std::sync::Arc;

use chainbot_common::metric;
use chainbot_evm::NetworkRegistry;
use tracing::warn;

use crate::diagnostics::rules::{ContractNotDeployedRule, DiagnosisRule, InsufficientFundsRule, MissingApprovalRule, NonceMismatchRule, RpcConnectionRule, WrongNetworkRule};
use crate::diagnostics::{DiagnosisEntry, DiagnosticContext, IssueCategory};

/// Registry of rules applied, in order, to every failure.
#[derive(Clone)]
pub struct Diagnoser {
    rules: Vec<Arc<dyn DiagnosisRule>>,
}

impl Diagnoser {
    /// Creates a diagnoser with every known rule, in this order: wrong network, insufficient
    /// funds, contract not deployed, missing approval, RPC connection, nonce mismatch.
    pub fn new(registry: Arc<NetworkRegistry>) -> Self {
        Self::with_rules(vec![
            Arc::new(WrongNetworkRule),
            Arc::new(InsufficientFundsRule::new(registry)),
            Arc::new(ContractNotDeployedRule),
            Arc::new(MissingApprovalRule),
            Arc::new(RpcConnectionRule),
            Arc::new(NonceMismatchRule),
        ])
    }

    pub fn with_rules(rules: Vec<Arc<dyn DiagnosisRule>>) -> Self {
        Self { rules }
    }

    /// Classifies the failure. The result is never empty.
    pub fn diagnose(&self, context: &DiagnosticContext) -> Vec<DiagnosisEntry> {
        let mut entries: Vec<_> = self.rules.iter().filter_map(|x| x.try_diagnose(context)).collect();
        if entries.is_empty() {
            entries.push(Self::fallback(context));
        }

        for entry in &entries {
            metric!(counter[diagnosis_issued] = 1, category = entry.category.as_str());
        }

        warn!(
            network = context.network_key.as_deref().unwrap_or_default(),
            error = %context.error_message,
            categories = ?entries.iter().map(|x| x.category.as_str()).collect::<Vec<_>>(),
            "chain call failed"
        );

        entries
    }

    fn fallback(context: &DiagnosticContext) -> DiagnosisEntry {
        let detail = match context.error_message.as_str() {
            "" => "An unrecognized error occurred.",
            message => message,
        };

        DiagnosisEntry::new(IssueCategory::Unknown, "❓ Unknown Error", detail, "Check the console for full error details or report it.")
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use chainbot_evm::Endpoints;

    use super::*;

    fn diagnoser() -> Diagnoser {
        Diagnoser::new(Arc::new(NetworkRegistry::ethereum(&Endpoints {
            sepolia_faucet_url: Some("https://sepoliafaucet.com".to_string()),
            ..Endpoints::default()
        })))
    }

    fn categories(entries: &[DiagnosisEntry]) -> Vec<IssueCategory> {
        entries.iter().map(|x| x.category).collect()
    }

    mod new {
        use super::*;

        #[test]
        fn should_register_every_rule() {
            assert_eq!(diagnoser().rule_count(), 6);
        }
    }

    mod diagnose {
        use super::*;

        #[test]
        fn should_diagnose_insufficient_funds_with_faucet() {
            // Given
            let context = DiagnosticContext::new("insufficient funds for gas * price + value").with_network("sepolia");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(categories(&entries), vec![IssueCategory::InsufficientFunds]);
            assert!(entries[0].fix.contains("https://sepoliafaucet.com"));
        }

        #[test]
        fn should_diagnose_insufficient_funds_without_faucet() {
            // Given
            let context = DiagnosticContext::new("Insufficient funds").with_network("mainnet");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(categories(&entries), vec![IssueCategory::InsufficientFunds]);
            assert_eq!(entries[0].fix, "Fund your wallet or request tokens from a faucet.");
        }

        #[test]
        fn should_fall_back_to_raw_message_verbatim() {
            // Given
            let context = DiagnosticContext::new("Something Odd happened: 0xdeadbeef").with_network("sepolia");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].category, IssueCategory::Unknown);
            assert_eq!(entries[0].issue, "❓ Unknown Error");
            assert_eq!(entries[0].detail, "Something Odd happened: 0xdeadbeef");
        }

        #[test]
        fn should_fall_back_to_generic_detail_for_empty_message() {
            let entries = diagnoser().diagnose(&DiagnosticContext::new(""));

            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].detail, "An unrecognized error occurred.");
        }

        #[test]
        fn should_report_every_matching_rule_in_declaration_order() {
            // Given
            let context = DiagnosticContext::new("timeout while fetching nonce");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(categories(&entries), vec![IssueCategory::RpcConnection, IssueCategory::NonceMismatch]);
        }

        #[test]
        fn should_report_both_entries_for_overlapping_keyword() {
            // Given
            let context = DiagnosticContext::new("could not detect network");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(categories(&entries), vec![IssueCategory::WrongNetwork, IssueCategory::RpcConnection]);
        }

        #[test]
        fn should_never_merge_entries() {
            // Given
            let context = DiagnosticContext::new("network error: insufficient balance, execution reverted: allowance, nonce");

            // When
            let entries = diagnoser().diagnose(&context);

            // Then
            assert_eq!(
                categories(&entries),
                vec![
                    IssueCategory::WrongNetwork,
                    IssueCategory::InsufficientFunds,
                    IssueCategory::ContractNotDeployed,
                    IssueCategory::MissingApproval,
                    IssueCategory::RpcConnection,
                    IssueCategory::NonceMismatch,
                ]
            );
        }

        #[test]
        fn should_use_registered_rules_only() {
            // Given
            let diagnoser = Diagnoser::with_rules(vec![Arc::new(NonceMismatchRule)]);

            // When
            let entries = diagnoser.diagnose(&DiagnosticContext::new("Request timeout"));

            // Then
            assert_eq!(categories(&entries), vec![IssueCategory::Unknown]);
        }
    }
}
