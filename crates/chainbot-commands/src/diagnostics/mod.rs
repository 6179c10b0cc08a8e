//! Heuristic classification of chain failures.
//!
//! A [`Diagnoser`] holds an ordered list of [`DiagnosisRule`]s. Each rule inspects the
//! [`DiagnosticContext`] of a failed call on its own and may produce one [`DiagnosisEntry`].
//! Rules are not exclusive: every matching rule contributes an entry, in registration order.
//! When nothing matches, a single fallback entry carries the raw error message.
//!
//! ```ignore
//! let diagnoser = Diagnoser::new(registry);
//!
//! let context = DiagnosticContext::new("insufficient funds for gas").with_network("sepolia");
//! let text = render(&diagnoser.diagnose(&context));
//! ```

mod context;
mod diagnoser;
mod entry;
mod rules;

pub use context::DiagnosticContext;
pub use diagnoser::Diagnoser;
pub use entry::{render, DiagnosisEntry, IssueCategory};
pub use rules::{ContractNotDeployedRule, DiagnosisRule, InsufficientFundsRule, MissingApprovalRule, NonceMismatchRule, RpcConnectionRule, WrongNetworkRule};
