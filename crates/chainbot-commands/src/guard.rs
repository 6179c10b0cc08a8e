use async_trait::async_trait;
use chainbot_common::metric;
use tracing::warn;

use crate::handler::{reject, Handler, HandlerUnit};
use crate::interaction::Invocation;
use crate::{Context, Error};

/// Runs the inner handler only for guild members holding the required role. The inner handler
/// keeps full control over the response of the invocation.
pub struct RoleGuard {
    required_role: Option<String>,
    inner: Box<Handler>,
}

impl RoleGuard {
    pub const FORBIDDEN: &'static str = "🔒 **Dev Mode only.** You need the Dev Mode role to use this command.\nAsk a server admin to assign it to you.";
    pub const NOT_CONFIGURED: &'static str = "⚠️ **Dev Mode role not configured.** This command is disabled until a server admin sets it up.";

    pub fn new(required_role: Option<String>, inner: Handler) -> Self {
        Self {
            required_role,
            inner: Box::new(inner),
        }
    }

    pub fn inner(&self) -> &Handler {
        &self.inner
    }

    fn holds(invocation: &dyn Invocation, role: &str) -> bool {
        invocation.member_roles().is_some_and(|roles| roles.iter().any(|x| x == role))
    }
}

#[async_trait]
impl HandlerUnit for RoleGuard {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let Some(role) = self.required_role.as_deref() else {
            warn!(handler = self.inner.name(), "required role is not configured");
            metric!(counter[guard_rejected] = 1, handler = self.inner.name(), reason = "unconfigured");

            return reject(invocation, Self::NOT_CONFIGURED).await;
        };

        if !Self::holds(invocation, role) {
            metric!(counter[guard_rejected] = 1, handler = self.inner.name(), reason = "forbidden");

            return reject(invocation, Self::FORBIDDEN).await;
        }

        self.inner.execute(context, invocation).await
    }
}
