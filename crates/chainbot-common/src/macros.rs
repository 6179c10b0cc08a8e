/// Convenience macro to dispatch a method call over the variants of an enum.
/// Example
/// ```rust
/// use chainbot_common::enum_dispatch;
///
/// pub enum Source {
///     Http(HttpSource),
///     Mock(MockSource)
/// }
///
/// impl Source {
///    pub fn fetch(&self) -> u64 {
///       enum_dispatch!(self {
///          Self::Http(x) |
///          Self::Mock(x) => x.fetch()
///       })
///    }
/// }
///
/// ```
#[macro_export]
macro_rules! enum_dispatch {
    ($self: ident { $($($variant: pat_param)|* => $do: expr),+ }) => {
        match $self {
            $(
                $($variant => $do),+
            ),+
        }
    };
}

/// Logs the error of a `Result` at error level and hands the value back unchanged.
#[macro_export]
macro_rules! log_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::service::tracing::error!("{}", e);
                Err(e)
            },
        }
    };
}

/// Logs the error of a `Result` at warn level and hands the value back unchanged.
#[macro_export]
macro_rules! warn_if_error {
    ($e: expr) => {
        match $e {
            Ok(v) => Ok(v),
            Err(e) => {
                $crate::service::tracing::warn!("{}", e);
                Err(e)
            },
        }
    };
}
