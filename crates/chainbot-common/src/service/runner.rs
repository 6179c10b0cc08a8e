use std::time::Duration;

use log::{error, info};
use tokio::task::JoinSet;
use tokio::time;

use crate::service::{Error, Service};

/// Service manager used to spawn [`Service`] and manage their lifecycle. All the services
/// share the Tokio runtime the manager is running on.
pub struct TokioServiceManager<C> {
    context: C,
    restart_delay: Duration,

    services: JoinSet<()>,
}

impl<C> TokioServiceManager<C>
where
    C: 'static + Clone + Send,
{
    /// Create a new manager on the given context. The context will be cloned and passed
    /// to each service
    pub fn new(context: C) -> Self {
        Self {
            context,
            restart_delay: Duration::from_secs(5),
            services: JoinSet::new(),
        }
    }

    /// Delay between a service failure and its restart
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Spawn a new service on the manager, giving it the bound context. Service will be restarted in
    /// case they stop.
    pub fn spawn<T: Service<Context = C>>(&mut self)
    where
        T: Send + 'static,
    {
        let ctx = self.context.clone();
        let restart_delay = self.restart_delay;

        self.services.spawn(async move {
            loop {
                let service = T::new(ctx.clone()).await;

                info!(target: T::NAME, "starting service");
                match service.run().await {
                    Ok(()) => info!(target: T::NAME, "service stopped - restarting in {}ms", restart_delay.as_millis()),
                    Err(err) => error!(target: T::NAME, "service terminated with error {} - restarting in {}ms", err, restart_delay.as_millis()),
                }

                time::sleep(restart_delay).await;
            }
        });
    }

    /// Convenience method to spawn a service only if a condition is met.
    pub fn spawn_conditional<T: Service<Context = C>>(&mut self, condition: bool)
    where
        T: Send + 'static,
    {
        if condition {
            self.spawn::<T>()
        }
    }

    /// Wait for the services to run. Returns as soon as one of them panics.
    pub async fn wait(&mut self) -> Result<(), Error> {
        if self.services.join_next().await.is_some() {
            return Err(Error::new("service manager error"));
        }

        Ok(())
    }
}
