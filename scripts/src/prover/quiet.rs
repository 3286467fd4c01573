use std::future::Future;

use tracing::instrument::WithSubscriber;
use tracing::subscriber::NoSubscriber;

/// Runs `fut` with a dispatcher that drops every span and event.
///
/// The discard dispatcher is only installed while `fut` is being polled. The
/// previous one is reinstated when each poll returns or unwinds, so logging is
/// back in place however the future finishes.
pub async fn muted<F: Future>(fut: F) -> F::Output {
    fut.with_subscriber(NoSubscriber::default()).await
}
