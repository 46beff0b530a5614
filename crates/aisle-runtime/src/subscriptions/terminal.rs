use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Identity marker for the terminal input subscription.
pub struct TerminalEvents;

/// Subscribe to terminal input, mapping each event through `map`.
///
/// Return `None` from `map` to drop an event. The crossterm stream is created
/// inside the spawned task: creating it eagerly on every `subscriptions()`
/// call would poke crossterm's global reader while the live stream polls it.
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            tokio::spawn(async move {
                let mut events = EventStream::new();
                while let Some(result) = events.next().await {
                    let event = match result {
                        Ok(event) => TerminalEvent::from(event),
                        Err(err) => {
                            tracing::warn!(error = %err, "terminal event stream error");
                            continue;
                        }
                    };
                    if let Some(msg) = map(event) {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            })
            .abort_handle()
        }),
    }
}
