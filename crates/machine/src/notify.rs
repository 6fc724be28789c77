//! Jack-state notification fan-out.
//!
//! Three targets, notified in a fixed order on every broadcast: the
//! switch-class indicator, the user-space event sink, and the optional
//! product hook. Every target is attempted even when an earlier one fails —
//! partial delivery is acceptable because the state machine's own state,
//! not the notifications, is the source of truth.

use core::fmt::Write as _;

use platform::{EventSink, HeadsetHook, HeadsetState, StateIndicator};

/// Event name carried by every jack-state event.
pub const EVENT_NAME: &str = "headphone";

/// Fan-out dispatcher for headset state changes.
pub struct NotificationDispatcher<I, E, K> {
    indicator: I,
    events: E,
    hook: K,
}

impl<I, E, K> NotificationDispatcher<I, E, K>
where
    I: StateIndicator,
    E: EventSink,
    K: HeadsetHook,
{
    /// Create the dispatcher. Products without a callback pass
    /// [`platform::NoHook`].
    pub fn new(indicator: I, events: E, hook: K) -> Self {
        Self {
            indicator,
            events,
            hook,
        }
    }

    /// Broadcast a headset state to all three targets, best-effort.
    pub async fn broadcast(&mut self, state: HeadsetState) {
        let code = state.code();

        if let Err(_e) = self.indicator.set_state(code).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("indicator write failed for state code {}", code);
        }

        let mut payload: heapless::String<32> = heapless::String::new();
        // Capacity 32 cannot overflow for "STATE=<one digit>".
        let _ = write!(&mut payload, "STATE={code}");
        if let Err(_e) = self.events.emit(EVENT_NAME, &payload).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("state-change event emit failed for state code {}", code);
        }

        if let Err(_e) = self.hook.on_state(code) {
            #[cfg(feature = "defmt")]
            defmt::warn!("product headset hook failed for state code {}", code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{Call, CallLog, MockEventSink, MockHook, MockIndicator};
    use platform::NoHook;

    #[tokio::test]
    async fn broadcast_hits_all_three_targets_in_order() {
        let log = CallLog::new();
        let mut dispatcher = NotificationDispatcher::new(
            MockIndicator::new(&log),
            MockEventSink::new(&log),
            MockHook::new(&log),
        );

        dispatcher.broadcast(HeadsetState::HeadsetWithMic).await;

        let calls = log.snapshot();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls.first(), Some(Call::IndicatorState(1))));
        assert!(matches!(
            calls.get(1),
            Some(Call::EmitEvent { name: "headphone", payload }) if payload.as_str() == "STATE=1"
        ));
        assert!(matches!(calls.get(2), Some(Call::HookState(1))));
    }

    #[tokio::test]
    async fn indicator_failure_does_not_stop_delivery() {
        let log = CallLog::new();
        let mut indicator = MockIndicator::new(&log);
        indicator.fails = true;
        let mut dispatcher =
            NotificationDispatcher::new(indicator, MockEventSink::new(&log), MockHook::new(&log));

        dispatcher.broadcast(HeadsetState::Absent).await;

        assert_eq!(log.count_matching(|c| matches!(c, Call::EmitEvent { .. })), 1);
        assert_eq!(log.count_matching(|c| matches!(c, Call::HookState(0))), 1);
    }

    #[tokio::test]
    async fn hook_failure_is_swallowed() {
        let log = CallLog::new();
        let mut hook = MockHook::new(&log);
        hook.fails = true;
        let mut dispatcher =
            NotificationDispatcher::new(MockIndicator::new(&log), MockEventSink::new(&log), hook);

        // Must not panic or propagate.
        dispatcher.broadcast(HeadsetState::HeadsetWithoutMic).await;
        assert_eq!(log.count_matching(|c| matches!(c, Call::HookState(2))), 1);
    }

    #[tokio::test]
    async fn no_hook_products_broadcast_two_targets() {
        let log = CallLog::new();
        let mut dispatcher = NotificationDispatcher::new(
            MockIndicator::new(&log),
            MockEventSink::new(&log),
            NoHook,
        );

        dispatcher.broadcast(HeadsetState::HeadsetWithoutMic).await;

        let calls = log.snapshot();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls.first(), Some(Call::IndicatorState(2))));
    }
}
