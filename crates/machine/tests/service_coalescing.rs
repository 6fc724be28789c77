//! Timing behaviour of the async services: debounce and resume-settle
//! coalescing.
//!
//! These tests run against the embassy-time std driver, so the windows are
//! real wall-clock delays (default 150 ms debounce / 200 ms settle).

#![allow(clippy::unwrap_used)]

use core::cell::Cell;

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Timer;

use machine::{tasks, CardHardware, CodecMachine, MachineEvents};
use platform::mocks::{
    Call, CallLog, MockCodec, MockDapm, MockEventSink, MockHook, MockHostDai, MockIndicator,
    MockJackPin, MockMclk,
};
use platform::{MachineConfig, TriggerCommand};

struct Fixture {
    log: CallLog,
    level: Cell<bool>,
    mic: Cell<bool>,
    events: MachineEvents,
}

impl Fixture {
    fn new() -> Self {
        Self {
            log: CallLog::new(),
            level: Cell::new(false),
            mic: Cell::new(false),
            events: MachineEvents::new(),
        }
    }
}

macro_rules! build_machine {
    ($fx:expr) => {
        CodecMachine::new(
            MachineConfig::default(),
            &$fx.events,
            CardHardware {
                jack_pin: MockJackPin::new(true, &$fx.level),
                codec: MockCodec::new(&$fx.log, &$fx.mic),
                dapm: MockDapm::new(&$fx.log),
                mclk: MockMclk::new(&$fx.log),
                dai: MockHostDai::new(&$fx.log),
            },
            MockIndicator::new(&$fx.log),
            MockEventSink::new(&$fx.log),
            MockHook::new(&$fx.log),
        )
    };
}

#[tokio::test]
async fn two_resumes_inside_the_settle_window_coalesce() {
    let fx = Fixture::new();
    let machine = Mutex::<CriticalSectionRawMutex, _>::new(build_machine!(fx));
    machine.lock().await.init().await.unwrap();
    fx.log.clear();

    let driver = async {
        machine.lock().await.on_trigger(TriggerCommand::Resume);
        Timer::after_millis(50).await;
        machine.lock().await.on_trigger(TriggerCommand::Resume);
        // Past the 200 ms settle window plus margin for the evaluation.
        Timer::after_millis(400).await;
    };
    select(tasks::resume_service(&fx.events, &machine), driver).await;

    // Exactly one forced re-evaluation → one broadcast of the (unchanged)
    // absent state.
    assert_eq!(fx.log.count_matching(|c| matches!(c, Call::IndicatorState(0))), 1);
}

#[tokio::test]
async fn resumes_in_separate_windows_each_reevaluate() {
    let fx = Fixture::new();
    let machine = Mutex::<CriticalSectionRawMutex, _>::new(build_machine!(fx));
    machine.lock().await.init().await.unwrap();
    fx.log.clear();

    let driver = async {
        machine.lock().await.on_trigger(TriggerCommand::Resume);
        Timer::after_millis(300).await;
        machine.lock().await.on_trigger(TriggerCommand::Resume);
        Timer::after_millis(300).await;
    };
    select(tasks::resume_service(&fx.events, &machine), driver).await;

    assert_eq!(fx.log.count_matching(|c| matches!(c, Call::IndicatorState(0))), 2);
}

#[tokio::test]
async fn pin_bounces_inside_the_debounce_window_evaluate_once() {
    let fx = Fixture::new();
    let machine = Mutex::<CriticalSectionRawMutex, _>::new(build_machine!(fx));
    machine.lock().await.init().await.unwrap();
    fx.log.clear();

    let driver = async {
        // A plug insertion with contact bounce: three edges in quick
        // succession, level stable high by the time the window closes.
        fx.level.set(true);
        fx.events.pin_changed();
        Timer::after_millis(10).await;
        fx.events.pin_changed();
        Timer::after_millis(10).await;
        fx.events.pin_changed();
        // Past the 150 ms debounce window plus margin.
        Timer::after_millis(350).await;
    };
    select(tasks::jack_service(&fx.events, &machine), driver).await;

    assert_eq!(fx.log.count_matching(|c| matches!(c, Call::IndicatorState(2))), 1);
    assert_eq!(fx.log.count_matching(|c| matches!(c, Call::MicProbe)), 1);
}

#[tokio::test]
async fn resume_without_detect_capability_does_not_schedule() {
    let fx = Fixture::new();
    let config = MachineConfig {
        mic_wired: false,
        ..MachineConfig::default()
    };
    let machine = Mutex::<CriticalSectionRawMutex, _>::new(CodecMachine::new(
        config,
        &fx.events,
        CardHardware {
            jack_pin: MockJackPin::new(false, &fx.level),
            codec: MockCodec::new(&fx.log, &fx.mic),
            dapm: MockDapm::new(&fx.log),
            mclk: MockMclk::new(&fx.log),
            dai: MockHostDai::new(&fx.log),
        },
        MockIndicator::new(&fx.log),
        MockEventSink::new(&fx.log),
        MockHook::new(&fx.log),
    ));
    machine.lock().await.init().await.unwrap();
    fx.log.clear();

    let driver = async {
        machine.lock().await.on_trigger(TriggerCommand::Resume);
        Timer::after_millis(300).await;
    };
    select(tasks::resume_service(&fx.events, &machine), driver).await;

    // No detect pin and no mic pin: resume must not schedule anything.
    assert_eq!(fx.log.snapshot().len(), 0);
}
