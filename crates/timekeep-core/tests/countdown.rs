//! Countdown sessions driven on a paused tokio clock.

use std::time::Duration;
use timekeep_core::{CoreError, CountdownSession, Durations, Phase, Preset, Tick, TickStream};
use tokio::time::Instant;

async fn collect(stream: &mut TickStream) -> Vec<(Tick, Duration)> {
    let started = Instant::now();
    let mut ticks = Vec::new();
    while let Some(tick) = stream.next().await {
        ticks.push((tick, started.elapsed()));
    }
    ticks
}

#[tokio::test(start_paused = true)]
async fn custom_session_emits_every_second_then_finishes() {
    let session = CountdownSession::new();
    let mut stream = session.start(Durations::new(3, 2).unwrap()).unwrap();
    let ticks = collect(&mut stream).await;

    let observed: Vec<_> = ticks
        .iter()
        .map(|(t, _)| (t.phase, t.remaining_secs))
        .collect();
    assert_eq!(
        observed,
        vec![
            (Phase::Focusing, 3),
            (Phase::Focusing, 2),
            (Phase::Focusing, 1),
            (Phase::Focusing, 0),
            (Phase::OnBreak, 2),
            (Phase::OnBreak, 1),
            (Phase::OnBreak, 0),
            (Phase::Finished, 0),
        ]
    );

    for (n, (_, at)) in ticks.iter().enumerate() {
        assert_eq!(*at, Duration::from_secs(n as u64), "tick {n}");
    }
    assert_eq!(session.phase(), Phase::Finished);
}

#[tokio::test(start_paused = true)]
async fn short_preset_lasts_thirty_minutes() {
    let session = CountdownSession::new();
    let mut stream = session.start(Preset::Short).unwrap();
    let ticks = collect(&mut stream).await;

    // One tick per second of each phase, plus a zero tick per phase and the
    // closing Finished tick.
    assert_eq!(ticks.len(), 25 * 60 + 1 + 5 * 60 + 1 + 1);
    assert_eq!(ticks[0].0, Tick::new(Phase::Focusing, 1500));
    assert_eq!(
        ticks.iter().filter(|(t, _)| t.phase == Phase::OnBreak).count(),
        301
    );

    let focus: Vec<_> = ticks
        .iter()
        .filter(|(t, _)| t.phase == Phase::Focusing)
        .map(|(t, _)| t.remaining_secs)
        .collect();
    assert!(focus.windows(2).all(|w| w[0] == w[1] + 1));
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_focus_stops_the_stream() {
    let session = CountdownSession::new();
    let mut stream = session.start(Durations::new(3, 2).unwrap()).unwrap();

    let mut seen = Vec::new();
    while let Some(tick) = stream.next().await {
        seen.push(tick);
        if tick == Tick::new(Phase::Focusing, 2) {
            session.cancel();
        }
    }

    assert_eq!(
        seen,
        vec![Tick::new(Phase::Focusing, 3), Tick::new(Phase::Focusing, 2)]
    );
    assert_eq!(session.phase(), Phase::Cancelled);

    // Nothing shows up later either.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(stream.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn buffered_ticks_are_dropped_on_cancel() {
    let session = CountdownSession::new();
    let mut stream = session.start(Durations::new(3, 2).unwrap()).unwrap();

    // Three ticks pile up unread before the cancel.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    session.cancel();

    assert_eq!(session.phase(), Phase::Cancelled);
    assert_eq!(stream.next().await, None);
    assert_eq!(stream.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_break() {
    let session = CountdownSession::new();
    let mut stream = session.start(Durations::new(1, 5).unwrap()).unwrap();

    while let Some(tick) = stream.next().await {
        if tick.phase == Phase::OnBreak {
            session.cancel();
        }
    }
    assert_eq!(session.phase(), Phase::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn cancel_without_start_is_a_noop() {
    let session = CountdownSession::new();
    session.cancel();
    assert_eq!(session.phase(), Phase::Idle);

    let mut stream = session.start(Durations::new(1, 1).unwrap()).unwrap();
    assert_eq!(stream.next().await, Some(Tick::new(Phase::Focusing, 1)));
}

#[tokio::test(start_paused = true)]
async fn finished_session_cannot_restart() {
    let session = CountdownSession::new();
    let mut stream = session.start(Durations::new(1, 1).unwrap()).unwrap();
    collect(&mut stream).await;

    session.cancel();
    assert_eq!(session.phase(), Phase::Finished);
    assert!(matches!(
        session.start(Durations::new(1, 1).unwrap()),
        Err(CoreError::SessionActive)
    ));
}
