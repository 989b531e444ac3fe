// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use onceflight::{SensorError, TaskFlight};
use onceflight_test_utils::ScriptedSensor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Suspend until the scripted sensor has started `expected` acquisitions.
async fn acquisitions_reach(flight: &TaskFlight<ScriptedSensor>, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while flight.sensor().acquisitions() < expected {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("sensor never started the expected acquisition");
}

#[tokio::test]
async fn concurrent_tasks_share_one_acquisition() -> anyhow::Result<()> {
    // Arrange
    let (sensor, gate) = ScriptedSensor::new("cam").push_ok(b"frame-1").gated();
    let flight = TaskFlight::new(sensor);

    // Act - five tasks pile up while the acquisition is held open
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let flight = flight.clone();
            tokio::spawn(async move { flight.coalesced_read().await })
        })
        .collect();

    acquisitions_reach(&flight, 1).await;
    sleep(Duration::from_millis(100)).await;
    gate.open();

    // Assert
    for handle in handles {
        let measurement = handle.await??;
        assert_eq!(measurement.as_bytes(), b"frame-1");
    }
    assert_eq!(flight.sensor().acquisitions(), 1);
    Ok(())
}

#[tokio::test]
async fn sequential_reads_each_start_a_fresh_round() -> anyhow::Result<()> {
    let sensor = ScriptedSensor::new("cam")
        .push_ok(b"frame-1")
        .push_ok(b"frame-2")
        .push_ok(b"frame-3");
    let flight = TaskFlight::new(sensor);

    for expected in [b"frame-1", b"frame-2", b"frame-3"] {
        let measurement = flight.coalesced_read().await?;
        assert_eq!(measurement.as_bytes(), expected);
    }

    assert_eq!(flight.sensor().acquisitions(), 3);
    Ok(())
}

#[tokio::test]
async fn next_round_serves_the_next_frame() -> anyhow::Result<()> {
    // Arrange
    let (sensor, gate) = ScriptedSensor::new("cam")
        .push_ok(b"frame-1")
        .push_ok(b"frame-2")
        .gated();
    let flight = TaskFlight::new(sensor);

    // Act - five tasks join round one before its acquisition completes
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let flight = flight.clone();
            tokio::spawn(async move { flight.coalesced_read().await })
        })
        .collect();

    acquisitions_reach(&flight, 1).await;
    sleep(Duration::from_millis(100)).await;
    gate.open();

    for handle in handles {
        assert_eq!(handle.await??.as_bytes(), b"frame-1");
    }

    // A sixth caller after round one closed starts round two.
    gate.open();
    let measurement = flight.coalesced_read().await?;

    // Assert
    assert_eq!(measurement.as_bytes(), b"frame-2");
    assert_eq!(flight.sensor().acquisitions(), 2);
    Ok(())
}

#[tokio::test]
async fn reader_failure_reaches_every_caller_and_resets() -> anyhow::Result<()> {
    // Spec scenario: the acquisition takes 100ms and then fails; a fresh
    // read issued 200ms later succeeds on a new round.
    let sensor = ScriptedSensor::new("cam")
        .with_latency(Duration::from_millis(100))
        .push_err("hot pixel storm")
        .push_ok(b"frame-2");
    let flight = TaskFlight::new(sensor);

    let waiter = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    let error = flight
        .coalesced_read()
        .await
        .expect_err("first round should fail");
    assert!(matches!(error, SensorError::Acquisition { .. }));

    // The waiter of the failed round sees the same error, not stale data.
    let waiter_error = waiter.await?.expect_err("waiter should see the failure");
    assert_eq!(waiter_error, error);

    sleep(Duration::from_millis(200)).await;
    let measurement = flight.coalesced_read().await?;
    assert_eq!(measurement.as_bytes(), b"frame-2");
    assert_eq!(flight.sensor().acquisitions(), 2);
    Ok(())
}

#[tokio::test]
async fn scheduler_stays_runnable_while_a_round_is_in_flight() -> anyhow::Result<()> {
    // Single scheduler thread (tokio::test default): if the acquisition ran
    // inline instead of on a blocking worker, the side task could not tick.
    let sensor = ScriptedSensor::new("cam")
        .with_latency(Duration::from_millis(200))
        .push_ok(b"frame-1");
    let flight = TaskFlight::new(sensor);

    let ticks = Arc::new(AtomicUsize::new(0));
    let side_task = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                ticks.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_millis(5)).await;
            }
        })
    };

    let measurement = flight.coalesced_read().await?;

    assert_eq!(measurement.as_bytes(), b"frame-1");
    assert!(
        ticks.load(Ordering::SeqCst) >= 10,
        "side task starved: {} ticks",
        ticks.load(Ordering::SeqCst)
    );
    side_task.abort();
    Ok(())
}

#[tokio::test]
async fn cancelled_waiter_does_not_disturb_delivery() -> anyhow::Result<()> {
    // Arrange
    let (sensor, gate) = ScriptedSensor::new("cam").push_ok(b"frame-1").gated();
    let flight = TaskFlight::new(sensor);

    let reader = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    acquisitions_reach(&flight, 1).await;

    let surviving = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    let doomed = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    sleep(Duration::from_millis(50)).await;

    // Act - cancel one waiter mid-wait, then let the round close
    doomed.abort();
    assert!(doomed.await.expect_err("task should be aborted").is_cancelled());
    gate.open();

    // Assert - reader and surviving waiter still get the round's result
    assert_eq!(reader.await??.as_bytes(), b"frame-1");
    assert_eq!(surviving.await??.as_bytes(), b"frame-1");
    assert_eq!(flight.sensor().acquisitions(), 1);
    Ok(())
}

#[tokio::test]
async fn cancelled_opener_still_publishes_for_waiters() -> anyhow::Result<()> {
    // Arrange - the caller that opened the round is aborted mid-flight
    let (sensor, gate) = ScriptedSensor::new("cam").push_ok(b"frame-1").gated();
    let flight = TaskFlight::new(sensor);

    let opener = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    acquisitions_reach(&flight, 1).await;

    let waiter = {
        let flight = flight.clone();
        tokio::spawn(async move { flight.coalesced_read().await })
    };
    sleep(Duration::from_millis(50)).await;

    // Act
    opener.abort();
    assert!(opener.await.expect_err("task should be aborted").is_cancelled());
    gate.open();

    // Assert - the offloaded worker ran to completion and published
    assert_eq!(waiter.await??.as_bytes(), b"frame-1");
    assert_eq!(flight.sensor().acquisitions(), 1);
    Ok(())
}

#[tokio::test]
async fn dump_file_is_independent_of_coalescing() -> anyhow::Result<()> {
    let sensor = ScriptedSensor::new("cam").push_ok(b"frame-1");
    let flight = TaskFlight::new(sensor);
    let dir = tempfile::tempdir()?;

    flight.dump_file(dir.path()).await;

    let entries: Vec<_> = std::fs::read_dir(dir.path())?
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(std::fs::read(&entries[0])?, b"frame-1");
    Ok(())
}
