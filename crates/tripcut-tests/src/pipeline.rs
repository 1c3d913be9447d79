//! Integration tests for the project pipeline.
//!
//! Drives projects through tripcut-app with synthetic tripcut-media sources
//! and scripted tripcut-ai clients.

use crate::fixtures::{
    payload, pipeline_with, video, CaptureGate, GatedClient, Reply, ScriptedClient, SyntheticOpener,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tripcut_ai::AiError;
use tripcut_app::{export, maps, PipelineConfig, ProjectStatus, RunOutcome};

// ── Happy path ─────────────────────────────────────────────────

#[tokio::test]
async fn project_runs_to_done() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Payload(payload(
        "Tokyo",
        &[0, 999, -3, 10],
    ))));
    let pipeline = pipeline_with(opener.clone(), client.clone(), PipelineConfig::default());
    let id = pipeline.submit(video("tokyo-12s-1920x1080.mp4"));

    assert_eq!(pipeline.run(id).await, RunOutcome::Done);

    let project = pipeline.store().get(id).unwrap();
    assert_eq!(project.status(), &ProjectStatus::Done);
    assert_eq!(project.frames.len(), 24);

    let analysis = project.analysis.as_ref().unwrap();
    let indices: Vec<_> = analysis.timeline.iter().map(|e| e.frame_index()).collect();
    assert_eq!(indices, vec![0, 23, 0, 10]);
    assert_eq!(analysis.timeline[1].resolved_time_offset(), 11.5);
    assert_eq!(analysis.timeline[3].resolved_time_offset(), 5.0);
    assert_eq!(analysis.timeline[1].timestamp, "00:02");

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    assert_eq!(opener.released(), 1);
}

#[tokio::test]
async fn finished_project_exports() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Payload(payload("Lisbon", &[1, 2]))));
    let pipeline = pipeline_with(opener, client, PipelineConfig::default());
    let id = pipeline.submit(video("lisbon-3s-640x360.mp4"));
    pipeline.run(id).await;

    let analysis = pipeline.store().get(id).unwrap().analysis.unwrap();
    let markdown = export::to_markdown(&analysis);
    assert!(markdown.starts_with("# Lisbon\n"));
    assert!(markdown.contains("### 00:02 - Stop 1"));
    assert_eq!(
        maps::directions_url(&analysis).as_deref(),
        Some("https://www.google.com/maps/dir/Stop%200/Stop%201")
    );
}

// ── Failures ───────────────────────────────────────────────────

#[tokio::test]
async fn empty_reply_errors_and_keeps_frames() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Nothing));
    let pipeline = pipeline_with(opener.clone(), client, PipelineConfig::default());
    let id = pipeline.submit(video("market-5s-1280x720.mp4"));

    let outcome = pipeline.run(id).await;
    assert!(matches!(outcome, RunOutcome::Failed(_)));

    let project = pipeline.store().get(id).unwrap();
    match project.status() {
        ProjectStatus::Error { message } => {
            assert!(!message.is_empty());
            assert_eq!(message, &AiError::EmptyResponse.to_string());
        }
        other => panic!("expected error status, got {other:?}"),
    }
    assert_eq!(project.frames.len(), 10);
    assert!(project.frames.iter().all(|f| !f.preview().is_empty()));
    assert!(project.analysis.is_none());
    assert_eq!(opener.released(), 1);
}

#[tokio::test]
async fn api_error_message_is_verbatim() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Fail {
        status: 400,
        message: "API key not valid. Please pass a valid API key.".into(),
    }));
    let pipeline = pipeline_with(opener, client, PipelineConfig::default());
    let id = pipeline.submit(video("pier-2s-320x240.mp4"));
    pipeline.run(id).await;

    assert_eq!(
        pipeline.store().get(id).unwrap().status(),
        &ProjectStatus::Error {
            message: "API key not valid. Please pass a valid API key.".into()
        }
    );
}

#[tokio::test]
async fn malformed_reply_discards_analysis() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Payload(
        r#"{"title": "No timeline", "summary": "s", "vibe": []}"#.into(),
    )));
    let pipeline = pipeline_with(opener, client, PipelineConfig::default());
    let id = pipeline.submit(video("bay-2s-320x240.mp4"));
    pipeline.run(id).await;

    let project = pipeline.store().get(id).unwrap();
    assert!(matches!(project.status(), ProjectStatus::Error { message } if message.starts_with("Malformed")));
    assert!(project.analysis.is_none());
}

#[tokio::test]
async fn unreadable_video_errors_without_frames() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Nothing));
    let pipeline = pipeline_with(opener.clone(), client.clone(), PipelineConfig::default());
    let id = pipeline.submit(video("corrupt.mp4"));

    pipeline.run(id).await;

    let project = pipeline.store().get(id).unwrap();
    assert!(matches!(project.status(), ProjectStatus::Error { message } if message.contains("corrupt.mp4")));
    assert!(project.frames.is_empty());
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    assert_eq!(opener.released(), 0);
}

#[tokio::test]
async fn zero_dimension_video_is_unsupported_and_released() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Nothing));
    let pipeline = pipeline_with(opener.clone(), client, PipelineConfig::default());
    let id = pipeline.submit(video("audio-4s-0x0.mp4"));

    pipeline.run(id).await;

    assert!(matches!(
        pipeline.store().get(id).unwrap().status(),
        ProjectStatus::Error { .. }
    ));
    assert_eq!(opener.opened.load(Ordering::SeqCst), 1);
    assert_eq!(opener.released(), 1);
}

#[tokio::test]
async fn slow_analysis_times_out() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Hang));
    let config = PipelineConfig {
        analysis_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let pipeline = pipeline_with(opener, client, config);
    let id = pipeline.submit(video("train-2s-320x240.mp4"));

    let outcome = pipeline.run(id).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed(AiError::Timeout(Duration::from_millis(50)).to_string())
    );
    assert_eq!(pipeline.store().get(id).unwrap().frames.len(), 4);
}

// ── Concurrency ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_failure_does_not_affect_another_project() {
    let opener = Arc::new(SyntheticOpener::default());
    // 3s → 6 frames succeeds; 4s → 8 frames gets no payload.
    let client = Arc::new(
        ScriptedClient::always(Reply::Payload(payload("Good", &[5])))
            .when_frames(8, Reply::Nothing),
    );
    let pipeline = pipeline_with(opener.clone(), client, PipelineConfig::default());
    let good = pipeline.submit(video("good-3s-800x600.mp4"));
    let bad = pipeline.submit(video("bad-4s-800x600.mp4"));

    let outcomes = pipeline.run_all(&[good, bad]).await;

    assert_eq!(outcomes[0], (good, RunOutcome::Done));
    assert!(matches!(outcomes[1], (id, RunOutcome::Failed(_)) if id == bad));

    let good_project = pipeline.store().get(good).unwrap();
    assert_eq!(good_project.status(), &ProjectStatus::Done);
    assert_eq!(good_project.analysis.unwrap().title, "Good");

    let bad_project = pipeline.store().get(bad).unwrap();
    assert!(matches!(bad_project.status(), ProjectStatus::Error { .. }));
    assert_eq!(bad_project.frames.len(), 8);

    assert_eq!(opener.released(), 2);
}

#[tokio::test]
async fn spawned_projects_complete_independently() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Payload(payload("Any", &[0]))));
    let pipeline = pipeline_with(opener, client, PipelineConfig::default());

    let handles: Vec<_> = ["a-1s-64x64.mp4", "b-2s-64x64.mp4", "c-3s-64x64.mp4"]
        .into_iter()
        .map(|name| {
            let id = pipeline.submit(video(name));
            (id, pipeline.spawn(id))
        })
        .collect();

    for (id, handle) in handles {
        assert_eq!(handle.await.unwrap(), RunOutcome::Done);
        assert_eq!(pipeline.store().get(id).unwrap().status(), &ProjectStatus::Done);
    }
}

// ── Cancellation ───────────────────────────────────────────────

#[tokio::test]
async fn deleting_during_analysis_stops_writes() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(GatedClient {
        entered: Notify::new(),
        release: Notify::new(),
        reply: payload("Late", &[0]),
    });
    let pipeline = pipeline_with(opener.clone(), client.clone(), PipelineConfig::default());
    let keep = pipeline.submit(video("keep-1s-64x64.mp4"));
    let id = pipeline.submit(video("gone-2s-64x64.mp4"));

    let handle = pipeline.spawn(id);
    client.entered.notified().await;
    assert_eq!(
        pipeline.store().get(id).unwrap().status(),
        &ProjectStatus::Analyzing
    );

    assert!(pipeline.store().remove(id).is_some());
    client.release.notify_one();

    assert_eq!(handle.await.unwrap(), RunOutcome::Cancelled);
    assert!(pipeline.store().get(id).is_none());
    assert_eq!(pipeline.store().len(), 1);
    assert_eq!(pipeline.store().get(keep).unwrap().status(), &ProjectStatus::Idle);
    assert_eq!(opener.released(), 1);
}

#[tokio::test]
async fn deleting_during_extraction_skips_analysis() {
    let gate = Arc::new(CaptureGate::default());
    let opener = Arc::new(SyntheticOpener::gated(Arc::clone(&gate)));
    let client = Arc::new(ScriptedClient::always(Reply::Payload(payload("Never", &[0]))));
    let pipeline = pipeline_with(opener.clone(), client.clone(), PipelineConfig::default());
    let id = pipeline.submit(video("ferry-3s-640x360.mp4"));

    let handle = pipeline.spawn(id);
    gate.entered.notified().await;
    assert_eq!(
        pipeline.store().get(id).unwrap().status(),
        &ProjectStatus::Extracting
    );

    assert!(pipeline.store().remove(id).is_some());
    gate.release.notify_one();

    assert_eq!(handle.await.unwrap(), RunOutcome::Cancelled);
    assert!(pipeline.store().get(id).is_none());
    assert!(pipeline.store().is_empty());
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    assert_eq!(opener.released(), 1);
}

#[tokio::test]
async fn deleted_before_start_is_cancelled() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Nothing));
    let pipeline = pipeline_with(opener.clone(), client, PipelineConfig::default());
    let id = pipeline.submit(video("never-2s-64x64.mp4"));
    pipeline.store().remove(id);

    assert_eq!(pipeline.run(id).await, RunOutcome::Cancelled);
    assert_eq!(opener.opened.load(Ordering::SeqCst), 0);
}

// ── Lifecycle rules ────────────────────────────────────────────

#[tokio::test]
async fn finished_project_cannot_restart() {
    let opener = Arc::new(SyntheticOpener::default());
    let client = Arc::new(ScriptedClient::always(Reply::Payload(payload("Once", &[0]))));
    let pipeline = pipeline_with(opener, client, PipelineConfig::default());
    let id = pipeline.submit(video("once-1s-64x64.mp4"));
    assert_eq!(pipeline.run(id).await, RunOutcome::Done);

    assert!(pipeline
        .store()
        .update_status(id, ProjectStatus::Extracting)
        .is_err());
    assert!(pipeline
        .store()
        .update_status(id, ProjectStatus::Error { message: "late".into() })
        .is_err());
    assert_eq!(pipeline.store().get(id).unwrap().status(), &ProjectStatus::Done);
}
