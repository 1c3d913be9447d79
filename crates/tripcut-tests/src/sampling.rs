//! Integration tests for frame sampling feeding request building and
//! reconciliation.
//!
//! Exercises tripcut-media output as consumed by tripcut-ai.

use crate::fixtures::{video, SyntheticOpener};
use tripcut_ai::{reconcile, reconcile_raw, AnalysisRequestBuilder};
use tripcut_media::{FrameSampler, SamplerConfig, SourceOpener};

async fn sample(name: &str, config: SamplerConfig) -> tripcut_core::FrameSequence {
    let opener = SyntheticOpener::default();
    let source = opener.open(&video(name)).await.unwrap();
    FrameSampler::new(config).sample(source).await.unwrap()
}

// ── Sequence invariants ────────────────────────────────────────

#[tokio::test]
async fn twelve_second_video_yields_24_frames() {
    let frames = sample("city-12s-1920x1080.mp4", SamplerConfig::default()).await;

    assert_eq!(frames.len(), 24);
    let offsets = frames.time_offsets();
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    assert!(*offsets.last().unwrap() <= 12.0);
    assert!(frames.iter().all(|f| f.dimensions() == (960, 540)));
}

#[tokio::test]
async fn long_video_is_capped_at_target_count() {
    let config = SamplerConfig {
        target_count: 30,
        ..Default::default()
    };
    let frames = sample("hike-600s-640x480.mp4", config).await;

    assert_eq!(frames.len(), 30);
    assert_eq!(frames.time_offset(1), Some(20.0));
    assert!(frames.last().unwrap().time_offset() <= 600.0);
}

#[tokio::test]
async fn output_keeps_aspect_ratio() {
    for (name, expected) in [
        ("wide-1s-3840x1600.mp4", (960, 400)),
        ("tall-1s-1080x1920.mp4", (960, 1707)),
        ("small-1s-320x240.mp4", (320, 240)),
    ] {
        let frames = sample(name, SamplerConfig::default()).await;
        let (width, height) = frames.get(0).unwrap().dimensions();
        assert_eq!((width, height), expected, "{name}");
        assert!(width <= 960);
    }
}

#[tokio::test]
async fn encoded_frames_decode_to_captured_size() {
    let frames = sample("cafe-1s-1280x720.mp4", SamplerConfig::default()).await;
    let frame = frames.get(0).unwrap();

    let preview = image::load_from_memory(frame.preview()).unwrap();
    let blob = image::load_from_memory(frame.blob()).unwrap();
    assert_eq!((preview.width(), preview.height()), (960, 540));
    assert_eq!((blob.width(), blob.height()), (960, 540));
    assert_eq!(
        image::guess_format(frame.preview()).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!(
        image::guess_format(frame.blob()).unwrap(),
        image::ImageFormat::Png
    );
}

// ── Request and reconciliation over sampled frames ─────────────

#[tokio::test]
async fn request_has_one_image_per_sampled_frame() {
    let frames = sample("temple-4s-800x600.mp4", SamplerConfig::default()).await;
    let request = AnalysisRequestBuilder::default().build(&frames);

    assert_eq!(request.image_count(), frames.len());
    let body = request.to_gemini_body();
    assert_eq!(
        body["contents"][0]["parts"].as_array().unwrap().len(),
        frames.len() + 1
    );
}

#[tokio::test]
async fn out_of_range_index_against_ten_frames() {
    let frames = sample("harbor-5s-640x360.mp4", SamplerConfig::default()).await;
    assert_eq!(frames.len(), 10);

    let raw = serde_json::json!({
        "title": "Harbor",
        "summary": "Boats.",
        "vibe": ["salty"],
        "timeline": [
            { "timestamp": "00:07", "content": "Sunset", "bestFrameIndex": 999, "highlightType": "scenery" },
            { "timestamp": "00:00", "content": "Arrival", "bestFrameIndex": -3, "highlightType": "transport" }
        ]
    })
    .to_string();
    let result = reconcile(Some(&raw), &frames).unwrap();

    assert_eq!(result.timeline[0].frame_index(), 9);
    assert_eq!(
        result.timeline[0].resolved_time_offset(),
        frames.time_offset(9).unwrap()
    );
    assert_eq!(result.timeline[0].timestamp, "00:07");
    assert_eq!(result.timeline[1].frame_index(), 0);

    let again = reconcile_raw(result.to_raw(), &frames).unwrap();
    assert_eq!(again, result);
}
