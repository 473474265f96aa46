#[macro_use]
extern crate pretty_assertions;

mod util;

use approx::assert_ulps_eq;
use rgb::RGBA8;
use serde_json::json;
use spimview::affine::voxel_affine;
use spimview::{
    load_session, save_session, ColorConverter, OffsetView, SessionSerializer, Source,
    SourceAndConverter, SourceKind, SourceRecord, SpimError,
};
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};
use util::ramp;

fn temporary_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

#[test]
fn serialize_spim_source() {
    let data = ramp(&[4, 4, 1]);
    let source = Source::new("dapi", OffsetView::new(data.view())).with_timepoints(3);
    let converter = ColorConverter::new(RGBA8::new(0, 0, 255, 255), 100., 2000.);
    let sac = SourceAndConverter::new(source, converter);

    let mut serializer = SessionSerializer::new();
    let record = serializer.serialize(&sac).unwrap();

    assert_eq!(
        serde_json::to_value(&record).unwrap(),
        json!({
            "source_name": "dapi",
            "source_class": "SpimSource",
            "converter_class": "ColorConverter",
            "source_id": 0,
            "color": -16776961,
            "converter_setup_min": 100.0,
            "converter_setup_max": 2000.0,
            "sac": { "timepoints": 3 }
        })
    );
    assert_eq!(serializer.id("dapi"), Some(0));
    assert_eq!(serializer.name(0), Some("dapi"));
}

#[test]
fn ids_are_reused_per_source() {
    let data = ramp(&[4, 4, 1]);
    let a = SourceAndConverter::new(
        Source::new("a", OffsetView::new(data.view())),
        ColorConverter::default(),
    );
    let b = SourceAndConverter::new(
        Source::new("b", OffsetView::new(data.view())),
        ColorConverter::default(),
    );

    let mut serializer = SessionSerializer::new();
    assert_eq!(serializer.serialize(&a).unwrap().source_id, 0);
    assert_eq!(serializer.serialize(&b).unwrap().source_id, 1);
    assert_eq!(serializer.serialize(&a).unwrap().source_id, 0);
    assert_eq!(serializer.len(), 2);
}

#[test]
fn resampled_sources_are_unsupported() {
    let data = ramp(&[4, 4, 1]);
    let resampled = SourceAndConverter::new(
        Source::new("resampled", OffsetView::new(data.view())).with_kind(SourceKind::Resampled),
        ColorConverter::default(),
    );
    let plain = SourceAndConverter::new(
        Source::new("plain", OffsetView::new(data.view())),
        ColorConverter::default(),
    );

    let mut serializer = SessionSerializer::new();
    assert!(matches!(
        serializer.serialize(&resampled),
        Err(SpimError::UnsupportedConfiguration(_))
    ));
    assert!(serializer.is_empty());

    let records = serializer.serialize_all(vec![&resampled, &plain]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_name, "plain");
}

#[test]
fn transformed_source_round_trip() {
    let data = ramp(&[4, 4, 2]);
    let affine = voxel_affine([0.2, 0.2, 1.5], [3.0, 0.0, -1.0]);
    let source = Source::new("membrane", OffsetView::new(data.view()))
        .with_kind(SourceKind::Transformed)
        .with_transform(affine);
    let converter = ColorConverter::new(RGBA8::new(255, 0, 255, 255), 0., 4095.);
    let sac = SourceAndConverter::new(source, converter);

    let record = SessionSerializer::new().serialize(&sac).unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let record: SourceRecord = serde_json::from_str(&json).unwrap();

    let mut serializer = SessionSerializer::new();
    let state = serializer.deserialize(&record).unwrap();
    assert_eq!(state.name, "membrane");
    assert_eq!(state.kind, SourceKind::Transformed);
    assert_eq!(state.transform, affine);
    assert_eq!(state.converter, converter);
    assert!(serializer.is_deserialized(record.source_id));

    let restored = state.attach(OffsetView::new(data.view()));
    assert_eq!(restored.source.name(), "membrane");
    assert_eq!(restored.source.shape(), vec![4, 4, 2]);
    assert_eq!(restored.source.transform(), &affine);
}

#[test]
fn deserialize_registers_ids() {
    let record: SourceRecord = serde_json::from_value(json!({
        "source_name": "loaded",
        "source_class": "WarpedSource",
        "converter_class": "ColorConverter",
        "source_id": 7,
        "sac": {}
    }))
    .unwrap();

    let mut serializer = SessionSerializer::new();
    let state = serializer.deserialize(&record).unwrap();
    assert_eq!(state.id, 7);
    assert_eq!(state.kind, SourceKind::Warped);
    assert_eq!(state.timepoints, 1);
    assert_eq!(state.converter, ColorConverter::default());
    assert_eq!(serializer.id("loaded"), Some(7));
    assert!(!serializer.is_deserialized(8));

    // new sources do not collide with restored ids
    let data = ramp(&[2, 2, 1]);
    let sac = SourceAndConverter::new(
        Source::new("fresh", OffsetView::new(data.view())),
        ColorConverter::default(),
    );
    assert_eq!(serializer.serialize(&sac).unwrap().source_id, 8);
}

#[test]
fn deserialize_unknown_class() {
    let record: SourceRecord = serde_json::from_value(json!({
        "source_name": "mystery",
        "source_class": "bdv.util.PlaceHolderSource",
        "converter_class": "ColorConverter",
        "source_id": 1,
        "sac": {}
    }))
    .unwrap();

    let mut serializer = SessionSerializer::new();
    assert!(matches!(
        serializer.deserialize(&record),
        Err(SpimError::UnsupportedConfiguration(_))
    ));
    assert_eq!(serializer.name(1), None);
}

fn sample_records() -> Vec<SourceRecord> {
    let data = ramp(&[3, 3, 1]);
    let mut serializer = SessionSerializer::new();
    ["red", "green"]
        .iter()
        .zip(&[RGBA8::new(255, 0, 0, 255), RGBA8::new(0, 255, 0, 255)])
        .map(|(name, color)| {
            let sac = SourceAndConverter::new(
                Source::new(*name, OffsetView::new(data.view())),
                ColorConverter::new(*color, 10., 90.5),
            );
            serializer.serialize(&sac).unwrap()
        })
        .collect()
}

#[test]
fn session_file() {
    let records = sample_records();
    let (_dir, path) = temporary_path("session.json");
    save_session(&path, &records).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"source_name\": \"green\""));

    let loaded = load_session(&path).unwrap();
    assert_eq!(loaded, records);
    assert_ulps_eq!(loaded[1].converter_setup_max.unwrap(), 90.5);
}

#[test]
fn session_file_gz() {
    let records = sample_records();
    let (_dir, path) = temporary_path("session.json.gz");
    save_session(&path, &records).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

    let loaded = load_session(&path).unwrap();
    assert_eq!(loaded, records);
}

#[test]
fn session_file_missing() {
    let (_dir, path) = temporary_path("nothing.json");
    assert!(matches!(load_session(&path), Err(SpimError::Io(_))));
}

fn spim_record(name: &str, id: u32) -> SourceRecord {
    serde_json::from_value(json!({
        "source_name": name,
        "source_class": "SpimSource",
        "converter_class": "ColorConverter",
        "source_id": id,
        "sac": {}
    }))
    .unwrap()
}

#[test]
fn deserialize_largest_id() {
    let mut serializer = SessionSerializer::new();
    let state = serializer.deserialize(&spim_record("last", u32::MAX)).unwrap();
    assert_eq!(state.id, u32::MAX);
    assert_eq!(serializer.id("last"), Some(u32::MAX));

    // known names keep their id, new names have none left
    let data = ramp(&[2, 2, 1]);
    let last = SourceAndConverter::new(
        Source::new("last", OffsetView::new(data.view())),
        ColorConverter::default(),
    );
    assert_eq!(serializer.serialize(&last).unwrap().source_id, u32::MAX);
    let fresh = SourceAndConverter::new(
        Source::new("fresh", OffsetView::new(data.view())),
        ColorConverter::default(),
    );
    assert!(matches!(
        serializer.serialize(&fresh),
        Err(SpimError::UnsupportedConfiguration(_))
    ));
    assert_eq!(serializer.len(), 1);
}

#[test]
fn reloading_keeps_registry_consistent() {
    let mut serializer = SessionSerializer::new();
    let _ = serializer.deserialize(&spim_record("a", 5)).unwrap();
    let _ = serializer.deserialize(&spim_record("a", 6)).unwrap();
    assert_eq!(serializer.len(), 1);
    assert_eq!(serializer.id("a"), Some(6));
    assert_eq!(serializer.name(5), None);
    assert_eq!(serializer.name(6), Some("a"));

    let _ = serializer.deserialize(&spim_record("b", 6)).unwrap();
    assert_eq!(serializer.len(), 1);
    assert_eq!(serializer.id("a"), None);
    assert_eq!(serializer.id("b"), Some(6));
    assert_eq!(serializer.name(6), Some("b"));
}
