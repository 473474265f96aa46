//! Module for persisting display sources as JSON.
//!
//! Voxel data is never written; a [`SourceRecord`] keeps what is needed to
//! show a source again once its stack is available: name, kind, placement,
//! color and display range. Every source also receives a numeric id, unique
//! within a session and stable for a given source name. The
//! [`SessionSerializer`] owns that id registry.
//!
//! [`SourceRecord`]: ./struct.SourceRecord.html
//! [`SessionSerializer`]: ./struct.SessionSerializer.html
use crate::affine::{from_row_major, to_row_major, Affine4};
use crate::display::{from_argb, to_argb, ColorConverter};
use crate::error::{Result, SpimError};
use crate::source::{Source, SourceAndConverter, SourceKind};
use crate::view::OffsetView;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Class name recorded for color converters.
pub const COLOR_CONVERTER_CLASS: &str = "ColorConverter";

/// JSON representation of a displayed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Name of the source.
    pub source_name: String,
    /// Wire name of the source kind.
    pub source_class: String,
    /// Wire name of the converter.
    pub converter_class: String,
    /// Session-wide identifier.
    pub source_id: u32,
    /// Packed `0xAARRGGBB` color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    /// Lower bound of the display range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_setup_min: Option<f64>,
    /// Upper bound of the display range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_setup_max: Option<f64>,
    /// Kind-specific content.
    pub sac: SourcePayload,
}

/// Kind-specific part of a [`SourceRecord`].
///
/// [`SourceRecord`]: ./struct.SourceRecord.html
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourcePayload {
    /// Row-major transform of a `Transformed` source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affine: Option<[f64; 16]>,
    /// Number of time points.
    #[serde(default = "one")]
    pub timepoints: usize,
}

fn one() -> usize {
    1
}

/// Everything about a source except its voxel data, as restored from a
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceState {
    /// Session-wide identifier.
    pub id: u32,
    /// Name of the source.
    pub name: String,
    /// Source kind.
    pub kind: SourceKind,
    /// Transform to global space.
    pub transform: Affine4,
    /// Number of time points.
    pub timepoints: usize,
    /// Color and display range.
    pub converter: ColorConverter,
}

impl SourceState {
    /// Rebuild a displayable source over the given stack.
    pub fn attach<'a, A>(&self, data: OffsetView<'a, A>) -> SourceAndConverter<'a, A> {
        let source = Source::new(self.name.clone(), data)
            .with_kind(self.kind)
            .with_transform(self.transform)
            .with_timepoints(self.timepoints);
        SourceAndConverter::new(source, self.converter)
    }
}

/// Converts sources to and from records while keeping track of their
/// identity.
///
/// Sources are identified by name: serializing two sources with the same
/// name yields the same id.
#[derive(Debug, Default)]
pub struct SessionSerializer {
    name_to_id: HashMap<String, u32>,
    id_to_name: HashMap<u32, String>,
    deserialized: HashSet<u32>,
    next_id: u64,
}

impl SessionSerializer {
    /// Create a serializer with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id registered for a source name.
    pub fn id(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    /// The source name registered for an id.
    pub fn name(&self, id: u32) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Whether a record with this id was already deserialized.
    pub fn is_deserialized(&self, id: u32) -> bool {
        self.deserialized.contains(&id)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    /// Whether no source is registered.
    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }

    fn register(&mut self, id: u32, name: &str) {
        // a name or an id registered again drops its previous pairing
        if let Some(old_id) = self.name_to_id.insert(name.to_string(), id) {
            if old_id != id {
                let _ = self.id_to_name.remove(&old_id);
            }
        }
        if let Some(old_name) = self.id_to_name.insert(id, name.to_string()) {
            if old_name != name {
                let _ = self.name_to_id.remove(&old_name);
            }
        }
        self.next_id = self.next_id.max(u64::from(id) + 1);
    }

    fn id_or_insert(&mut self, name: &str) -> Result<u32> {
        if let Some(id) = self.id(name) {
            return Ok(id);
        }
        let id = u32::try_from(self.next_id).map_err(|_| {
            SpimError::UnsupportedConfiguration(format!("no source id left for {}", name))
        })?;
        self.register(id, name);
        Ok(id)
    }

    /// Build the record of a source, assigning it an id if it has none.
    ///
    /// # Errors
    ///
    /// - `SpimError::UnsupportedConfiguration` for `Resampled` sources, which
    /// cannot be persisted, or when every id is already taken.
    pub fn serialize<A>(&mut self, sac: &SourceAndConverter<A>) -> Result<SourceRecord> {
        let source = &sac.source;
        let affine = match source.kind() {
            SourceKind::Spim | SourceKind::Warped => None,
            SourceKind::Transformed => Some(to_row_major(source.transform())),
            SourceKind::Resampled => {
                return Err(SpimError::UnsupportedConfiguration(format!(
                    "{} ({})",
                    source.name(),
                    source.kind()
                )))
            }
        };

        let source_id = self.id_or_insert(source.name())?;
        Ok(SourceRecord {
            source_name: source.name().to_string(),
            source_class: source.kind().class_name().to_string(),
            converter_class: COLOR_CONVERTER_CLASS.to_string(),
            source_id,
            color: Some(to_argb(sac.converter.color())),
            converter_setup_min: Some(sac.converter.display_range_min()),
            converter_setup_max: Some(sac.converter.display_range_max()),
            sac: SourcePayload {
                affine,
                timepoints: source.timepoints(),
            },
        })
    }

    /// Build the records of many sources. Sources that cannot be persisted
    /// are left out.
    pub fn serialize_all<'s, 'a: 's, A: 'a, I>(&mut self, sources: I) -> Vec<SourceRecord>
    where
        I: IntoIterator<Item = &'s SourceAndConverter<'a, A>>,
    {
        sources
            .into_iter()
            .filter_map(|sac| match self.serialize(sac) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("could not serialize source {}: {}", sac.source.name(), e);
                    None
                }
            })
            .collect()
    }

    /// Restore a source state from its record and register its id.
    ///
    /// # Errors
    ///
    /// - `SpimError::UnsupportedConfiguration` if the record's class is
    /// unknown or cannot be restored.
    pub fn deserialize(&mut self, record: &SourceRecord) -> Result<SourceState> {
        let kind: SourceKind = record.source_class.parse()?;
        if kind == SourceKind::Resampled {
            return Err(SpimError::UnsupportedConfiguration(record.source_class.clone()));
        }

        let transform = match (kind, record.sac.affine.as_ref()) {
            (SourceKind::Transformed, Some(values)) => from_row_major(values),
            (SourceKind::Transformed, None) => {
                warn!(
                    "transformed source {} has no affine, using identity",
                    record.source_name
                );
                Affine4::identity()
            }
            _ => Affine4::identity(),
        };

        let mut converter = ColorConverter::default();
        if let Some(color) = record.color {
            converter.set_color(from_argb(color));
            if let (Some(min), Some(max)) =
                (record.converter_setup_min, record.converter_setup_max)
            {
                converter.set_display_range(min, max);
            }
        }

        self.register(record.source_id, &record.source_name);
        let _ = self.deserialized.insert(record.source_id);
        debug!(
            "restored source {} with id {}",
            record.source_name, record.source_id
        );

        Ok(SourceState {
            id: record.source_id,
            name: record.source_name.clone(),
            kind,
            transform,
            timepoints: record.sac.timepoints,
            converter,
        })
    }
}

fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Write records to a JSON file. Paths ending in ".gz" are compressed.
pub fn save_session<P: AsRef<Path>>(path: P, records: &[SourceRecord]) -> Result<()> {
    let gz = is_gz_file(&path);
    let writer = BufWriter::new(File::create(&path)?);
    if gz {
        let mut e = GzEncoder::new(writer, Compression::default());
        serde_json::to_writer_pretty(&mut e, records)?;
        e.finish()?.flush()?;
    } else {
        let mut writer = writer;
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
    }
    Ok(())
}

/// Read records from a JSON file, decompressing it if the path ends in ".gz".
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Vec<SourceRecord>> {
    let gz = is_gz_file(&path);
    let file = BufReader::new(File::open(&path)?);
    let records = if gz {
        serde_json::from_reader(GzDecoder::new(file))?
    } else {
        serde_json::from_reader(file)?
    };
    Ok(records)
}
