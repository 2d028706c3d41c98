// src/lib.rs

//! Partitioniert eine Ebene in genau eine Voronoi-Zelle pro Eingabe-Feature
//! (Punkt, Linie oder Polygon), optional ergänzt um leere Sites, und clippt
//! das Ergebnis auf einen Begrenzungsbereich.

pub mod error;
pub mod geojson;
pub mod partition;
pub mod types;

// Re-exports für einfache Verwendung
pub use error::{PartitionError, PartitionResult};
pub use types::*;

use geo::Geometry;
use geojson::{GeoJsonFeature, GeoJsonFeatureCollection, parse_feature, parse_features};
use partition::{PartitionConfig, PartitionOutput, VoronoiBuilder};

/// Partitioniert GeoJSON-Features und liefert reine Polygon-Features ohne Properties.
///
/// Die Reihenfolge folgt den Besitzern: zerlegte Features in Eingabereihenfolge,
/// danach leere Sites, danach Waisen.
pub fn generate(
    features: &[GeoJsonFeature],
    empty_sites: usize,
    bounding: Option<&GeoJsonFeature>,
) -> PartitionResult<Vec<GeoJsonFeature>> {
    let geometries = features
        .iter()
        .map(GeoJsonFeature::to_geometry)
        .collect::<PartitionResult<Vec<_>>>()?;
    let bounding = bounding.map(GeoJsonFeature::to_geometry).transpose()?;

    let config = PartitionConfig::default().with_empty_sites(empty_sites);
    Ok(generate_cells(&geometries, &config, bounding.as_ref())?.into_features())
}

/// Wie [`generate`], aber auf `geo`-Geometrien und mit Besitzer und Laufprotokoll.
pub fn generate_cells(
    geometries: &[Geometry<f64>],
    config: &PartitionConfig,
    bounding: Option<&Geometry<f64>>,
) -> PartitionResult<PartitionOutput> {
    VoronoiBuilder::new(config.clone())?.build(geometries, bounding)
}

/// Text-Variante: liest eine FeatureCollection (oder ein Feature-Array) und
/// schreibt eine FeatureCollection.
pub fn generate_from_json(
    features: &str,
    empty_sites: usize,
    bounding: Option<&str>,
) -> PartitionResult<String> {
    let features = parse_features(features)?;
    let bounding = bounding.map(parse_feature).transpose()?;

    let output = generate(&features, empty_sites, bounding.as_ref())?;
    Ok(serde_json::to_string(&GeoJsonFeatureCollection::new(output))?)
}

pub mod prelude {
    pub use super::{
        error::{PartitionError, PartitionResult},
        generate, generate_cells, generate_from_json,
        geojson::{GeoJsonFeature, GeoJsonFeatureCollection, GeoJsonGeometry},
        partition::{
            OutputCell, Owner, PartitionConfig, PartitionOutput, PartitionReport, RngSource,
            SequenceSource, SiteSource, VoronoiBuilder,
        },
        types::*,
    };
}
