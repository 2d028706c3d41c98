// src/partition/builder.rs

use crate::error::{PartitionError, PartitionResult};
use crate::geojson::GeoJsonFeature;
use crate::partition::{
    clip::{Clipper, OutputCell},
    config::PartitionConfig,
    decompose::{decompose, geometry_kind},
    densify::{densify, initial_segment_length},
    merger::PolygonMerger,
    retry::{NextStep, PartitionReport, RetryController},
    sampler::{RngSource, SamplingRegion, SiteSampler, SiteSource},
    validation::Validator,
    voronoi_diagram::VoronoiExtractor,
};
use crate::types::{Bounds2D, Coordinate, SimpleFeature};
use geo::{BoundingRect, Geometry, MultiPolygon, Rect};
use tracing::{debug, info};

/// Ergebnis einer Partitionierung: geclippte Zellen mit Besitzer plus Laufprotokoll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionOutput {
    pub cells: Vec<OutputCell>,
    pub report: PartitionReport,
}

impl PartitionOutput {
    /// Nur die Polygone, als GeoJSON-Features ohne Properties.
    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        self.cells
            .iter()
            .map(|cell| GeoJsonFeature::from(&cell.polygon))
            .collect()
    }
}

/// Clip- und Sampling-Bereich eines Aufrufs.
struct Regions {
    clip: MultiPolygon<f64>,
    clip_bounds: Bounds2D,
    sampling: SamplingRegion,
}

/// Orchestriert die Schritte: Zerlegung, Verdichtung, Sampling leerer Sites,
/// Voronoi-Konstruktion, Zusammenführung, Validierung und Clipping.
pub struct VoronoiBuilder {
    config: PartitionConfig,
}

impl VoronoiBuilder {
    pub fn new(config: PartitionConfig) -> PartitionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Partitioniert mit dem konfigurierten (oder zufälligen) Seed.
    pub fn build(
        &self,
        geometries: &[Geometry<f64>],
        bounding: Option<&Geometry<f64>>,
    ) -> PartitionResult<PartitionOutput> {
        let mut source = RngSource::from_seed_option(self.config.seed);
        self.build_with_source(geometries, bounding, &mut source)
    }

    fn regions(
        &self,
        feature_bounds: Option<&Bounds2D>,
        bounding: Option<&Geometry<f64>>,
    ) -> PartitionResult<Regions> {
        let clip = match bounding {
            Some(Geometry::Polygon(polygon)) => MultiPolygon::new(vec![polygon.clone()]),
            Some(Geometry::MultiPolygon(polygons)) => polygons.clone(),
            Some(other) => {
                return Err(PartitionError::UnsupportedGeometry {
                    kind: geometry_kind(other).to_string(),
                });
            }
            None => {
                let bounds = feature_bounds.ok_or_else(|| PartitionError::InvalidConfiguration {
                    message: "Empty sites need either input features or a bounding feature."
                        .to_string(),
                })?;
                let extended = bounds.extend_by_fraction(self.config.bounds_margin);
                return Ok(Regions {
                    clip: MultiPolygon::new(vec![extended.to_polygon()]),
                    clip_bounds: extended,
                    sampling: SamplingRegion::Rect(extended),
                });
            }
        };

        let clip_bounds = clip
            .bounding_rect()
            .map(Bounds2D::from_rect)
            .ok_or_else(|| PartitionError::InvalidGeometry {
                reason: "bounding feature has no coordinates".to_string(),
            })?;

        Ok(Regions {
            sampling: SamplingRegion::Polygon(clip.clone()),
            clip,
            clip_bounds,
        })
    }

    /// Rahmen des Diagramms: alle Sites plus der Clip-Bereich.
    fn diagram_frame(seeds: &[Coordinate], clip_bounds: &Bounds2D) -> Bounds2D {
        Bounds2D::from_rects(seeds.iter().map(|seed| Rect::new(*seed, *seed)))
            .map_or(*clip_bounds, |bounds| bounds.union(clip_bounds))
    }

    /// Wie [`build`](Self::build), aber mit einer vorgegebenen Zufallsquelle.
    pub fn build_with_source<S: SiteSource + ?Sized>(
        &self,
        geometries: &[Geometry<f64>],
        bounding: Option<&Geometry<f64>>,
        source: &mut S,
    ) -> PartitionResult<PartitionOutput> {
        let step_description =
            |step_name: &str| format!("VoronoiBuilder::build - Step: {}", step_name);
        let empty_count = self.config.empty_sites;

        if geometries.is_empty() && empty_count == 0 {
            debug!("{}: nothing to partition", step_description("Start"));
            return Ok(PartitionOutput::default());
        }

        let features: Vec<SimpleFeature> = decompose(geometries, self.config.simplify_tolerance)?;
        if features.is_empty() && empty_count == 0 {
            debug!(
                "{}: inputs decomposed into no shapes",
                step_description("Decomposition")
            );
            return Ok(PartitionOutput::default());
        }

        let feature_bounds =
            Bounds2D::from_rects(features.iter().filter_map(|f| f.shape.bounding_rect()));
        let regions = self.regions(feature_bounds.as_ref(), bounding)?;
        debug!(
            "{}: clip bounds {}",
            step_description("Bounds"),
            regions.clip_bounds
        );

        let segment_length = initial_segment_length(&features, feature_bounds.as_ref());
        let mut sites = densify(&features, segment_length);
        let mut controller =
            RetryController::new(segment_length, self.config.max_iterations, sites.len());
        debug!(
            "{}: initial segment length {:.6}, {} sites, site budget {}",
            step_description("Densification"),
            segment_length,
            sites.len(),
            controller.site_budget()
        );

        let sampler = SiteSampler::new(&regions.sampling, &features, self.config.max_iterations);
        let mut empty_sites = sampler.sample(empty_count, source)?;

        let merged = loop {
            controller.begin_build()?;

            let mut seeds = sites.all();
            seeds.extend_from_slice(&empty_sites);
            let frame = Self::diagram_frame(&seeds, &regions.clip_bounds);
            let raw_cells = VoronoiExtractor::extract_cells(&seeds, &frame)?;
            let merged = PolygonMerger::new(&features, &empty_sites).merge(&raw_cells);

            let verdict = Validator::new(&features, &empty_sites).verdict(&merged);
            match controller.judge(verdict) {
                NextStep::Accept => break merged,
                NextStep::Resample => empty_sites = sampler.sample(empty_count, source)?,
                NextStep::Refine => {
                    sites = densify(&features, controller.segment_length());
                    controller.check_site_budget(sites.len())?;
                }
            }
        };

        controller.record_empty_sites(&empty_sites);
        let cells = Clipper::new(regions.clip).clip(&merged);
        let report = controller.into_report();

        info!(
            "{}: {} features and {} empty sites partitioned into {} polygons after {} builds",
            step_description("Done"),
            features.len(),
            empty_sites.len(),
            cells.len(),
            report.iterations
        );

        Ok(PartitionOutput { cells, report })
    }
}
